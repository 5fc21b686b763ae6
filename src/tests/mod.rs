mod cart;
mod categories;
mod checkout;
mod destinations;
