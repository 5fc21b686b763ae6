//! Pending purchase intents, one cart item per destination visit

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use uuid::Uuid;

use crate::destinations::Destination;

/// A pending purchase intent of one destination on one visit date
///
/// Cart items never store a price; the subtotal is re-quoted from the live
/// destination price on every read, right up until checkout freezes it into
/// a [`BookingDetail`](crate::bookings::BookingDetail).
#[derive(Clone, Debug)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination_id: Uuid,
    pub quantity: i32,
    pub visit_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl CartItem {
    /// Live subtotal: current destination price times quantity
    pub fn subtotal(&self, destination: &Destination) -> i64 {
        destination.price * i64::from(self.quantity)
    }
}
