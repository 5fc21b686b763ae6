//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::parse_url;
pub use request::slugify;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod bookings;
mod cart;
mod categories;
mod checkout;
mod current_user;
mod dashboard;
mod destinations;
mod request;
mod response;
mod users;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let users = Router::new()
        .route("/register", post(users::register::<S>))
        .route("/token", post(users::token::<S>))
        .route("/me", get(users::me::<S>));

    let categories = Router::new()
        .route("/", get(categories::list::<S>))
        .route("/", post(categories::create::<S>))
        .route("/{category}", patch(categories::update::<S>))
        .route("/{category}", delete(categories::remove::<S>));

    let destinations = Router::new()
        .route("/", get(destinations::list::<S>))
        .route("/", post(destinations::create::<S>))
        .route("/all", get(destinations::list_all::<S>))
        .route("/{destination}", get(destinations::single::<S>))
        .route("/{destination}", patch(destinations::update::<S>))
        .route("/{destination}", delete(destinations::remove::<S>));

    let cart = Router::new()
        .route("/", get(cart::list::<S>))
        .route("/", post(cart::add::<S>))
        .route("/{cart_item}", delete(cart::remove::<S>));

    let admin = Router::new()
        .route("/dashboard", get(dashboard::stats::<S>))
        .route("/bookings", get(bookings::list_all::<S>))
        .route("/bookings/{code}/status", patch(bookings::update_status::<S>));

    Router::new()
        .nest("/users", users)
        .nest("/categories", categories)
        .nest("/destinations", destinations)
        .nest("/cart", cart)
        .route("/checkout", post(checkout::checkout::<S>))
        .route("/bookings/{code}", get(bookings::single::<S>))
        .route("/my-bookings", get(bookings::mine::<S>))
        .nest("/admin", admin)
}
