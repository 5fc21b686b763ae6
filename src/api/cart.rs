//! Cart API endpoints
//!
//! Pending purchase intents; subtotals here are live quotes, frozen only by
//! the checkout

use axum::Extension;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::cart::CartItem;
use crate::destinations::Destination;
use crate::storage::CreateCartItemValues;
use crate::storage::Storage;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::destinations::DestinationResponse;

/// Cart item response going to the user
///
/// The subtotal is re-quoted from the live destination price on every read
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    /// Cart item ID
    pub id: Uuid,

    /// The destination to visit
    pub destination: DestinationResponse,

    /// Number of tickets
    pub quantity: i32,

    /// Planned visit date
    pub visit_date: NaiveDate,

    /// Live subtotal, current destination price times quantity
    pub subtotal: i64,
}

impl CartItemResponse {
    /// Create a response from a [`CartItem`](CartItem) and its destination
    fn from_cart_item(cart_item: CartItem, destination: Destination) -> Self {
        let subtotal = cart_item.subtotal(&destination);

        Self {
            id: cart_item.id,
            destination: DestinationResponse::from_destination(destination),
            quantity: cart_item.quantity,
            visit_date: cart_item.visit_date,
            subtotal,
        }
    }
}

/// List the cart of the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/cart
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "quantity": 2, "subtotal": 200000, ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<CartItemResponse>>, Error> {
    current_user.role.is_allowed(Role::Customer)?;

    let items = storage
        .find_all_cart_items_by_user(&current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(
        items
            .into_iter()
            .map(|(cart_item, destination)| {
                CartItemResponse::from_cart_item(cart_item, destination)
            })
            .collect(),
    ))
}

/// Add to cart form
#[derive(Debug, Deserialize)]
pub struct AddCartItemForm {
    /// The destination to visit
    destination_id: Uuid,

    /// Number of tickets, at least one
    quantity: i32,

    /// Planned visit date, today or later
    visit_date: NaiveDate,
}

/// Add an item to the cart based on the [`AddCartItemForm`](AddCartItemForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "destination_id": "<uuid>", "quantity": 2, "visit_date": "2026-09-01" }' \
///     http://localhost:6000/api/cart
/// ```
pub async fn add<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<AddCartItemForm>,
) -> Result<Success<CartItemResponse>, Error> {
    current_user.role.is_allowed(Role::Customer)?;

    if form.quantity < 1 {
        return Err(Error::bad_request("Quantity must be at least 1"));
    }

    if form.visit_date < Utc::now().date_naive() {
        return Err(Error::bad_request("Visit date can not be in the past"));
    }

    let destination = storage
        .find_single_destination_by_id(&form.destination_id)
        .await
        .map_err(Error::internal_server_error)?;

    let Some(destination) = destination.filter(|destination| destination.is_active) else {
        return Err(Error::bad_request("Destination is not available"));
    };

    let values = CreateCartItemValues {
        user: &current_user,
        destination: &destination,
        quantity: form.quantity,
        visit_date: form.visit_date,
    };

    let cart_item = storage
        .create_cart_item(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(CartItemResponse::from_cart_item(
        cart_item,
        destination,
    )))
}

/// Remove an item from the cart, permanently
///
/// Items of other users are reported as not found
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/cart/<uuid>
/// ```
pub async fn remove<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(cart_item_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    current_user.role.is_allowed(Role::Customer)?;

    let cart_item = storage
        .find_single_cart_item_by_id(&cart_item_id)
        .await
        .map_err(Error::internal_server_error)?;

    // not owning the item reads the same as it not existing
    let Some(cart_item) = cart_item.filter(|cart_item| cart_item.user_id == current_user.id)
    else {
        return Err(Error::not_found("Cart item not found"));
    };

    storage
        .delete_cart_item(&cart_item)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}
