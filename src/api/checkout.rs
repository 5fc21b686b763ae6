//! Checkout API endpoint
//!
//! Converts selected cart items into one booking, atomically. This is where
//! the money freezes: subtotals and the grand total are computed here and
//! never re-quoted from the live catalog afterwards.

use axum::Extension;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::bookings::BookingStatus;
use crate::bookings::PaymentMethod;
use crate::bookings::generate_booking_code;
use crate::bookings::qr_payload;
use crate::storage::CheckoutItem;
use crate::storage::CheckoutValues;
use crate::storage::Error as StorageError;
use crate::storage::Storage;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Success;

/// How often to regenerate a colliding booking code before giving up
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Checkout form
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    /// The cart items to consume, treated as a set
    cart_ids: Vec<Uuid>,

    /// How the booking is paid
    payment_method: PaymentMethod,
}

/// Checkout response, the handle to the fresh booking
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// The code of the created booking
    pub booking_code: String,
}

/// Convert cart items into a booking based on the [`CheckoutForm`](CheckoutForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "cart_ids": ["<uuid>", "<uuid>"], "payment_method": "qris" }' \
///     http://localhost:6000/api/checkout
/// ```
///
/// Response
/// ```json
/// { "data": { "booking_code": "WST-ABCD2345" } }
/// ```
///
/// A second submission of the same cart items fails, the first checkout
/// already consumed them.
pub async fn checkout<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CheckoutForm>,
) -> Result<Success<CheckoutResponse>, Error> {
    current_user.role.is_allowed(Role::Customer)?;

    if form.cart_ids.is_empty() {
        return Err(Error::bad_request("No cart items selected"));
    }

    let mut cart_ids = form.cart_ids;
    cart_ids.sort_unstable();
    cart_ids.dedup();

    // load and validate every selected item before touching anything
    let mut items = Vec::with_capacity(cart_ids.len());
    let mut grand_total = 0;

    for cart_id in &cart_ids {
        let cart_item = storage
            .find_single_cart_item_by_id(cart_id)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::not_found("Cart item not found"))?;

        if cart_item.user_id != current_user.id {
            return Err(Error::forbidden("Cart item does not belong to you"));
        }

        let destination = storage
            .find_single_destination_by_id(&cart_item.destination_id)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::internal_server_error("Cart item has no destination"))?;

        // the freeze point: this quote is what the booking keeps
        let subtotal = cart_item.subtotal(&destination);
        grand_total += subtotal;

        items.push(CheckoutItem {
            cart_item_id: cart_item.id,
            destination_id: destination.id,
            quantity: cart_item.quantity,
            visit_date: cart_item.visit_date,
            subtotal,
        });
    }

    let status = form.payment_method.initial_status();
    let paid_at = match status {
        BookingStatus::Success => Some(Utc::now().naive_utc()),
        BookingStatus::Pending | BookingStatus::Failed => None,
    };

    let mut attempts = 0;

    let booking = loop {
        attempts += 1;

        let code = generate_booking_code();
        let payload = qr_payload(&code);

        let values = CheckoutValues {
            user: &current_user,
            code: &code,
            qr_payload: &payload,
            payment_method: form.payment_method,
            status,
            paid_at,
            grand_total,
            items: &items,
        };

        match storage.checkout(&values).await {
            Ok(booking) => break booking,
            Err(StorageError::BookingCodeExists) if attempts < MAX_CODE_ATTEMPTS => {
                tracing::debug!("Booking code {code} collided, regenerating");
            }
            Err(StorageError::BookingCodeExists) => {
                return Err(Error::internal_server_error(
                    "Could not generate a unique booking code",
                ));
            }
            Err(StorageError::CartItemConsumed) => {
                return Err(Error::not_found("Cart item not found"));
            }
            Err(err) => return Err(Error::internal_server_error(err)),
        }
    };

    tracing::info!(
        "Booking {} created for {}: {} item(s), grand total {}",
        booking.code,
        current_user.username,
        items.len(),
        booking.grand_total,
    );

    Ok(Success::created(CheckoutResponse {
        booking_code: booking.code,
    }))
}
