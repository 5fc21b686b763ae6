//! Booking API endpoints
//!
//! E-ticket retrieval for customers and booking management for the
//! back-office. Bookings are read-only except for the status settlement.

use axum::Extension;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingDetail;
use crate::bookings::BookingStatus;
use crate::bookings::BookingWithRelations;
use crate::bookings::PaymentMethod;
use crate::destinations::Destination;
use crate::storage::Storage;
use crate::storage::UpdateBookingStatusValues;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::destinations::DestinationResponse;

/// One line item of a booking going to the user
#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    /// Detail ID
    pub id: Uuid,

    /// The destination that was sold
    pub destination: DestinationResponse,

    /// Number of tickets
    pub quantity: i32,

    /// Planned visit date
    pub visit_date: NaiveDate,

    /// Frozen subtotal from checkout time
    pub subtotal: i64,
}

impl BookingDetailResponse {
    /// Create a response from a detail and its destination
    fn from_detail(detail: BookingDetail, destination: Destination) -> Self {
        Self {
            id: detail.id,
            destination: DestinationResponse::from_destination(destination),
            quantity: detail.quantity,
            visit_date: detail.visit_date,
            subtotal: detail.subtotal,
        }
    }

    /// Create responses from multiple details
    fn from_detail_multiple(details: Vec<(BookingDetail, Destination)>) -> Vec<Self> {
        details
            .into_iter()
            .map(|(detail, destination)| Self::from_detail(detail, destination))
            .collect::<Vec<Self>>()
    }
}

/// Booking response going to the user, details included
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Booking ID
    pub id: Uuid,

    /// Unique human-readable booking code
    pub booking_code: String,

    /// Payment status
    pub status: BookingStatus,

    /// How the booking is paid
    pub payment_method: PaymentMethod,

    /// Frozen total from checkout time
    pub grand_total: i64,

    /// The string to render as the scannable ticket
    pub qr_payload: String,

    /// When the booking was settled, if it was
    pub paid_at: Option<NaiveDateTime>,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// The line items
    pub details: Vec<BookingDetailResponse>,
}

impl BookingResponse {
    /// Create a response from a booking and its details
    fn from_booking(booking: Booking, details: Vec<(BookingDetail, Destination)>) -> Self {
        Self {
            id: booking.id,
            booking_code: booking.code,
            status: booking.status,
            payment_method: booking.payment_method,
            grand_total: booking.grand_total,
            qr_payload: booking.qr_payload,
            paid_at: booking.paid_at,
            created_at: booking.created_at,
            details: BookingDetailResponse::from_detail_multiple(details),
        }
    }
}

/// The customer on a booking summary
#[derive(Debug, Serialize)]
pub struct BookingUserResponse {
    /// The user ID
    pub id: Uuid,

    /// The username
    pub username: String,
}

/// A booking with its customer joined, the back-office view
#[derive(Debug, Serialize)]
pub struct BookingSummaryResponse {
    /// Booking ID
    pub id: Uuid,

    /// Unique human-readable booking code
    pub booking_code: String,

    /// Payment status
    pub status: BookingStatus,

    /// How the booking is paid
    pub payment_method: PaymentMethod,

    /// Frozen total from checkout time
    pub grand_total: i64,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// The customer that made the booking
    pub user: BookingUserResponse,

    /// The line items
    pub details: Vec<BookingDetailResponse>,
}

impl BookingSummaryResponse {
    /// Create a response from a booking with its relations
    pub fn from_booking_with_relations(booking: BookingWithRelations) -> Self {
        Self {
            id: booking.booking.id,
            booking_code: booking.booking.code,
            status: booking.booking.status,
            payment_method: booking.booking.payment_method,
            grand_total: booking.booking.grand_total,
            created_at: booking.booking.created_at,
            user: BookingUserResponse {
                id: booking.user.id,
                username: booking.user.username,
            },
            details: BookingDetailResponse::from_detail_multiple(booking.details),
        }
    }

    /// Create responses from multiple bookings with relations
    pub fn from_booking_with_relations_multiple(
        bookings: Vec<BookingWithRelations>,
    ) -> Vec<Self> {
        bookings
            .into_iter()
            .map(Self::from_booking_with_relations)
            .collect::<Vec<Self>>()
    }
}

/// Get a single booking by its code, the e-ticket
///
/// Only the owner and admins get to see it; anything else reads as not found
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/bookings/WST-ABCD2345
/// ```
///
/// Response:
/// ```json
/// { "data": { "booking_code": "WST-ABCD2345", "qr_payload": "wisata://ticket/WST-ABCD2345", ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(code): PathParameters<String>,
) -> Result<Success<BookingResponse>, Error> {
    let booking = storage
        .find_single_booking_by_code(&code)
        .await
        .map_err(Error::internal_server_error)?;

    // a foreign booking reads the same as a missing one
    let Some(booking) = booking.filter(|booking| {
        booking.user_id == current_user.id || current_user.role == Role::Admin
    }) else {
        return Err(Error::not_found("Booking not found"));
    };

    let details = storage
        .find_booking_details(&booking.id)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(BookingResponse::from_booking(booking, details)))
}

/// List the bookings of the current user, newest first
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/my-bookings
/// ```
pub async fn mine<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<BookingResponse>>, Error> {
    current_user.role.is_allowed(Role::Customer)?;

    let bookings = storage
        .find_all_bookings_by_user(&current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    let mut responses = Vec::with_capacity(bookings.len());

    for booking in bookings {
        let details = storage
            .find_booking_details(&booking.id)
            .await
            .map_err(Error::internal_server_error)?;

        responses.push(BookingResponse::from_booking(booking, details));
    }

    Ok(Success::ok(responses))
}

/// List all bookings, newest first
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/admin/bookings
/// ```
pub async fn list_all<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<BookingSummaryResponse>>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let bookings = storage
        .find_all_bookings()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(
        BookingSummaryResponse::from_booking_with_relations_multiple(bookings),
    ))
}

/// Update booking status form
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusForm {
    /// The new status
    status: BookingStatus,
}

/// Settle a booking based on the [`UpdateBookingStatusForm`](UpdateBookingStatusForm) form
///
/// Only pending bookings can move, to success or failed; settled bookings
/// are immutable
///
/// Request:
/// ```sh
/// curl -v -XPATCH -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "status": "success" }' \
///     http://localhost:6000/api/admin/bookings/WST-ABCD2345/status
/// ```
pub async fn update_status<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(code): PathParameters<String>,
    Form(form): Form<UpdateBookingStatusForm>,
) -> Result<Success<BookingResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let booking = storage
        .find_single_booking_by_code(&code)
        .await
        .map_err(Error::internal_server_error)?
        .ok_or_else(|| Error::not_found("Booking not found"))?;

    if !booking.status.can_transition_to(form.status) {
        return Err(Error::bad_request("Booking is already settled"));
    }

    let paid_at = match form.status {
        BookingStatus::Success => Some(Utc::now().naive_utc()),
        BookingStatus::Pending | BookingStatus::Failed => None,
    };

    let values = UpdateBookingStatusValues {
        status: form.status,
        paid_at,
    };

    let updated_booking = storage
        .update_booking_status(&booking, &values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::info!(
        "Booking {} settled as {:?} by {}",
        updated_booking.code,
        updated_booking.status,
        current_user.username,
    );

    let details = storage
        .find_booking_details(&updated_booking.id)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(BookingResponse::from_booking(
        updated_booking,
        details,
    )))
}
