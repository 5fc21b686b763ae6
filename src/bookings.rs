//! Bookings, the immutable result of a checkout
//!
//! A booking freezes the money: the grand total and every detail subtotal
//! are computed once at checkout and never re-quoted from the live catalog.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::destinations::Destination;
use crate::users::User;

/// Booking code prefix, the human-readable part of a ticket identity
const CODE_PREFIX: &str = "WST-";

/// Length of the random part of a booking code
const CODE_LENGTH: usize = 8;

/// Uppercase alphanumerics without the 0/O and 1/I lookalikes
///
/// Exactly 32 characters, so a masked random byte picks uniformly.
const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Payment status of a booking
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting settlement through the back-office
    Pending,
    /// Paid, counts towards revenue
    Success,
    /// Settlement failed or was cancelled
    Failed,
}

impl BookingStatus {
    /// Is a status change legal?
    ///
    /// Bookings only move `pending` → `success` or `pending` → `failed`;
    /// settled bookings are immutable.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (
                BookingStatus::Pending,
                BookingStatus::Success | BookingStatus::Failed
            )
        )
    }
}

/// How a booking is paid
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on arrival
    Cod,
    /// QRIS scan, settles instantly
    Qris,
    /// Bank transfer
    Transfer,
}

impl PaymentMethod {
    /// The status a fresh booking starts in
    ///
    /// QRIS settles synchronously at checkout; cash and bank transfer wait
    /// for confirmation through the back-office.
    pub fn initial_status(self) -> BookingStatus {
        match self {
            PaymentMethod::Qris => BookingStatus::Success,
            PaymentMethod::Cod | PaymentMethod::Transfer => BookingStatus::Pending,
        }
    }
}

/// An immutable record of a completed purchase
#[derive(Clone, Debug)]
pub struct Booking {
    /// Booking ID
    pub id: Uuid,

    /// The customer that bought the tickets
    pub user_id: Uuid,

    /// Unique human-readable booking code
    pub code: String,

    /// Payment status
    pub status: BookingStatus,

    /// How the booking is paid
    pub payment_method: PaymentMethod,

    /// Frozen total over all details, whole currency units
    pub grand_total: i64,

    /// Unique string encoded into the scannable ticket
    pub qr_payload: String,

    /// When the booking was settled, if it was
    pub paid_at: Option<NaiveDateTime>,

    /// Creation date
    pub created_at: NaiveDateTime,
}

/// One destination-ticket line item within a booking
///
/// Quantity, visit date and subtotal are copied from the consumed cart item
/// at checkout and never touched again.
#[derive(Clone, Debug)]
pub struct BookingDetail {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub destination_id: Uuid,
    pub quantity: i32,
    pub visit_date: NaiveDate,
    pub subtotal: i64,
}

/// A booking with its customer and line items joined
///
/// The shape of one row on the dashboard table and the admin booking list.
#[derive(Clone, Debug)]
pub struct BookingWithRelations {
    /// The booking itself, any status
    pub booking: Booking,

    /// The customer that made it
    pub user: User,

    /// Line items with their destinations
    pub details: Vec<(BookingDetail, Destination)>,
}

/// Generate a candidate booking code
///
/// Uniqueness is enforced by storage; callers retry on collision.
pub fn generate_booking_code() -> String {
    let mut bytes = [0_u8; CODE_LENGTH];
    OsRng.fill_bytes(&mut bytes);

    let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_LENGTH);
    code.push_str(CODE_PREFIX);

    for byte in bytes {
        code.push(char::from(CODE_ALPHABET[usize::from(byte) % CODE_ALPHABET.len()]));
    }

    code
}

/// The string encoded into the QR symbol of a ticket
///
/// Unique as long as the booking code is, printable ASCII, bounded length.
pub fn qr_payload(code: &str) -> String {
    format!("wisata://ticket/{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_booking_code() {
        let code = generate_booking_code();

        assert_eq!(code.len(), CODE_PREFIX.len() + CODE_LENGTH);
        assert!(code.starts_with(CODE_PREFIX));
        assert!(
            code[CODE_PREFIX.len()..]
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_qr_payload_embeds_code() {
        let payload = qr_payload("WST-ABCD2345");

        assert_eq!(payload, "wisata://ticket/WST-ABCD2345");
        assert!(payload.is_ascii());
    }

    #[test]
    fn test_initial_status_per_payment_method() {
        assert_eq!(PaymentMethod::Qris.initial_status(), BookingStatus::Success);
        assert_eq!(PaymentMethod::Cod.initial_status(), BookingStatus::Pending);
        assert_eq!(
            PaymentMethod::Transfer.initial_status(),
            BookingStatus::Pending
        );
    }

    #[test]
    fn test_status_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Success));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Failed));

        assert!(!BookingStatus::Success.can_transition_to(BookingStatus::Failed));
        assert!(!BookingStatus::Failed.can_transition_to(BookingStatus::Success));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
    }
}
