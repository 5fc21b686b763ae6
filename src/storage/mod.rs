//! All things related to the storage of the catalog, carts and bookings

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingDetail;
use crate::bookings::BookingStatus;
use crate::bookings::BookingWithRelations;
use crate::bookings::PaymentMethod;
use crate::cart::CartItem;
use crate::categories::Category;
use crate::destinations::Destination;
use crate::stats::DateRange;
use crate::users::Role;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// A booking with the candidate code already exists
    ///
    /// The checkout engine regenerates and retries on this one.
    #[error("Booking code already exists")]
    BookingCodeExists,

    /// A cart item vanished between loading it and consuming it
    ///
    /// Happens when two checkouts race over the same item; only one of them
    /// observes the item as still present.
    #[error("Cart item is no longer available")]
    CartItemConsumed,
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The role of the user
    pub role: Role,

    /// The username
    pub username: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Category
pub struct CreateCategoryValues<'a> {
    /// Display name
    pub name: &'a str,

    /// Slug derived from the name
    pub slug: &'a str,
}

/// Values to rename a Category
///
/// The slug is re-derived from the new name
pub struct UpdateCategoryValues<'a> {
    /// New display name
    pub name: &'a str,

    /// New slug derived from the new name
    pub slug: &'a str,
}

/// Values to create a Destination
pub struct CreateDestinationValues<'a> {
    /// Category the destination belongs to
    pub category_id: &'a Uuid,

    /// Display name
    pub name: &'a str,

    /// Slug derived from the name
    pub slug: &'a str,

    /// Storefront description
    pub description: &'a str,

    /// Ticket price, whole currency units
    pub price: i64,

    /// Where the destination is
    pub location: &'a str,

    /// Optional hero image
    pub image_url: Option<&'a str>,

    /// SEO title
    pub meta_title: Option<&'a str>,

    /// SEO description
    pub meta_description: Option<&'a str>,

    /// SEO keywords
    pub meta_keywords: Option<&'a str>,
}

/// Values to update a Destination
///
/// All fields are optional and are not touched when not provided; the slug
/// never changes since bookings keep referencing it
pub struct UpdateDestinationValues<'a> {
    /// New category
    pub category_id: Option<&'a Uuid>,

    /// New display name
    pub name: Option<&'a str>,

    /// New description
    pub description: Option<&'a str>,

    /// New price, affects live cart subtotals but never frozen bookings
    pub price: Option<i64>,

    /// New location
    pub location: Option<&'a str>,

    /// New hero image
    pub image_url: Option<&'a str>,

    /// New SEO title
    pub meta_title: Option<&'a str>,

    /// New SEO description
    pub meta_description: Option<&'a str>,

    /// New SEO keywords
    pub meta_keywords: Option<&'a str>,
}

/// Values to create a CartItem
pub struct CreateCartItemValues<'a> {
    /// The customer adding to their cart
    pub user: &'a User,

    /// The destination to visit
    pub destination: &'a Destination,

    /// Number of tickets
    pub quantity: i32,

    /// Planned visit date
    pub visit_date: NaiveDate,
}

/// One cart item as consumed by a checkout
///
/// Quantity, visit date and subtotal are frozen copies taken at checkout
/// time, never re-quoted afterwards.
pub struct CheckoutItem {
    /// The cart item being consumed, deleted by the checkout
    pub cart_item_id: Uuid,

    /// The destination being sold
    pub destination_id: Uuid,

    /// Number of tickets
    pub quantity: i32,

    /// Planned visit date
    pub visit_date: NaiveDate,

    /// Frozen subtotal, destination price at checkout times quantity
    pub subtotal: i64,
}

/// Values for one atomic checkout
pub struct CheckoutValues<'a> {
    /// The customer checking out
    pub user: &'a User,

    /// Candidate booking code, unique or the checkout fails
    pub code: &'a str,

    /// QR payload derived from the code
    pub qr_payload: &'a str,

    /// How the booking is paid
    pub payment_method: PaymentMethod,

    /// Initial status, decided by the payment method
    pub status: BookingStatus,

    /// Settlement timestamp for instantly settled payments
    pub paid_at: Option<NaiveDateTime>,

    /// Frozen sum over all item subtotals
    pub grand_total: i64,

    /// The cart items being consumed
    pub items: &'a [CheckoutItem],
}

/// Values to settle a booking through the back-office
pub struct UpdateBookingStatusValues {
    /// The new status
    pub status: BookingStatus,

    /// Settlement timestamp, set when the booking succeeds
    pub paid_at: Option<NaiveDateTime>,
}

/// Storage with all supported operations
#[async_trait::async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find any single user
    async fn find_any_single_user(&self) -> Result<Option<User>>;

    /// Finds a single user by its username
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User>;

    /// Count users with a given role
    async fn count_users_by_role(&self, role: Role) -> Result<i64>;

    /// Find all categories
    async fn find_all_categories(&self) -> Result<Vec<Category>>;

    /// Find a single category by ID
    async fn find_single_category_by_id(&self, id: &Uuid) -> Result<Option<Category>>;

    /// Find a single category by slug
    async fn find_single_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Create a category
    async fn create_category(&self, values: &CreateCategoryValues<'_>) -> Result<Category>;

    /// Rename a category
    async fn update_category(
        &self,
        category: &Category,
        values: &UpdateCategoryValues<'_>,
    ) -> Result<Category>;

    /// Delete a category
    ///
    /// Callers must verify nothing references it first
    async fn delete_category(&self, category: &Category) -> Result<()>;

    /// Count destinations referencing a category
    async fn count_destinations_by_category(&self, category_id: &Uuid) -> Result<i64>;

    /// Find all destinations, hidden ones included
    async fn find_all_destinations(&self) -> Result<Vec<Destination>>;

    /// Find the active destinations, the public storefront view
    async fn find_active_destinations(&self) -> Result<Vec<Destination>>;

    /// Find a single destination by ID, hidden ones included
    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>>;

    /// Find a single destination by slug, hidden ones included
    async fn find_single_destination_by_slug(&self, slug: &str) -> Result<Option<Destination>>;

    /// Create a destination
    async fn create_destination(
        &self,
        values: &CreateDestinationValues<'_>,
    ) -> Result<Destination>;

    /// Update a single destination
    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues<'_>,
    ) -> Result<Destination>;

    /// Hide a destination from the storefront
    ///
    /// Existing cart items and booking details keep resolving
    async fn hide_destination(&self, destination: &Destination) -> Result<()>;

    /// Find all cart items of a user with their destinations joined
    async fn find_all_cart_items_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<(CartItem, Destination)>>;

    /// Find a single cart item by ID
    async fn find_single_cart_item_by_id(&self, id: &Uuid) -> Result<Option<CartItem>>;

    /// Create a cart item
    async fn create_cart_item(&self, values: &CreateCartItemValues<'_>) -> Result<CartItem>;

    /// Delete a cart item, permanently
    async fn delete_cart_item(&self, cart_item: &CartItem) -> Result<()>;

    /// Atomically convert cart items into a booking
    ///
    /// Creates the booking, creates one detail per consumed item and deletes
    /// the consumed cart items, all-or-nothing. Fails with
    /// [`Error::BookingCodeExists`] on a code collision and with
    /// [`Error::CartItemConsumed`] when any item is already gone; neither
    /// leaves partial state behind.
    async fn checkout(&self, values: &CheckoutValues<'_>) -> Result<Booking>;

    /// Find a single booking by its code
    async fn find_single_booking_by_code(&self, code: &str) -> Result<Option<Booking>>;

    /// Find all bookings of a user, newest first
    async fn find_all_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>>;

    /// Find all bookings with user and details joined, newest first
    async fn find_all_bookings(&self) -> Result<Vec<BookingWithRelations>>;

    /// Find the details of a booking with their destinations joined
    async fn find_booking_details(
        &self,
        booking_id: &Uuid,
    ) -> Result<Vec<(BookingDetail, Destination)>>;

    /// Settle a booking
    ///
    /// Callers must verify the transition is legal first
    async fn update_booking_status(
        &self,
        booking: &Booking,
        values: &UpdateBookingStatusValues,
    ) -> Result<Booking>;

    /// Σ grand total over success bookings in range
    async fn sum_booking_revenue(&self, range: Option<&DateRange>) -> Result<i64>;

    /// Count success bookings in range
    async fn count_success_bookings(&self, range: Option<&DateRange>) -> Result<i64>;

    /// Σ detail quantity where the parent booking is success and in range
    ///
    /// The date predicate applies to the parent booking, not the detail
    async fn sum_tickets_sold(&self, range: Option<&DateRange>) -> Result<i64>;

    /// The most recent bookings in range, any status, newest first
    async fn find_recent_bookings(
        &self,
        range: Option<&DateRange>,
        limit: usize,
    ) -> Result<Vec<BookingWithRelations>>;
}
