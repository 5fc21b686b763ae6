//! Postgres storage
//!
//! Runtime-checked queries over a connection pool; migrations are embedded
//! and run on startup.

use std::time::Duration;

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use sqlx::PgPool;
use sqlx::QueryBuilder;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
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

use super::CheckoutValues;
use super::CreateCartItemValues;
use super::CreateCategoryValues;
use super::CreateDestinationValues;
use super::CreateUserValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateBookingStatusValues;
use super::UpdateCategoryValues;
use super::UpdateDestinationValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }

    /// Bookings with their relations, newest first
    async fn bookings_with_relations(
        &self,
        range: Option<&DateRange>,
        limit: Option<i64>,
    ) -> Result<Vec<BookingWithRelations>> {
        let mut builder = QueryBuilder::new("SELECT * FROM bookings");

        if let Some(range) = range {
            builder
                .push(" WHERE created_at >= ")
                .push_bind(range.start_at())
                .push(" AND created_at < ")
                .push_bind(range.end_before());
        }

        builder.push(" ORDER BY created_at DESC");

        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let bookings = builder
            .build_query_as::<SqlxBooking>()
            .fetch_all(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        let mut with_relations = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let booking = booking.into_booking();

            let user = sqlx::query_as::<_, SqlxUser>("SELECT * FROM users WHERE id = $1")
                .bind(booking.user_id)
                .fetch_one(&self.connection_pool)
                .await
                .map(SqlxUser::into_user)
                .map_err(connection_error)?;

            let details = self.find_booking_details(&booking.id).await?;

            with_relations.push(BookingWithRelations {
                booking,
                user,
                details,
            });
        }

        Ok(with_relations)
    }
}

#[async_trait::async_trait]
impl Storage for Postgres {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>("SELECT * FROM users LIMIT 1")
            .fetch_optional(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(user.map(SqlxUser::into_user))
    }

    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, SqlxUser>("SELECT * FROM users WHERE username = $1 LIMIT 1")
                .bind(username)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(user.map(SqlxUser::into_user))
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>("SELECT * FROM users WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(user.map(SqlxUser::into_user))
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, SqlxUser>(
            "INSERT INTO users (id, session_id, username, hashed_password, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(values.session_id)
        .bind(values.username)
        .bind(values.hashed_password)
        .bind(UserRoleType::from_role(values.role))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.into_user())
    }

    async fn count_users_by_role(&self, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(UserRoleType::from_role(role))
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(count)
    }

    async fn find_all_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, SqlxCategory>("SELECT * FROM categories ORDER BY name")
                .fetch_all(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(categories
            .into_iter()
            .map(SqlxCategory::into_category)
            .collect())
    }

    async fn find_single_category_by_id(&self, id: &Uuid) -> Result<Option<Category>> {
        let category =
            sqlx::query_as::<_, SqlxCategory>("SELECT * FROM categories WHERE id = $1 LIMIT 1")
                .bind(id)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(category.map(SqlxCategory::into_category))
    }

    async fn find_single_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let category =
            sqlx::query_as::<_, SqlxCategory>("SELECT * FROM categories WHERE slug = $1 LIMIT 1")
                .bind(slug)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(category.map(SqlxCategory::into_category))
    }

    async fn create_category(&self, values: &CreateCategoryValues<'_>) -> Result<Category> {
        let category = sqlx::query_as::<_, SqlxCategory>(
            "INSERT INTO categories (id, name, slug)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(values.name)
        .bind(values.slug)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(category.into_category())
    }

    async fn update_category(
        &self,
        category: &Category,
        values: &UpdateCategoryValues<'_>,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, SqlxCategory>(
            "UPDATE categories
             SET name = $1, slug = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $3
             RETURNING *",
        )
        .bind(values.name)
        .bind(values.slug)
        .bind(category.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(category.into_category())
    }

    async fn delete_category(&self, category: &Category) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category.id)
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }

    async fn count_destinations_by_category(&self, category_id: &Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM destinations WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(count)
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        let destinations = sqlx::query_as::<_, SqlxDestination>(
            "SELECT * FROM destinations ORDER BY created_at DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destinations
            .into_iter()
            .map(SqlxDestination::into_destination)
            .collect())
    }

    async fn find_active_destinations(&self) -> Result<Vec<Destination>> {
        let destinations = sqlx::query_as::<_, SqlxDestination>(
            "SELECT * FROM destinations WHERE is_active ORDER BY created_at DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destinations
            .into_iter()
            .map(SqlxDestination::into_destination)
            .collect())
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        let destination = sqlx::query_as::<_, SqlxDestination>(
            "SELECT * FROM destinations WHERE id = $1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destination.map(SqlxDestination::into_destination))
    }

    async fn find_single_destination_by_slug(&self, slug: &str) -> Result<Option<Destination>> {
        let destination = sqlx::query_as::<_, SqlxDestination>(
            "SELECT * FROM destinations WHERE slug = $1 LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destination.map(SqlxDestination::into_destination))
    }

    async fn create_destination(
        &self,
        values: &CreateDestinationValues<'_>,
    ) -> Result<Destination> {
        let destination = sqlx::query_as::<_, SqlxDestination>(
            "INSERT INTO destinations (id, category_id, name, slug, description, price,
                                       location, image_url, meta_title, meta_description,
                                       meta_keywords)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(values.category_id)
        .bind(values.name)
        .bind(values.slug)
        .bind(values.description)
        .bind(values.price)
        .bind(values.location)
        .bind(values.image_url)
        .bind(values.meta_title)
        .bind(values.meta_description)
        .bind(values.meta_keywords)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(destination.into_destination())
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues<'_>,
    ) -> Result<Destination> {
        let updated_destination = sqlx::query_as::<_, SqlxDestination>(
            "UPDATE destinations
             SET category_id = $1, name = $2, description = $3, price = $4, location = $5,
                 image_url = $6, meta_title = $7, meta_description = $8, meta_keywords = $9,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = $10
             RETURNING *",
        )
        .bind(values.category_id.unwrap_or(&destination.category_id))
        .bind(values.name.unwrap_or(&destination.name))
        .bind(values.description.unwrap_or(&destination.description))
        .bind(values.price.unwrap_or(destination.price))
        .bind(values.location.unwrap_or(&destination.location))
        .bind(values.image_url.or(destination.image_url.as_deref()))
        .bind(values.meta_title.or(destination.meta_title.as_deref()))
        .bind(
            values
                .meta_description
                .or(destination.meta_description.as_deref()),
        )
        .bind(values.meta_keywords.or(destination.meta_keywords.as_deref()))
        .bind(destination.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(updated_destination.into_destination())
    }

    async fn hide_destination(&self, destination: &Destination) -> Result<()> {
        sqlx::query(
            "UPDATE destinations
             SET is_active = FALSE, updated_at = CURRENT_TIMESTAMP
             WHERE id = $1",
        )
        .bind(destination.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn find_all_cart_items_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<(CartItem, Destination)>> {
        let cart_items = sqlx::query_as::<_, SqlxCartItem>(
            "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        let mut with_destinations = Vec::with_capacity(cart_items.len());

        for cart_item in cart_items {
            let cart_item = cart_item.into_cart_item();

            let destination = sqlx::query_as::<_, SqlxDestination>(
                "SELECT * FROM destinations WHERE id = $1",
            )
            .bind(cart_item.destination_id)
            .fetch_one(&self.connection_pool)
            .await
            .map(SqlxDestination::into_destination)
            .map_err(connection_error)?;

            with_destinations.push((cart_item, destination));
        }

        Ok(with_destinations)
    }

    async fn find_single_cart_item_by_id(&self, id: &Uuid) -> Result<Option<CartItem>> {
        let cart_item =
            sqlx::query_as::<_, SqlxCartItem>("SELECT * FROM cart_items WHERE id = $1 LIMIT 1")
                .bind(id)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(cart_item.map(SqlxCartItem::into_cart_item))
    }

    async fn create_cart_item(&self, values: &CreateCartItemValues<'_>) -> Result<CartItem> {
        let cart_item = sqlx::query_as::<_, SqlxCartItem>(
            "INSERT INTO cart_items (id, user_id, destination_id, quantity, visit_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(values.user.id)
        .bind(values.destination.id)
        .bind(values.quantity)
        .bind(values.visit_date)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(cart_item.into_cart_item())
    }

    async fn delete_cart_item(&self, cart_item: &CartItem) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(cart_item.id)
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }

    async fn checkout(&self, values: &CheckoutValues<'_>) -> Result<Booking> {
        let mut tx = self
            .connection_pool
            .begin()
            .await
            .map_err(connection_error)?;

        // the delete doubles as the row-level lock: a concurrent checkout
        // over any of the same items deletes fewer rows than expected and
        // the whole transaction rolls back
        let cart_item_ids = values
            .items
            .iter()
            .map(|item| item.cart_item_id)
            .collect::<Vec<_>>();

        let deleted = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND id = ANY($2)")
            .bind(values.user.id)
            .bind(&cart_item_ids)
            .execute(&mut *tx)
            .await
            .map_err(connection_error)?;

        if deleted.rows_affected() != cart_item_ids.len() as u64 {
            return Err(Error::CartItemConsumed);
        }

        let booking = sqlx::query_as::<_, SqlxBooking>(
            "INSERT INTO bookings (id, user_id, code, status, payment_method, grand_total,
                                   qr_payload, paid_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(values.user.id)
        .bind(values.code)
        .bind(BookingStatusType::from_status(values.status))
        .bind(PaymentMethodType::from_payment_method(values.payment_method))
        .bind(values.grand_total)
        .bind(values.qr_payload)
        .bind(values.paid_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if err
                .as_database_error()
                .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
            {
                Error::BookingCodeExists
            } else {
                connection_error(err)
            }
        })?;

        let booking = booking.into_booking();

        for item in values.items {
            sqlx::query(
                "INSERT INTO booking_details (id, booking_id, destination_id, quantity,
                                              visit_date, subtotal)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::new_v4())
            .bind(booking.id)
            .bind(item.destination_id)
            .bind(item.quantity)
            .bind(item.visit_date)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await
            .map_err(connection_error)?;
        }

        tx.commit().await.map_err(connection_error)?;

        Ok(booking)
    }

    async fn find_single_booking_by_code(&self, code: &str) -> Result<Option<Booking>> {
        let booking =
            sqlx::query_as::<_, SqlxBooking>("SELECT * FROM bookings WHERE code = $1 LIMIT 1")
                .bind(code)
                .fetch_optional(&self.connection_pool)
                .await
                .map_err(connection_error)?;

        Ok(booking.map(SqlxBooking::into_booking))
    }

    async fn find_all_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, SqlxBooking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(bookings.into_iter().map(SqlxBooking::into_booking).collect())
    }

    async fn find_all_bookings(&self) -> Result<Vec<BookingWithRelations>> {
        self.bookings_with_relations(None, None).await
    }

    async fn find_booking_details(
        &self,
        booking_id: &Uuid,
    ) -> Result<Vec<(BookingDetail, Destination)>> {
        let details = sqlx::query_as::<_, SqlxBookingDetail>(
            "SELECT * FROM booking_details WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        let mut with_destinations = Vec::with_capacity(details.len());

        for detail in details {
            let detail = detail.into_booking_detail();

            let destination = sqlx::query_as::<_, SqlxDestination>(
                "SELECT * FROM destinations WHERE id = $1",
            )
            .bind(detail.destination_id)
            .fetch_one(&self.connection_pool)
            .await
            .map(SqlxDestination::into_destination)
            .map_err(connection_error)?;

            with_destinations.push((detail, destination));
        }

        Ok(with_destinations)
    }

    async fn update_booking_status(
        &self,
        booking: &Booking,
        values: &UpdateBookingStatusValues,
    ) -> Result<Booking> {
        let booking = sqlx::query_as::<_, SqlxBooking>(
            "UPDATE bookings
             SET status = $1, paid_at = $2
             WHERE id = $3
             RETURNING *",
        )
        .bind(BookingStatusType::from_status(values.status))
        .bind(values.paid_at)
        .bind(booking.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(booking.into_booking())
    }

    async fn sum_booking_revenue(&self, range: Option<&DateRange>) -> Result<i64> {
        let mut builder = QueryBuilder::new(
            "SELECT COALESCE(SUM(grand_total), 0)::BIGINT FROM bookings WHERE status = 'success'",
        );

        push_created_at_filter(&mut builder, range);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(total)
    }

    async fn count_success_bookings(&self, range: Option<&DateRange>) -> Result<i64> {
        let mut builder =
            QueryBuilder::new("SELECT COUNT(*) FROM bookings WHERE status = 'success'");

        push_created_at_filter(&mut builder, range);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(count)
    }

    async fn sum_tickets_sold(&self, range: Option<&DateRange>) -> Result<i64> {
        // the date predicate applies to the parent booking, not the detail
        let mut builder = QueryBuilder::new(
            "SELECT COALESCE(SUM(booking_details.quantity), 0)::BIGINT
             FROM booking_details
             JOIN bookings ON bookings.id = booking_details.booking_id
             WHERE bookings.status = 'success'",
        );

        if let Some(range) = range {
            builder
                .push(" AND bookings.created_at >= ")
                .push_bind(range.start_at())
                .push(" AND bookings.created_at < ")
                .push_bind(range.end_before());
        }

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(total)
    }

    async fn find_recent_bookings(
        &self,
        range: Option<&DateRange>,
        limit: usize,
    ) -> Result<Vec<BookingWithRelations>> {
        self.bookings_with_relations(range, Some(limit as i64)).await
    }
}

/// Append the booking creation date predicate to an aggregation query
fn push_created_at_filter(
    builder: &mut QueryBuilder<'_, sqlx::Postgres>,
    range: Option<&DateRange>,
) {
    if let Some(range) = range {
        builder
            .push(" AND created_at >= ")
            .push_bind(range.start_at())
            .push(" AND created_at < ")
            .push_bind(range.end_before());
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

/// `SQLx` type for user role
#[derive(Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "user_role")]
#[sqlx(rename_all = "kebab-case")]
enum UserRoleType {
    /// Admin
    Admin,

    /// Customer
    Customer,
}

impl UserRoleType {
    /// Create user role type from role
    fn from_role(role: Role) -> Self {
        match role {
            Role::Admin => UserRoleType::Admin,
            Role::Customer => UserRoleType::Customer,
        }
    }

    /// Create role from user role type
    fn to_role(&self) -> Role {
        match self {
            UserRoleType::Admin => Role::Admin,
            UserRoleType::Customer => Role::Customer,
        }
    }
}

/// `SQLx` type for booking status
#[derive(Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "booking_status")]
#[sqlx(rename_all = "lowercase")]
enum BookingStatusType {
    /// Awaiting settlement
    Pending,

    /// Paid
    Success,

    /// Settlement failed
    Failed,
}

impl BookingStatusType {
    /// Create booking status type from status
    fn from_status(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => BookingStatusType::Pending,
            BookingStatus::Success => BookingStatusType::Success,
            BookingStatus::Failed => BookingStatusType::Failed,
        }
    }

    /// Create status from booking status type
    fn to_status(&self) -> BookingStatus {
        match self {
            BookingStatusType::Pending => BookingStatus::Pending,
            BookingStatusType::Success => BookingStatus::Success,
            BookingStatusType::Failed => BookingStatus::Failed,
        }
    }
}

/// `SQLx` type for payment method
#[derive(Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "payment_method")]
#[sqlx(rename_all = "lowercase")]
enum PaymentMethodType {
    /// Cash on arrival
    Cod,

    /// QRIS scan
    Qris,

    /// Bank transfer
    Transfer,
}

impl PaymentMethodType {
    /// Create payment method type from payment method
    fn from_payment_method(payment_method: PaymentMethod) -> Self {
        match payment_method {
            PaymentMethod::Cod => PaymentMethodType::Cod,
            PaymentMethod::Qris => PaymentMethodType::Qris,
            PaymentMethod::Transfer => PaymentMethodType::Transfer,
        }
    }

    /// Create payment method from payment method type
    fn to_payment_method(&self) -> PaymentMethod {
        match self {
            PaymentMethodType::Cod => PaymentMethod::Cod,
            PaymentMethodType::Qris => PaymentMethod::Qris,
            PaymentMethodType::Transfer => PaymentMethod::Transfer,
        }
    }
}

/// `SQLx` row for a user
#[derive(sqlx::FromRow)]
struct SqlxUser {
    id: Uuid,
    session_id: Uuid,
    username: String,
    hashed_password: String,
    role: UserRoleType,
    created_at: NaiveDateTime,
}

impl SqlxUser {
    fn into_user(self) -> User {
        User {
            id: self.id,
            session_id: self.session_id,
            username: self.username,
            hashed_password: self.hashed_password,
            role: self.role.to_role(),
            created_at: self.created_at,
        }
    }
}

/// `SQLx` row for a category
#[derive(sqlx::FromRow)]
struct SqlxCategory {
    id: Uuid,
    name: String,
    slug: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl SqlxCategory {
    fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `SQLx` row for a destination
#[derive(sqlx::FromRow)]
struct SqlxDestination {
    id: Uuid,
    category_id: Uuid,
    name: String,
    slug: String,
    description: String,
    price: i64,
    location: String,
    image_url: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    meta_keywords: Option<String>,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl SqlxDestination {
    fn into_destination(self) -> Destination {
        Destination {
            id: self.id,
            category_id: self.category_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            location: self.location,
            image_url: self.image_url,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `SQLx` row for a cart item
#[derive(sqlx::FromRow)]
struct SqlxCartItem {
    id: Uuid,
    user_id: Uuid,
    destination_id: Uuid,
    quantity: i32,
    visit_date: NaiveDate,
    created_at: NaiveDateTime,
}

impl SqlxCartItem {
    fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            user_id: self.user_id,
            destination_id: self.destination_id,
            quantity: self.quantity,
            visit_date: self.visit_date,
            created_at: self.created_at,
        }
    }
}

/// `SQLx` row for a booking
#[derive(sqlx::FromRow)]
struct SqlxBooking {
    id: Uuid,
    user_id: Uuid,
    code: String,
    status: BookingStatusType,
    payment_method: PaymentMethodType,
    grand_total: i64,
    qr_payload: String,
    paid_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl SqlxBooking {
    fn into_booking(self) -> Booking {
        Booking {
            id: self.id,
            user_id: self.user_id,
            code: self.code,
            status: self.status.to_status(),
            payment_method: self.payment_method.to_payment_method(),
            grand_total: self.grand_total,
            qr_payload: self.qr_payload,
            paid_at: self.paid_at,
            created_at: self.created_at,
        }
    }
}

/// `SQLx` row for a booking detail
#[derive(sqlx::FromRow)]
struct SqlxBookingDetail {
    id: Uuid,
    booking_id: Uuid,
    destination_id: Uuid,
    quantity: i32,
    visit_date: NaiveDate,
    subtotal: i64,
}

impl SqlxBookingDetail {
    fn into_booking_detail(self) -> BookingDetail {
        BookingDetail {
            id: self.id,
            booking_id: self.booking_id,
            destination_id: self.destination_id,
            quantity: self.quantity,
            visit_date: self.visit_date,
            subtotal: self.subtotal,
        }
    }
}
