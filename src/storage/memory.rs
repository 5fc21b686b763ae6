//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::bookings::Booking;
use crate::bookings::BookingDetail;
use crate::bookings::BookingStatus;
use crate::bookings::BookingWithRelations;
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

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All categories in storage
    categories: Arc<Mutex<HashMap<Uuid, Category>>>,

    /// All destinations in storage
    destinations: Arc<Mutex<HashMap<Uuid, Destination>>>,

    /// All cart items in storage
    cart_items: Arc<Mutex<HashMap<Uuid, CartItem>>>,

    /// All bookings in storage
    bookings: Arc<Mutex<HashMap<Uuid, Booking>>>,

    /// All booking details in storage
    booking_details: Arc<Mutex<HashMap<Uuid, BookingDetail>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            categories: Arc::new(Mutex::new(HashMap::new())),
            destinations: Arc::new(Mutex::new(HashMap::new())),
            cart_items: Arc::new(Mutex::new(HashMap::new())),
            bookings: Arc::new(Mutex::new(HashMap::new())),
            booking_details: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Join a booking with its user and details
    ///
    /// Takes the maps instead of the mutexes so list methods lock once
    fn with_relations(
        booking: &Booking,
        users: &HashMap<Uuid, User>,
        destinations: &HashMap<Uuid, Destination>,
        booking_details: &HashMap<Uuid, BookingDetail>,
    ) -> BookingWithRelations {
        let user = users
            .get(&booking.user_id)
            .expect("Booking has a valid user_id")
            .clone();

        let details = booking_details
            .values()
            .filter(|detail| detail.booking_id == booking.id)
            .map(|detail| {
                let destination = destinations
                    .get(&detail.destination_id)
                    .expect("Booking detail has a valid destination_id")
                    .clone();

                (detail.clone(), destination)
            })
            .collect();

        BookingWithRelations {
            booking: booking.clone(),
            user,
            details,
        }
    }

    /// All bookings in range, any status, newest first
    async fn bookings_with_relations(
        &self,
        range: Option<&DateRange>,
        limit: Option<usize>,
    ) -> Vec<BookingWithRelations> {
        // lock order: users, destinations, bookings, details
        let users = self.users.lock().await;
        let destinations = self.destinations.lock().await;
        let bookings = self.bookings.lock().await;
        let booking_details = self.booking_details.lock().await;

        let mut matching = bookings
            .values()
            .filter(|booking| range.is_none_or(|range| range.contains(booking.created_at)))
            .collect::<Vec<_>>();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        matching
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|booking| Self::with_relations(booking, &users, &destinations, &booking_details))
            .collect()
    }
}

#[async_trait::async_trait]
impl Storage for Memory {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        Ok(self.users.lock().await.values().next().cloned())
    }

    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            session_id: *values.session_id,
            username: values.username.to_string(),
            hashed_password: values.hashed_password.to_string(),
            role: values.role,
            created_at: Utc::now().naive_utc(),
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn count_users_by_role(&self, role: Role) -> Result<i64> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .filter(|user| user.role == role)
            .count() as i64)
    }

    async fn find_all_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self
            .categories
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();

        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(categories)
    }

    async fn find_single_category_by_id(&self, id: &Uuid) -> Result<Option<Category>> {
        Ok(self.categories.lock().await.get(id).cloned())
    }

    async fn find_single_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .await
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }

    async fn create_category(&self, values: &CreateCategoryValues<'_>) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: values.name.to_string(),
            slug: values.slug.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.categories
            .lock()
            .await
            .insert(category.id, category.clone());

        Ok(category)
    }

    async fn update_category(
        &self,
        category: &Category,
        values: &UpdateCategoryValues<'_>,
    ) -> Result<Category> {
        Ok(self
            .categories
            .lock()
            .await
            .get_mut(&category.id)
            .map(|category| {
                category.name = values.name.to_string();
                category.slug = values.slug.to_string();
                category.updated_at = Utc::now().naive_utc();

                category.clone()
            })
            .expect("HashMap is the source of the category"))
    }

    async fn delete_category(&self, category: &Category) -> Result<()> {
        self.categories.lock().await.remove(&category.id);

        Ok(())
    }

    async fn count_destinations_by_category(&self, category_id: &Uuid) -> Result<i64> {
        Ok(self
            .destinations
            .lock()
            .await
            .values()
            .filter(|destination| &destination.category_id == category_id)
            .count() as i64)
    }

    async fn find_all_destinations(&self) -> Result<Vec<Destination>> {
        let mut destinations = self
            .destinations
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();

        destinations.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(destinations)
    }

    async fn find_active_destinations(&self) -> Result<Vec<Destination>> {
        let mut destinations = self
            .destinations
            .lock()
            .await
            .values()
            .filter(|destination| destination.is_active)
            .cloned()
            .collect::<Vec<_>>();

        destinations.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(destinations)
    }

    async fn find_single_destination_by_id(&self, id: &Uuid) -> Result<Option<Destination>> {
        Ok(self.destinations.lock().await.get(id).cloned())
    }

    async fn find_single_destination_by_slug(&self, slug: &str) -> Result<Option<Destination>> {
        Ok(self
            .destinations
            .lock()
            .await
            .values()
            .find(|destination| destination.slug == slug)
            .cloned())
    }

    async fn create_destination(
        &self,
        values: &CreateDestinationValues<'_>,
    ) -> Result<Destination> {
        let destination = Destination {
            id: Uuid::new_v4(),
            category_id: *values.category_id,
            name: values.name.to_string(),
            slug: values.slug.to_string(),
            description: values.description.to_string(),
            price: values.price,
            location: values.location.to_string(),
            image_url: values.image_url.map(ToString::to_string),
            meta_title: values.meta_title.map(ToString::to_string),
            meta_description: values.meta_description.map(ToString::to_string),
            meta_keywords: values.meta_keywords.map(ToString::to_string),
            is_active: true,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.destinations
            .lock()
            .await
            .insert(destination.id, destination.clone());

        Ok(destination)
    }

    async fn update_destination(
        &self,
        destination: &Destination,
        values: &UpdateDestinationValues<'_>,
    ) -> Result<Destination> {
        Ok(self
            .destinations
            .lock()
            .await
            .get_mut(&destination.id)
            .map(|destination| {
                if let Some(category_id) = values.category_id {
                    destination.category_id = *category_id;
                }

                if let Some(name) = values.name {
                    destination.name = name.to_string();
                }

                if let Some(description) = values.description {
                    destination.description = description.to_string();
                }

                if let Some(price) = values.price {
                    destination.price = price;
                }

                if let Some(location) = values.location {
                    destination.location = location.to_string();
                }

                if let Some(image_url) = values.image_url {
                    destination.image_url = Some(image_url.to_string());
                }

                if let Some(meta_title) = values.meta_title {
                    destination.meta_title = Some(meta_title.to_string());
                }

                if let Some(meta_description) = values.meta_description {
                    destination.meta_description = Some(meta_description.to_string());
                }

                if let Some(meta_keywords) = values.meta_keywords {
                    destination.meta_keywords = Some(meta_keywords.to_string());
                }

                destination.updated_at = Utc::now().naive_utc();

                destination.clone()
            })
            .expect("HashMap is the source of the destination"))
    }

    async fn hide_destination(&self, destination: &Destination) -> Result<()> {
        if let Some(destination) = self.destinations.lock().await.get_mut(&destination.id) {
            destination.is_active = false;
            destination.updated_at = Utc::now().naive_utc();
        }

        Ok(())
    }

    async fn find_all_cart_items_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<(CartItem, Destination)>> {
        // lock order: destinations, cart items
        let destinations = self.destinations.lock().await;
        let cart_items = self.cart_items.lock().await;

        let mut items = cart_items
            .values()
            .filter(|item| &item.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();

        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(items
            .into_iter()
            .map(|item| {
                let destination = destinations
                    .get(&item.destination_id)
                    .expect("Cart item has a valid destination_id")
                    .clone();

                (item, destination)
            })
            .collect())
    }

    async fn find_single_cart_item_by_id(&self, id: &Uuid) -> Result<Option<CartItem>> {
        Ok(self.cart_items.lock().await.get(id).cloned())
    }

    async fn create_cart_item(&self, values: &CreateCartItemValues<'_>) -> Result<CartItem> {
        let cart_item = CartItem {
            id: Uuid::new_v4(),
            user_id: values.user.id,
            destination_id: values.destination.id,
            quantity: values.quantity,
            visit_date: values.visit_date,
            created_at: Utc::now().naive_utc(),
        };

        self.cart_items
            .lock()
            .await
            .insert(cart_item.id, cart_item.clone());

        Ok(cart_item)
    }

    async fn delete_cart_item(&self, cart_item: &CartItem) -> Result<()> {
        self.cart_items.lock().await.remove(&cart_item.id);

        Ok(())
    }

    async fn checkout(&self, values: &CheckoutValues<'_>) -> Result<Booking> {
        // All three collections stay locked for the whole conversion, in the
        // global lock order: cart items, bookings, details. Concurrent
        // checkouts serialize here; the loser sees its items gone.
        let mut cart_items = self.cart_items.lock().await;
        let mut bookings = self.bookings.lock().await;
        let mut booking_details = self.booking_details.lock().await;

        for item in values.items {
            let present = cart_items
                .get(&item.cart_item_id)
                .is_some_and(|cart_item| cart_item.user_id == values.user.id);

            if !present {
                return Err(Error::CartItemConsumed);
            }
        }

        if bookings.values().any(|booking| booking.code == values.code) {
            return Err(Error::BookingCodeExists);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: values.user.id,
            code: values.code.to_string(),
            status: values.status,
            payment_method: values.payment_method,
            grand_total: values.grand_total,
            qr_payload: values.qr_payload.to_string(),
            paid_at: values.paid_at,
            created_at: Utc::now().naive_utc(),
        };

        bookings.insert(booking.id, booking.clone());

        for item in values.items {
            let detail = BookingDetail {
                id: Uuid::new_v4(),
                booking_id: booking.id,
                destination_id: item.destination_id,
                quantity: item.quantity,
                visit_date: item.visit_date,
                subtotal: item.subtotal,
            };

            booking_details.insert(detail.id, detail);

            cart_items.remove(&item.cart_item_id);
        }

        Ok(booking)
    }

    async fn find_single_booking_by_code(&self, code: &str) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .await
            .values()
            .find(|booking| booking.code == code)
            .cloned())
    }

    async fn find_all_bookings_by_user(&self, user_id: &Uuid) -> Result<Vec<Booking>> {
        let mut bookings = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|booking| &booking.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();

        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(bookings)
    }

    async fn find_all_bookings(&self) -> Result<Vec<BookingWithRelations>> {
        Ok(self.bookings_with_relations(None, None).await)
    }

    async fn find_booking_details(
        &self,
        booking_id: &Uuid,
    ) -> Result<Vec<(BookingDetail, Destination)>> {
        // lock order: destinations, details
        let destinations = self.destinations.lock().await;
        let booking_details = self.booking_details.lock().await;

        Ok(booking_details
            .values()
            .filter(|detail| &detail.booking_id == booking_id)
            .map(|detail| {
                let destination = destinations
                    .get(&detail.destination_id)
                    .expect("Booking detail has a valid destination_id")
                    .clone();

                (detail.clone(), destination)
            })
            .collect())
    }

    async fn update_booking_status(
        &self,
        booking: &Booking,
        values: &UpdateBookingStatusValues,
    ) -> Result<Booking> {
        Ok(self
            .bookings
            .lock()
            .await
            .get_mut(&booking.id)
            .map(|booking| {
                booking.status = values.status;
                booking.paid_at = values.paid_at;

                booking.clone()
            })
            .expect("HashMap is the source of the booking"))
    }

    async fn sum_booking_revenue(&self, range: Option<&DateRange>) -> Result<i64> {
        Ok(self
            .bookings
            .lock()
            .await
            .values()
            .filter(|booking| booking.status == BookingStatus::Success)
            .filter(|booking| range.is_none_or(|range| range.contains(booking.created_at)))
            .map(|booking| booking.grand_total)
            .sum())
    }

    async fn count_success_bookings(&self, range: Option<&DateRange>) -> Result<i64> {
        Ok(self
            .bookings
            .lock()
            .await
            .values()
            .filter(|booking| booking.status == BookingStatus::Success)
            .filter(|booking| range.is_none_or(|range| range.contains(booking.created_at)))
            .count() as i64)
    }

    async fn sum_tickets_sold(&self, range: Option<&DateRange>) -> Result<i64> {
        // lock order: bookings, details; the date predicate applies to the
        // parent booking
        let bookings = self.bookings.lock().await;
        let booking_details = self.booking_details.lock().await;

        Ok(booking_details
            .values()
            .filter(|detail| {
                bookings.get(&detail.booking_id).is_some_and(|booking| {
                    booking.status == BookingStatus::Success
                        && range.is_none_or(|range| range.contains(booking.created_at))
                })
            })
            .map(|detail| i64::from(detail.quantity))
            .sum())
    }

    async fn find_recent_bookings(
        &self,
        range: Option<&DateRange>,
        limit: usize,
    ) -> Result<Vec<BookingWithRelations>> {
        Ok(self.bookings_with_relations(range, Some(limit)).await)
    }
}
