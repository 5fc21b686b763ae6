//! Destination API endpoints
//!
//! The public storefront reads and the admin catalog management

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::destinations::Destination;
use crate::storage::CreateDestinationValues;
use crate::storage::Storage;
use crate::storage::UpdateDestinationValues;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::parse_url;
use super::slugify;

/// Destination response going to the user
///
/// Basically filtering which fields are shown to the user
#[derive(Debug, Serialize)]
pub struct DestinationResponse {
    /// Destination ID
    pub id: Uuid,

    /// Category the destination belongs to
    pub category_id: Uuid,

    /// Display name
    pub name: String,

    /// Slug used to identify the destination on the storefront
    pub slug: String,

    /// Storefront description
    pub description: String,

    /// Ticket price, whole currency units
    pub price: i64,

    /// Where the destination is
    pub location: String,

    /// Optional hero image
    pub image_url: Option<String>,

    /// SEO title
    pub meta_title: Option<String>,

    /// SEO description
    pub meta_description: Option<String>,

    /// SEO keywords
    pub meta_keywords: Option<String>,

    /// Hidden destinations are not sold
    pub is_active: bool,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

impl DestinationResponse {
    /// Create a response from a [`Destination`](Destination)
    pub fn from_destination(destination: Destination) -> Self {
        Self {
            id: destination.id,
            category_id: destination.category_id,
            name: destination.name,
            slug: destination.slug,
            description: destination.description,
            price: destination.price,
            location: destination.location,
            image_url: destination.image_url,
            meta_title: destination.meta_title,
            meta_description: destination.meta_description,
            meta_keywords: destination.meta_keywords,
            is_active: destination.is_active,
            created_at: destination.created_at,
            updated_at: destination.updated_at,
        }
    }

    /// Create a response from multiple [`Destination`](Destination)s
    fn from_destination_multiple(destinations: Vec<Destination>) -> Vec<Self> {
        destinations
            .into_iter()
            .map(Self::from_destination)
            .collect::<Vec<Self>>()
    }
}

/// List the active destinations, the public storefront
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "slug": "pantai-kuta", "price": 100000, ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<DestinationResponse>>, Error> {
    let destinations = storage
        .find_active_destinations()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(DestinationResponse::from_destination_multiple(
        destinations,
    )))
}

/// List all destinations, hidden ones included
pub async fn list_all<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<DestinationResponse>>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let destinations = storage
        .find_all_destinations()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(DestinationResponse::from_destination_multiple(
        destinations,
    )))
}

/// Get a single active destination by slug
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/api/destinations/pantai-kuta
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(slug): PathParameters<String>,
) -> Result<Success<DestinationResponse>, Error> {
    let destination = storage
        .find_single_destination_by_slug(&slug)
        .await
        .map_err(Error::internal_server_error)?;

    match destination {
        Some(destination) if destination.is_active => Ok(Success::ok(
            DestinationResponse::from_destination(destination),
        )),
        _ => Err(Error::not_found("Destination not found")),
    }
}

/// Create destination form
///
/// Fields to create a destination with; the slug is derived from the name
#[derive(Debug, Deserialize)]
pub struct CreateDestinationForm {
    /// Category the destination belongs to
    category_id: Uuid,

    /// Display name, the slug is derived from it
    name: String,

    /// Storefront description
    description: String,

    /// Ticket price, whole currency units
    price: i64,

    /// Where the destination is
    location: String,

    /// Optional hero image, must be a valid URL
    image_url: Option<String>,

    /// SEO title
    meta_title: Option<String>,

    /// SEO description
    meta_description: Option<String>,

    /// SEO keywords
    meta_keywords: Option<String>,
}

/// Create a destination based on the [`CreateDestinationForm`](CreateDestinationForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "category_id": "<uuid>", "name": "Pantai Kuta", "price": 100000, ... }' \
///     http://localhost:6000/api/destinations
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CreateDestinationForm>,
) -> Result<Success<DestinationResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let slug = slugify(&form.name);

    if slug.is_empty() {
        return Err(Error::bad_request("Name can not be empty"));
    }

    if form.price < 0 {
        return Err(Error::bad_request("Price can not be negative"));
    }

    if let Some(ref image_url) = form.image_url {
        parse_url(image_url)?;
    }

    let category = storage
        .find_single_category_by_id(&form.category_id)
        .await
        .map_err(Error::internal_server_error)?;

    if category.is_none() {
        return Err(Error::bad_request("Category not found"));
    }

    let destination = storage
        .find_single_destination_by_slug(&slug)
        .await
        .map_err(Error::internal_server_error)?;

    if destination.is_some() {
        return Err(Error::bad_request("Slug already exists"));
    }

    let values = CreateDestinationValues {
        category_id: &form.category_id,
        name: &form.name,
        slug: &slug,
        description: &form.description,
        price: form.price,
        location: &form.location,
        image_url: form.image_url.as_deref(),
        meta_title: form.meta_title.as_deref(),
        meta_description: form.meta_description.as_deref(),
        meta_keywords: form.meta_keywords.as_deref(),
    };

    let destination = storage
        .create_destination(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(DestinationResponse::from_destination(
        destination,
    )))
}

/// Update destination form
///
/// Fields to update a destination with, all fields are optional and are not
/// touched when not provided; the slug never changes
#[derive(Debug, Deserialize)]
pub struct UpdateDestinationForm {
    /// New category
    category_id: Option<Uuid>,

    /// New display name
    name: Option<String>,

    /// New description
    description: Option<String>,

    /// New price, affects live cart subtotals but never frozen bookings
    price: Option<i64>,

    /// New location
    location: Option<String>,

    /// New hero image, must be a valid URL
    image_url: Option<String>,

    /// New SEO title
    meta_title: Option<String>,

    /// New SEO description
    meta_description: Option<String>,

    /// New SEO keywords
    meta_keywords: Option<String>,
}

/// Update a destination based on the [`UpdateDestinationForm`](UpdateDestinationForm) form
///
/// Only provided values are processed, the other fields of the destination
/// will not be touched
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(destination_id): PathParameters<Uuid>,
    Form(form): Form<UpdateDestinationForm>,
) -> Result<Success<DestinationResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let destination = fetch_destination(&storage, &destination_id).await?;

    if let Some(price) = form.price {
        if price < 0 {
            return Err(Error::bad_request("Price can not be negative"));
        }
    }

    if let Some(ref image_url) = form.image_url {
        parse_url(image_url)?;
    }

    if let Some(ref category_id) = form.category_id {
        let category = storage
            .find_single_category_by_id(category_id)
            .await
            .map_err(Error::internal_server_error)?;

        if category.is_none() {
            return Err(Error::bad_request("Category not found"));
        }
    }

    let values = UpdateDestinationValues {
        category_id: form.category_id.as_ref(),
        name: form.name.as_deref(),
        description: form.description.as_deref(),
        price: form.price,
        location: form.location.as_deref(),
        image_url: form.image_url.as_deref(),
        meta_title: form.meta_title.as_deref(),
        meta_description: form.meta_description.as_deref(),
        meta_keywords: form.meta_keywords.as_deref(),
    };

    let updated_destination = storage
        .update_destination(&destination, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(DestinationResponse::from_destination(
        updated_destination,
    )))
}

/// Hide a destination from the storefront
///
/// The destination stays referenced by existing cart items and bookings, it
/// just can not be sold anymore
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/destinations/<uuid>
/// ```
pub async fn remove<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(destination_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let destination = fetch_destination(&storage, &destination_id).await?;

    storage
        .hide_destination(&destination)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

/// Fetch destination from storage
async fn fetch_destination<S: Storage>(
    storage: &S,
    destination_id: &Uuid,
) -> Result<Destination, Error> {
    storage
        .find_single_destination_by_id(destination_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Destination not found")), Ok)
}
