//! Category API endpoints
//!
//! Everything related to the category management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::categories::Category;
use crate::storage::CreateCategoryValues;
use crate::storage::Storage;
use crate::storage::UpdateCategoryValues;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::slugify;

/// Category response going to the user
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Slug derived from the name
    pub slug: String,
}

impl CategoryResponse {
    /// Create a response from a [`Category`](Category)
    fn from_category(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }

    /// Create a response from multiple [`Category`](Category)s
    fn from_category_multiple(categories: Vec<Category>) -> Vec<Self> {
        categories
            .into_iter()
            .map(Self::from_category)
            .collect::<Vec<Self>>()
    }
}

/// List all categories
///
/// Public, the storefront groups destinations with it
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "name": "Pantai", "slug": "pantai" } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<CategoryResponse>>, Error> {
    let categories = storage
        .find_all_categories()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(CategoryResponse::from_category_multiple(
        categories,
    )))
}

/// Create category form
#[derive(Debug, Deserialize)]
pub struct CreateCategoryForm {
    /// Name to create a category with, the slug is derived from it
    name: String,
}

/// Create a category based on the [`CreateCategoryForm`](CreateCategoryForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "name": "Pantai" }' \
///     http://localhost:6000/api/categories
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CreateCategoryForm>,
) -> Result<Success<CategoryResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let slug = slugify(&form.name);

    if slug.is_empty() {
        return Err(Error::bad_request("Name can not be empty"));
    }

    let category = storage
        .find_single_category_by_slug(&slug)
        .await
        .map_err(Error::internal_server_error)?;

    if category.is_some() {
        return Err(Error::bad_request("Slug already exists"));
    }

    let values = CreateCategoryValues {
        name: &form.name,
        slug: &slug,
    };

    let category = storage
        .create_category(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(CategoryResponse::from_category(category)))
}

/// Update category form
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryForm {
    /// New name, the slug is re-derived from it
    name: String,
}

/// Rename a category based on the [`UpdateCategoryForm`](UpdateCategoryForm) form
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(category_id): PathParameters<Uuid>,
    Form(form): Form<UpdateCategoryForm>,
) -> Result<Success<CategoryResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let category = fetch_category(&storage, &category_id).await?;

    let slug = slugify(&form.name);

    if slug.is_empty() {
        return Err(Error::bad_request("Name can not be empty"));
    }

    if slug != category.slug {
        let existing = storage
            .find_single_category_by_slug(&slug)
            .await
            .map_err(Error::internal_server_error)?;

        if existing.is_some() {
            return Err(Error::bad_request("Slug already exists"));
        }
    }

    let values = UpdateCategoryValues {
        name: &form.name,
        slug: &slug,
    };

    let updated_category = storage
        .update_category(&category, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(CategoryResponse::from_category(
        updated_category,
    )))
}

/// Delete a category
///
/// Categories still referenced by destinations can not be deleted
pub async fn remove<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(category_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let category = fetch_category(&storage, &category_id).await?;

    let references = storage
        .count_destinations_by_category(&category.id)
        .await
        .map_err(Error::internal_server_error)?;

    if references > 0 {
        return Err(Error::bad_request(
            "Category is still referenced by destinations",
        ));
    }

    storage
        .delete_category(&category)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::<&'static str>::no_content())
}

/// Fetch category from storage
async fn fetch_category<S: Storage>(storage: &S, category_id: &Uuid) -> Result<Category, Error> {
    storage
        .find_single_category_by_id(category_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Category not found")), Ok)
}
