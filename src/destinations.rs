//! Tourism destinations, the sellable catalog

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A bookable tourism destination
///
/// Prices are whole currency units, no cents
#[derive(Clone, Debug)]
pub struct Destination {
    /// Destination ID
    pub id: Uuid,

    /// Category the destination belongs to
    pub category_id: Uuid,

    /// Display name
    pub name: String,

    /// External identifier, derived from the name, unique
    pub slug: String,

    /// Long form description for the storefront
    pub description: String,

    /// Ticket price per person, whole currency units
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

    /// Hidden destinations are not sold, but stay referenced by bookings
    pub is_active: bool,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}
