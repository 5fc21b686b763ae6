//! Destination categories

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// Grouping for destinations (beaches, temples, ...)
///
/// The slug is derived from the name and unique
#[derive(Clone, Debug)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
