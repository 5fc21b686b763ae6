//! Dashboard API endpoint
//!
//! The back-office statistics over the booking corpus

use axum::Extension;
use axum::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::stats::DashboardStats;
use crate::stats::DateRange;
use crate::stats::compute_stats;
use crate::storage::Storage;
use crate::users::Role;

use super::CurrentUser;
use super::Error;
use super::Success;
use super::bookings::BookingSummaryResponse;

/// Dashboard query parameters
///
/// The date filter only applies when both bounds are present
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// First day of the range
    start_date: Option<NaiveDate>,

    /// Last day of the range, inclusive
    end_date: Option<NaiveDate>,
}

/// Dashboard response going to the user
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Σ grand total over success bookings in range
    pub total_revenue: i64,

    /// Count of success bookings in range
    pub total_bookings: i64,

    /// Σ detail quantity where the parent booking is success and in range
    pub total_tickets_sold: i64,

    /// Count of customers, always all-time
    pub total_users: i64,

    /// Most recent bookings in range, any status, newest first
    pub recent_bookings: Vec<BookingSummaryResponse>,
}

impl DashboardResponse {
    /// Create a response from the computed [`DashboardStats`](DashboardStats)
    fn from_stats(stats: DashboardStats) -> Self {
        Self {
            total_revenue: stats.total_revenue,
            total_bookings: stats.total_bookings,
            total_tickets_sold: stats.total_tickets_sold,
            total_users: stats.total_users,
            recent_bookings: BookingSummaryResponse::from_booking_with_relations_multiple(
                stats.recent_bookings,
            ),
        }
    }
}

/// Compute the dashboard metrics
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:6000/api/admin/dashboard?start_date=2026-08-01&end_date=2026-08-31'
/// ```
///
/// Response:
/// ```json
/// { "data": { "total_revenue": 250000, "total_bookings": 1, "total_tickets_sold": 3,
///             "total_users": 12, "recent_bookings": [ ... ] } }
/// ```
pub async fn stats<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Query(query): Query<DashboardQuery>,
) -> Result<Success<DashboardResponse>, Error> {
    current_user.role.is_allowed(Role::Admin)?;

    let range = DateRange::from_bounds(query.start_date, query.end_date);

    let stats = compute_stats(&storage, range.as_ref())
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(DashboardResponse::from_stats(stats)))
}
