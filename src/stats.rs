//! Dashboard statistics over the booking corpus
//!
//! Pure reads; every aggregation is its own storage query, all sharing one
//! [`DateRange`] filter.

use chrono::Days;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::naive::NaiveDateTime;

use crate::bookings::BookingWithRelations;
use crate::storage::Result;
use crate::storage::Storage;
use crate::users::Role;

/// How many bookings the dashboard table shows
const RECENT_BOOKINGS_LIMIT: usize = 5;

/// Inclusive calendar-day range for filtering bookings by creation date
///
/// Covers start-of-day of `start` through end-of-day of `end`. One value is
/// built per dashboard request and applied to every filtered aggregation.
#[derive(Clone, Copy, Debug)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range when both bounds are present
    ///
    /// A single bound filters nothing, matching the lenient query contract
    /// of the dashboard endpoint.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    /// Does a creation timestamp fall within the range?
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();

        date >= self.start && date <= self.end
    }

    /// Inclusive lower bound as a timestamp
    pub fn start_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Exclusive upper bound as a timestamp, first instant after the range
    pub fn end_before(&self) -> NaiveDateTime {
        self.end
            .checked_add_days(Days::new(1))
            .map_or(NaiveDateTime::MAX, |date| date.and_time(NaiveTime::MIN))
    }
}

/// All dashboard metrics in one place
#[derive(Debug)]
pub struct DashboardStats {
    /// Σ grand total over success bookings in range
    pub total_revenue: i64,

    /// Count of success bookings in range
    pub total_bookings: i64,

    /// Σ detail quantity where the parent booking is success and in range
    pub total_tickets_sold: i64,

    /// Count of customers, always all-time
    pub total_users: i64,

    /// Most recent bookings in range, any status, newest first
    pub recent_bookings: Vec<BookingWithRelations>,
}

/// Compute the dashboard metrics
///
/// The optional range restricts every booking-backed aggregation; the user
/// count deliberately stays all-time.
pub async fn compute_stats<S: Storage>(
    storage: &S,
    range: Option<&DateRange>,
) -> Result<DashboardStats> {
    let total_revenue = storage.sum_booking_revenue(range).await?;
    let total_bookings = storage.count_success_bookings(range).await?;
    let total_tickets_sold = storage.sum_tickets_sold(range).await?;
    let total_users = storage.count_users_by_role(Role::Customer).await?;
    let recent_bookings = storage
        .find_recent_bookings(range, RECENT_BOOKINGS_LIMIT)
        .await?;

    Ok(DashboardStats {
        total_revenue,
        total_bookings,
        total_tickets_sold,
        total_users,
        recent_bookings,
    })
}
