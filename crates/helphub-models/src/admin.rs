//! Read-only admin report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::BookingDetails;

/// Aggregate counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DashboardStatistics {
    pub users: i64,
    pub workers: i64,
    pub bookings: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub rejected: i64,
    /// Sum of `total_price` over confirmed and completed bookings.
    pub revenue: f64,
}

/// Response of `GET /admin/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub statistics: DashboardStatistics,
    pub recent_bookings: Vec<BookingDetails>,
}

/// A user row with booking count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserSummary {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
    pub booking_count: i64,
}

/// A worker row with booking count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WorkerSummary {
    pub worker_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub profile_pic: String,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
    pub booking_count: i64,
}
