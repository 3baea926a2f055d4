//! Read-only admin aggregates.

use helphub_models::{AdminDashboard, DashboardStatistics, UserSummary, WorkerSummary};

use crate::database::Database;
use crate::error::DbResult;
use crate::metrics::observe;

const RECENT_BOOKINGS: i64 = 10;

const STATISTICS_SQL: &str = "\
    SELECT \
        (SELECT COUNT(*) FROM users) AS users, \
        (SELECT COUNT(*) FROM workers) AS workers, \
        (SELECT COUNT(*) FROM bookings) AS bookings, \
        (SELECT COUNT(*) FROM bookings WHERE status = 'pending') AS pending, \
        (SELECT COUNT(*) FROM bookings WHERE status = 'confirmed') AS confirmed, \
        (SELECT COUNT(*) FROM bookings WHERE status = 'completed') AS completed, \
        (SELECT COUNT(*) FROM bookings WHERE status = 'rejected') AS rejected, \
        (SELECT COALESCE(SUM(total_price), 0.0) FROM bookings \
            WHERE status IN ('confirmed', 'completed')) AS revenue";

impl Database {
    /// Counts per table and booking status, plus revenue.
    pub async fn dashboard_statistics(&self) -> DbResult<DashboardStatistics> {
        let stats = sqlx::query_as::<_, DashboardStatistics>(STATISTICS_SQL)
            .fetch_one(self.pool())
            .await?;

        Ok(stats)
    }

    /// Statistics plus the ten most recently created bookings.
    pub async fn admin_dashboard(&self) -> DbResult<AdminDashboard> {
        observe("admin_dashboard", async {
            Ok(AdminDashboard {
                statistics: self.dashboard_statistics().await?,
                recent_bookings: self.list_bookings(Some(RECENT_BOOKINGS)).await?,
            })
        })
        .await
    }

    /// All users with their booking counts, newest first.
    pub async fn list_user_summaries(&self) -> DbResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummary>(
            "SELECT u.user_id, u.name, u.email, u.phone, u.address, u.profile_pic, u.created_at, \
                    (SELECT COUNT(*) FROM bookings b WHERE b.user_id = u.user_id) AS booking_count \
             FROM users u \
             ORDER BY u.created_at DESC, u.user_id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// All workers with their booking counts, newest first.
    pub async fn list_worker_summaries(&self) -> DbResult<Vec<WorkerSummary>> {
        let rows = sqlx::query_as::<_, WorkerSummary>(
            "SELECT w.worker_id, w.name, w.email, w.phone, w.address, w.bio, w.profile_pic, \
                    w.avg_rating, w.created_at, \
                    (SELECT COUNT(*) FROM bookings b WHERE b.worker_id = w.worker_id) AS booking_count \
             FROM workers w \
             ORDER BY w.created_at DESC, w.worker_id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
