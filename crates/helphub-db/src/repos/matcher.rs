//! Availability matching.

use helphub_models::{AvailableWorker, SlotRequest};
use tracing::debug;

use crate::database::Database;
use crate::error::DbResult;
use crate::metrics::observe;

// Conflicts are exact (worker, date, time) matches against confirmed bookings.
// Durations are not considered.
const AVAILABLE_WORKERS_SQL: &str = "\
    SELECT DISTINCT w.worker_id, w.name, w.phone, w.profile_pic, ws.price_per_hour \
    FROM workers w \
    JOIN worker_services ws ON ws.worker_id = w.worker_id \
    JOIN worker_availability wa ON wa.worker_id = w.worker_id \
    WHERE ws.service_id = ? \
      AND wa.day_of_week = ? \
      AND wa.time_slot = ? \
      AND wa.is_available = 1 \
      AND NOT EXISTS ( \
          SELECT 1 FROM bookings b \
          WHERE b.worker_id = w.worker_id \
            AND b.booking_date = ? \
            AND b.booking_time = ? \
            AND b.status = 'confirmed' \
      ) \
    ORDER BY w.worker_id";

impl Database {
    /// Workers offering the service, available in the derived day/slot bucket,
    /// and without a confirmed booking at that exact date and time.
    pub async fn find_available_workers(&self, req: &SlotRequest) -> DbResult<Vec<AvailableWorker>> {
        observe("find_available_workers", async {
            let workers = sqlx::query_as::<_, AvailableWorker>(AVAILABLE_WORKERS_SQL)
                .bind(req.service_id)
                .bind(req.day.as_str())
                .bind(req.slot.as_str())
                .bind(req.date)
                .bind(req.time)
                .fetch_all(self.pool())
                .await?;

            debug!(
                service_id = req.service_id,
                day = %req.day,
                slot = %req.slot,
                found = workers.len(),
                "Availability lookup"
            );
            Ok(workers)
        })
        .await
    }
}
