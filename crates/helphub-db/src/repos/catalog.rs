//! Service catalog and worker configuration queries.
//!
//! Worker services and availability are replaced wholesale: the delete and the
//! inserts run in one transaction, so readers see either the old set or the new
//! one.

use helphub_models::{AvailabilityEntry, AvailabilityMatrix, OfferedService, Service};
use sqlx::SqliteConnection;
use tracing::info;

use crate::database::Database;
use crate::error::{violation, DbError, DbResult, Violation};
use crate::metrics::observe;

async fn ensure_worker_exists(conn: &mut SqliteConnection, worker_id: i64) -> DbResult<()> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT worker_id FROM workers WHERE worker_id = ?")
        .bind(worker_id)
        .fetch_optional(conn)
        .await?;

    found
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("Worker not found"))
}

impl Database {
    /// Full catalog ordered by id.
    pub async fn list_services(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            "SELECT service_id, name, description, base_price FROM services ORDER BY service_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(services)
    }

    /// Services a worker offers, with the worker's rates.
    pub async fn worker_services(&self, worker_id: i64) -> DbResult<Vec<OfferedService>> {
        let services = sqlx::query_as::<_, OfferedService>(
            "SELECT s.service_id, s.name, ws.price_per_hour \
             FROM worker_services ws \
             JOIN services s ON ws.service_id = s.service_id \
             WHERE ws.worker_id = ? \
             ORDER BY s.service_id",
        )
        .bind(worker_id)
        .fetch_all(self.pool())
        .await?;

        Ok(services)
    }

    /// Stored availability rows, ordered monday..sunday then morning..evening.
    pub async fn worker_availability(&self, worker_id: i64) -> DbResult<Vec<AvailabilityEntry>> {
        let mut entries = sqlx::query_as::<_, AvailabilityEntry>(
            "SELECT day_of_week, time_slot, is_available FROM worker_availability WHERE worker_id = ?",
        )
        .bind(worker_id)
        .fetch_all(self.pool())
        .await?;

        entries.sort_by_key(|e| (e.day_of_week, e.time_slot));
        Ok(entries)
    }

    /// Replace a worker's offered services with `rates` (`service_id`, hourly rate).
    ///
    /// An empty set is rejected and leaves the previous services in place.
    pub async fn replace_worker_services(&self, worker_id: i64, rates: &[(i64, f64)]) -> DbResult<()> {
        if rates.is_empty() {
            return Err(DbError::invalid_input("No services selected"));
        }

        observe("replace_worker_services", async {
            let mut tx = self.pool().begin().await?;

            sqlx::query("DELETE FROM worker_services WHERE worker_id = ?")
                .bind(worker_id)
                .execute(&mut *tx)
                .await?;

            ensure_worker_exists(&mut *tx, worker_id).await?;

            for &(service_id, rate) in rates {
                sqlx::query(
                    "INSERT INTO worker_services (worker_id, service_id, price_per_hour) VALUES (?, ?, ?)",
                )
                .bind(worker_id)
                .bind(service_id)
                .bind(rate)
                .execute(&mut *tx)
                .await
                .map_err(|e| match violation(&e) {
                    Some(Violation::ForeignKey) => {
                        DbError::invalid_input(format!("Unknown service {service_id}"))
                    }
                    Some(Violation::Unique) => {
                        DbError::invalid_input(format!("Service {service_id} selected twice"))
                    }
                    Some(Violation::Check) => {
                        DbError::invalid_input(format!("Invalid rate for service {service_id}"))
                    }
                    None => e.into(),
                })?;
            }

            tx.commit().await?;

            info!(worker_id, count = rates.len(), "Worker services updated");
            Ok(())
        })
        .await
    }

    /// Replace a worker's availability. The stored matrix is always dense.
    pub async fn replace_worker_availability(
        &self,
        worker_id: i64,
        matrix: &AvailabilityMatrix,
    ) -> DbResult<()> {
        observe("replace_worker_availability", async {
            let mut tx = self.pool().begin().await?;

            sqlx::query("DELETE FROM worker_availability WHERE worker_id = ?")
                .bind(worker_id)
                .execute(&mut *tx)
                .await?;

            ensure_worker_exists(&mut *tx, worker_id).await?;

            let entries = matrix.dense_entries();
            for entry in &entries {
                sqlx::query(
                    "INSERT INTO worker_availability (worker_id, day_of_week, time_slot, is_available) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(worker_id)
                .bind(entry.day_of_week.as_str())
                .bind(entry.time_slot.as_str())
                .bind(entry.is_available)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            let available = entries.iter().filter(|e| e.is_available).count();
            info!(worker_id, available, "Worker availability updated");
            Ok(())
        })
        .await
    }
}
