//! Booking lifecycle: creation, accept, reject and booking reads.
//!
//! Each mutation runs in a single transaction and opens with a write so that
//! SQLite takes the write lock before any read snapshot is held.

use chrono::Utc;
use helphub_models::notification::{booking_confirmed, booking_rejected, booking_requested};
use helphub_models::{BookingDetails, BookingStatus, NewBooking, Recipient, TicketNumber};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::notifications::insert_notification;
use crate::database::Database;
use crate::error::{violation, DbError, DbResult, Violation};
use crate::metrics::{observe, record_booking_event};

pub(crate) const BOOKING_DETAILS_SELECT: &str = "\
    SELECT b.booking_id, b.ticket_number, b.user_id, b.worker_id, b.service_id, \
           b.booking_date, b.booking_time, b.duration_hours, b.address, b.notes, \
           b.total_price, b.status, b.created_at, \
           s.name AS service_name, \
           u.name AS user_name, u.phone AS user_phone, u.profile_pic AS user_profile_pic, \
           w.name AS worker_name, w.phone AS worker_phone, w.profile_pic AS worker_profile_pic \
    FROM bookings b \
    JOIN services s ON b.service_id = s.service_id \
    JOIN users u ON b.user_id = u.user_id \
    LEFT JOIN workers w ON b.worker_id = w.worker_id";

const ALREADY_PROCESSED: &str = "Booking not found or already processed";

async fn fetch_details(conn: &mut SqliteConnection, booking_id: i64) -> DbResult<BookingDetails> {
    sqlx::query_as::<_, BookingDetails>(&format!(
        "{BOOKING_DETAILS_SELECT} WHERE b.booking_id = ?"
    ))
    .bind(booking_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found("Booking not found"))
}

/// Take the next ticket number from the counter row.
async fn next_ticket(conn: &mut SqliteConnection) -> DbResult<TicketNumber> {
    let (value,): (i64,) = sqlx::query_as(
        "UPDATE ticket_sequence SET last_value = last_value + 1 WHERE id = 1 RETURNING last_value",
    )
    .fetch_one(conn)
    .await?;

    Ok(TicketNumber::from_sequence(value))
}

/// Move a pending booking to `status`. Returns whether a row changed.
async fn transition_pending(
    conn: &mut SqliteConnection,
    booking_id: i64,
    status: BookingStatus,
    worker_id: Option<i64>,
) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE bookings SET status = ?, worker_id = COALESCE(?, worker_id) \
         WHERE booking_id = ? AND status = 'pending'",
    )
    .bind(status.as_str())
    .bind(worker_id)
    .bind(booking_id)
    .execute(conn)
    .await
    .map_err(|e| match violation(&e) {
        Some(Violation::ForeignKey) => DbError::not_found("Worker not found"),
        _ => e.into(),
    })?;

    Ok(result.rows_affected() > 0)
}

impl Database {
    /// Create a pending booking priced from the worker's rate and notify the worker.
    ///
    /// Nothing is persisted when the worker does not offer the service.
    pub async fn create_booking(&self, booking: &NewBooking) -> DbResult<(i64, TicketNumber)> {
        observe("create_booking", async {
            let mut tx = self.pool().begin().await?;

            let ticket = next_ticket(&mut *tx).await?;

            let rate: Option<(f64,)> = sqlx::query_as(
                "SELECT price_per_hour FROM worker_services WHERE worker_id = ? AND service_id = ?",
            )
            .bind(booking.worker_id)
            .bind(booking.service_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some((price_per_hour,)) = rate else {
                return Err(DbError::NotOffered(
                    "Worker does not provide this service".to_string(),
                ));
            };

            let user: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE user_id = ?")
                .bind(booking.user_id)
                .fetch_optional(&mut *tx)
                .await?;
            let Some((user_name,)) = user else {
                return Err(DbError::not_found("User not found"));
            };

            let (service_name,): (String,) =
                sqlx::query_as("SELECT name FROM services WHERE service_id = ?")
                    .bind(booking.service_id)
                    .fetch_one(&mut *tx)
                    .await?;

            let total_price = booking.total_price(price_per_hour);
            if !total_price.is_finite() {
                return Err(DbError::invalid_input("Booking duration is too long"));
            }

            let result = sqlx::query(
                "INSERT INTO bookings (ticket_number, user_id, worker_id, service_id, booking_date, \
                 booking_time, duration_hours, address, notes, total_price, status, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(ticket.as_str())
            .bind(booking.user_id)
            .bind(booking.worker_id)
            .bind(booking.service_id)
            .bind(booking.booking_date)
            .bind(booking.booking_time)
            .bind(booking.duration_hours)
            .bind(&booking.address)
            .bind(booking.notes.as_deref())
            .bind(total_price)
            .bind(BookingStatus::Pending.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
            let booking_id = result.last_insert_rowid();

            let message = booking_requested(
                &ticket,
                &service_name,
                &user_name,
                booking.booking_date,
                booking.booking_time,
            );
            insert_notification(&mut *tx, Recipient::Worker(booking.worker_id), booking_id, &message)
                .await?;

            tx.commit().await?;

            record_booking_event("created");
            info!(
                booking_id,
                ticket = %ticket,
                worker_id = booking.worker_id,
                total_price,
                "Booking created"
            );
            Ok((booking_id, ticket))
        })
        .await
    }

    /// Confirm a pending booking, bind the accepting worker, notify the user.
    pub async fn accept_booking(&self, booking_id: i64, worker_id: i64) -> DbResult<BookingDetails> {
        observe("accept_booking", async {
            let mut tx = self.pool().begin().await?;

            if !transition_pending(&mut *tx, booking_id, BookingStatus::Confirmed, Some(worker_id))
                .await?
            {
                warn!(booking_id, worker_id, "Accept matched no pending booking");
                return Err(DbError::conflict(ALREADY_PROCESSED));
            }

            let details = fetch_details(&mut *tx, booking_id).await?;
            let message = booking_confirmed(
                &details.ticket_number,
                &details.service_name,
                details.worker_name.as_deref().unwrap_or_default(),
            );
            insert_notification(&mut *tx, Recipient::User(details.user_id), booking_id, &message)
                .await?;

            tx.commit().await?;

            record_booking_event("confirmed");
            info!(booking_id, worker_id, ticket = %details.ticket_number, "Booking confirmed");
            Ok(details)
        })
        .await
    }

    /// Reject a pending booking and notify the user.
    pub async fn reject_booking(&self, booking_id: i64) -> DbResult<BookingDetails> {
        observe("reject_booking", async {
            let mut tx = self.pool().begin().await?;

            if !transition_pending(&mut *tx, booking_id, BookingStatus::Rejected, None).await? {
                let exists: Option<(i64,)> =
                    sqlx::query_as("SELECT booking_id FROM bookings WHERE booking_id = ?")
                        .bind(booking_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                warn!(booking_id, exists = exists.is_some(), "Reject matched no pending booking");
                return Err(match exists {
                    Some(_) => DbError::conflict(ALREADY_PROCESSED),
                    None => DbError::not_found("Booking not found"),
                });
            }

            let details = fetch_details(&mut *tx, booking_id).await?;
            let message = booking_rejected(&details.ticket_number, &details.service_name);
            insert_notification(&mut *tx, Recipient::User(details.user_id), booking_id, &message)
                .await?;

            tx.commit().await?;

            record_booking_event("rejected");
            info!(booking_id, ticket = %details.ticket_number, "Booking rejected");
            Ok(details)
        })
        .await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_booking(&self, booking_id: i64) -> DbResult<BookingDetails> {
        let mut conn = self.pool().acquire().await?;
        fetch_details(&mut *conn, booking_id).await
    }

    /// A user's bookings, latest appointment first.
    pub async fn user_bookings(&self, user_id: i64) -> DbResult<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingDetails>(&format!(
            "{BOOKING_DETAILS_SELECT} WHERE b.user_id = ? \
             ORDER BY b.booking_date DESC, b.booking_time DESC, b.booking_id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Requests assigned to a worker that are still relevant to them.
    pub async fn worker_requests(&self, worker_id: i64) -> DbResult<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingDetails>(&format!(
            "{BOOKING_DETAILS_SELECT} WHERE b.worker_id = ? \
             AND b.status IN ('pending', 'confirmed', 'completed') \
             ORDER BY b.created_at DESC, b.booking_id DESC"
        ))
        .bind(worker_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Every booking, newest first. `limit` caps the result when set.
    pub async fn list_bookings(&self, limit: Option<i64>) -> DbResult<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingDetails>(&format!(
            "{BOOKING_DETAILS_SELECT} ORDER BY b.created_at DESC, b.booking_id DESC LIMIT ?"
        ))
        .bind(limit.unwrap_or(-1))
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
