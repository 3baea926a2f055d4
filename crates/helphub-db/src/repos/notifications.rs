//! Notification rows.

use chrono::Utc;
use helphub_models::{Notification, Recipient};
use sqlx::SqliteConnection;

use crate::database::Database;
use crate::error::DbResult;

const NOTIFICATION_COLUMNS: &str =
    "notification_id, user_id, worker_id, booking_id, message, created_at";

/// Insert a notification on an open connection or transaction.
pub(crate) async fn insert_notification(
    conn: &mut SqliteConnection,
    recipient: Recipient,
    booking_id: i64,
    message: &str,
) -> DbResult<i64> {
    let result = sqlx::query(
        "INSERT INTO notifications (user_id, worker_id, booking_id, message, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(recipient.user_id())
    .bind(recipient.worker_id())
    .bind(booking_id)
    .bind(message)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

impl Database {
    /// Notifications for one recipient, newest first.
    pub async fn notifications_for(&self, recipient: Recipient) -> DbResult<Vec<Notification>> {
        let (column, id) = match recipient {
            Recipient::User(id) => ("user_id", id),
            Recipient::Worker(id) => ("worker_id", id),
        };

        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE {column} = ? \
             ORDER BY created_at DESC, notification_id DESC"
        ))
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Notifications attached to one booking, oldest first.
    pub async fn booking_notifications(&self, booking_id: i64) -> DbResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE booking_id = ? \
             ORDER BY notification_id"
        ))
        .bind(booking_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
