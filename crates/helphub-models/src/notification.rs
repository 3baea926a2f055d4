//! Notifications emitted by booking lifecycle transitions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::TicketNumber;
use crate::clock;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    User(i64),
    Worker(i64),
}

impl Recipient {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Recipient::User(id) => Some(*id),
            Recipient::Worker(_) => None,
        }
    }

    pub fn worker_id(&self) -> Option<i64> {
        match self {
            Recipient::Worker(id) => Some(*id),
            Recipient::User(_) => None,
        }
    }
}

/// A stored notification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub notification_id: i64,
    pub user_id: Option<i64>,
    pub worker_id: Option<i64>,
    pub booking_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Sent to the worker when a booking is requested.
pub fn booking_requested(
    ticket: &TicketNumber,
    service_name: &str,
    user_name: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> String {
    format!(
        "New booking request #{ticket} for {service_name} from {user_name} on {} at {}.",
        date.format("%Y-%m-%d"),
        clock::format_time(&time)
    )
}

/// Sent to the user when the worker accepts.
pub fn booking_confirmed(ticket: &str, service_name: &str, worker_name: &str) -> String {
    format!("Your booking #{ticket} for {service_name} has been confirmed by {worker_name}.")
}

/// Sent to the user when the worker rejects.
pub fn booking_rejected(ticket: &str, service_name: &str) -> String {
    format!("Your booking #{ticket} for {service_name} has been rejected.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let ticket = TicketNumber::from_sequence(7);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            booking_requested(&ticket, "Cleaning", "Jane", date, time),
            "New booking request #000007 for Cleaning from Jane on 2024-01-01 at 09:00."
        );
        assert_eq!(
            booking_confirmed("000007", "Cleaning", "Sam"),
            "Your booking #000007 for Cleaning has been confirmed by Sam."
        );
        assert_eq!(
            booking_rejected("000007", "Cleaning"),
            "Your booking #000007 for Cleaning has been rejected."
        );
    }

    #[test]
    fn test_recipient_columns() {
        assert_eq!(Recipient::User(3).user_id(), Some(3));
        assert_eq!(Recipient::User(3).worker_id(), None);
        assert_eq!(Recipient::Worker(5).worker_id(), Some(5));
    }
}
