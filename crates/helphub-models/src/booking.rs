//! Booking types and lifecycle status.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::account::non_blank;
use crate::clock;
use crate::error::{ModelError, ModelResult};

/// Booking lifecycle status.
///
/// `pending -> confirmed` and `pending -> rejected` are driven by the worker.
/// `completed` is set outside the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Statuses that count towards revenue.
    pub fn is_billable(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-facing booking reference: a six digit, zero-padded sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    /// Ticket for the n-th booking ever created.
    pub fn from_sequence(n: i64) -> Self {
        Self(format!("{n:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: i64,
    pub booking_date: NaiveDate,
    #[serde(with = "clock::hh_mm")]
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    /// Check the request and normalise free-text fields.
    pub fn into_new_booking(self) -> ModelResult<NewBooking> {
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(ModelError::invalid("Duration must be a positive number of hours"));
        }
        let address = self.address.trim().to_string();
        if address.is_empty() {
            return Err(ModelError::invalid("Address is required"));
        }
        Ok(NewBooking {
            user_id: self.user_id,
            service_id: self.service_id,
            worker_id: self.worker_id,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            duration_hours: self.duration_hours,
            address,
            notes: non_blank(self.notes),
        })
    }
}

/// A validated booking ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub address: String,
    pub notes: Option<String>,
}

impl NewBooking {
    /// Price fixed at creation time from the worker's hourly rate.
    pub fn total_price(&self, price_per_hour: f64) -> f64 {
        price_per_hour * self.duration_hours
    }
}

/// Response of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub message: String,
    pub booking_id: i64,
    pub ticket_number: String,
}

impl CreateBookingResponse {
    pub fn new(booking_id: i64, ticket_number: TicketNumber) -> Self {
        Self {
            message: "Booking created successfully".to_string(),
            booking_id,
            ticket_number: ticket_number.into_inner(),
        }
    }
}

/// Body of `PUT /bookings/:id/accept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBookingRequest {
    pub worker_id: i64,
}

/// A booking joined with service, user and worker display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingDetails {
    pub booking_id: i64,
    pub ticket_number: String,
    pub user_id: i64,
    pub worker_id: Option<i64>,
    pub service_id: i64,
    pub booking_date: NaiveDate,
    #[serde(with = "clock::hh_mm")]
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub address: String,
    pub notes: Option<String>,
    pub total_price: f64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub service_name: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub user_profile_pic: String,
    pub worker_name: Option<String>,
    pub worker_phone: Option<String>,
    pub worker_profile_pic: Option<String>,
}
