//! Shared data models for the HelpHub marketplace.
//!
//! This crate provides Serde-serializable types for:
//! - User, worker and admin accounts
//! - The service catalog and per-worker rates
//! - Weekly availability (day-of-week x time-slot)
//! - Bookings, their lifecycle status and ticket numbers
//! - Notifications and admin reports
//!
//! With the `sqlx` feature enabled, row types also derive `sqlx::FromRow`.

pub mod account;
pub mod admin;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod notification;

// Re-export common types
pub use account::{
    avatar_url, AdminProfile, LoginRequest, RegisterResponse, RegisterUserRequest,
    RegisterWorkerRequest, Role, UpdateUserProfile, UpdateWorkerProfile, UserProfile,
    WorkerDetails, WorkerProfile,
};
pub use admin::{AdminDashboard, DashboardStatistics, UserSummary, WorkerSummary};
pub use availability::{
    AvailabilityEntry, AvailabilityMatrix, AvailabilityQuery, AvailableWorker, DayOfWeek,
    SlotRequest, TimeSlot, UpdateAvailabilityRequest,
};
pub use booking::{
    AcceptBookingRequest, BookingDetails, BookingStatus, CreateBookingRequest,
    CreateBookingResponse, NewBooking, TicketNumber,
};
pub use catalog::{OfferedService, Service, ServiceSelection, SetWorkerServicesRequest};
pub use error::{ModelError, ModelResult};
pub use notification::{Notification, Recipient};

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
