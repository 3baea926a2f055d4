//! Query implementations, grouped by concern.
//!
//! Each module adds methods to [`Database`](crate::Database).

mod accounts;
mod bookings;
mod catalog;
mod matcher;
mod notifications;
mod reports;

pub use accounts::Credentials;
