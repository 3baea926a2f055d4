//! SQLite persistence for the HelpHub marketplace.
//!
//! Owns every durable row: accounts, the service catalog, worker services and
//! availability, bookings and notifications. Multi-statement operations
//! (booking creation, accept, reject, service and availability replacement)
//! each run in one transaction.

pub mod database;
pub mod error;
pub mod metrics;
pub mod repos;


pub use database::{Database, DbConfig};
pub use error::{DbError, DbResult};
pub use repos::Credentials;
