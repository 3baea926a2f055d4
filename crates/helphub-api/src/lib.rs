//! Axum REST API for the HelpHub home-services marketplace.
//!
//! This crate provides:
//! - Account registration and login for users, workers and admins
//! - Worker service/availability configuration and availability search
//! - The booking lifecycle and notification feeds
//! - Admin reports
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::{ApiConfig, BootstrapAdmin};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::AccountService;
pub use state::AppState;
