//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::handlers::accounts::{
    get_user_profile, get_worker_profile, login_admin, login_user, login_worker, register_user,
    register_worker, update_user_profile, update_worker_profile,
};
use crate::handlers::admin::{dashboard, list_bookings, list_users, list_workers};
use crate::handlers::bookings::{
    accept_booking, create_booking, get_booking, reject_booking, user_bookings, worker_requests,
};
use crate::handlers::catalog::{
    available_workers, list_services, set_worker_availability, set_worker_services,
};
use crate::handlers::notifications::{user_notifications, worker_notifications};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let user_routes = Router::new()
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
        .route("/users/:id/profile", get(get_user_profile).put(update_user_profile))
        .route("/users/:id/bookings", get(user_bookings))
        .route("/users/:id/notifications", get(user_notifications));

    let worker_routes = Router::new()
        .route("/workers/register", post(register_worker))
        .route("/workers/login", post(login_worker))
        .route("/workers/available", get(available_workers))
        .route("/workers/:id/profile", get(get_worker_profile).put(update_worker_profile))
        .route("/workers/:id/services", post(set_worker_services))
        .route("/workers/:id/availability", post(set_worker_availability))
        .route("/workers/:id/requests", get(worker_requests))
        .route("/workers/:id/notifications", get(worker_notifications));

    let booking_routes = Router::new()
        .route("/services", get(list_services))
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/accept", put(accept_booking))
        .route("/bookings/:id/reject", put(reject_booking));

    let admin_routes = Router::new()
        .route("/admins/login", post(login_admin))
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/users", get(list_users))
        .route("/admin/workers", get(list_workers))
        .route("/admin/bookings", get(list_bookings));

    let rate_limiter = Arc::new(RateLimiterCache::new(
        state.config.rate_limit_rps,
        state.config.rate_limit_burst,
    ));

    let api_routes = Router::new()
        .merge(user_routes)
        .merge(worker_routes)
        .merge(booking_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = match metrics_handle {
        Some(handle) => Router::new().route("/metrics", get(move || async move { handle.render() })),
        None => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
