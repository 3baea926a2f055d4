//! Read-only admin reports.

use axum::extract::State;
use helphub_models::{AdminDashboard, BookingDetails, UserSummary, WorkerSummary};

use crate::error::ApiResult;
use crate::extract::Json;
use crate::state::AppState;

/// Counters, revenue and the most recent bookings.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<AdminDashboard>> {
    Ok(Json(state.db.admin_dashboard().await?))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.db.list_user_summaries().await?))
}

pub async fn list_workers(State(state): State<AppState>) -> ApiResult<Json<Vec<WorkerSummary>>> {
    Ok(Json(state.db.list_worker_summaries().await?))
}

pub async fn list_bookings(State(state): State<AppState>) -> ApiResult<Json<Vec<BookingDetails>>> {
    Ok(Json(state.db.list_bookings(None).await?))
}
