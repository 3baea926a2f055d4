//! Service catalog, worker configuration and availability search.

use axum::extract::State;
use helphub_models::{
    AvailabilityQuery, AvailableWorker, MessageResponse, Service, SetWorkerServicesRequest,
    UpdateAvailabilityRequest,
};
use tracing::info;

use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::state::AppState;

pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    Ok(Json(state.db.list_services().await?))
}

/// Workers who offer the service, are free in the slot, and have no
/// confirmed booking at that exact date and time.
pub async fn available_workers(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<Vec<AvailableWorker>>> {
    let request = query.slot_request()?;
    let workers = state.db.find_available_workers(&request).await?;

    info!(
        service_id = request.service_id,
        day = %request.day,
        slot = %request.slot,
        matches = workers.len(),
        "Availability search"
    );
    Ok(Json(workers))
}

pub async fn set_worker_services(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
    Json(req): Json<SetWorkerServicesRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let rates = req.selected_rates()?;
    state.db.replace_worker_services(worker_id, &rates).await?;

    Ok(Json(MessageResponse::new("Worker services updated successfully")))
}

pub async fn set_worker_availability(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .db
        .replace_worker_availability(worker_id, &req.availability)
        .await?;

    Ok(Json(MessageResponse::new("Worker availability updated successfully")))
}
