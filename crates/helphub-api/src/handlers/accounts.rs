//! Registration, login and profile handlers.

use axum::extract::State;
use axum::http::StatusCode;
use helphub_models::{
    AdminProfile, LoginRequest, RegisterResponse, RegisterUserRequest, RegisterWorkerRequest,
    UpdateUserProfile, UpdateWorkerProfile, UserProfile, WorkerDetails, WorkerProfile,
};

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::state::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let response = state.accounts.register_user(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn register_worker(
    State(state): State<AppState>,
    Json(req): Json<RegisterWorkerRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let response = state.accounts.register_worker(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.accounts.login_user(&req).await?))
}

pub async fn login_worker(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<WorkerProfile>> {
    Ok(Json(state.accounts.login_worker(&req).await?))
}

pub async fn login_admin(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AdminProfile>> {
    Ok(Json(state.accounts.login_admin(&req).await?))
}

pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.db.get_user(user_id).await?))
}

pub async fn update_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(update): Json<UpdateUserProfile>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.accounts.update_user(user_id, update).await?))
}

/// Worker profile with offered services and availability.
pub async fn get_worker_profile(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
) -> ApiResult<Json<WorkerDetails>> {
    Ok(Json(state.db.get_worker_details(worker_id).await?))
}

pub async fn update_worker_profile(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
    Json(update): Json<UpdateWorkerProfile>,
) -> ApiResult<Json<WorkerProfile>> {
    Ok(Json(state.accounts.update_worker(worker_id, update).await?))
}
