//! Booking lifecycle handlers.

use axum::extract::State;
use axum::http::StatusCode;
use helphub_models::{
    AcceptBookingRequest, BookingDetails, CreateBookingRequest, CreateBookingResponse,
    MessageResponse,
};

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::security::{sanitize_optional, sanitize_text, MAX_ADDRESS_LENGTH, MAX_TEXT_LENGTH};
use crate::state::AppState;

/// Create a pending booking priced from the worker's own rate.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<CreateBookingResponse>)> {
    let req = CreateBookingRequest {
        address: sanitize_text(&req.address, MAX_ADDRESS_LENGTH),
        notes: sanitize_optional(req.notes, MAX_TEXT_LENGTH),
        ..req
    };
    let booking = req.into_new_booking()?;

    let (booking_id, ticket) = state.db.create_booking(&booking).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse::new(booking_id, ticket)),
    ))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<BookingDetails>> {
    Ok(Json(state.db.get_booking(booking_id).await?))
}

/// A user's bookings, latest appointment first.
pub async fn user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<BookingDetails>>> {
    Ok(Json(state.db.user_bookings(user_id).await?))
}

/// Pending, confirmed and completed bookings assigned to a worker.
pub async fn worker_requests(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
) -> ApiResult<Json<Vec<BookingDetails>>> {
    Ok(Json(state.db.worker_requests(worker_id).await?))
}

pub async fn accept_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(req): Json<AcceptBookingRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.accept_booking(booking_id, req.worker_id).await?;
    Ok(Json(MessageResponse::new("Booking accepted successfully")))
}

pub async fn reject_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.reject_booking(booking_id).await?;
    Ok(Json(MessageResponse::new("Booking rejected successfully")))
}
