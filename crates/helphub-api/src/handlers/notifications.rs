//! Notification feeds.

use axum::extract::State;
use helphub_models::{Notification, Recipient};

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::state::AppState;

pub async fn user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.db.notifications_for(Recipient::User(user_id)).await?))
}

pub async fn worker_notifications(
    State(state): State<AppState>,
    Path(worker_id): Path<i64>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(
        state
            .db
            .notifications_for(Recipient::Worker(worker_id))
            .await?,
    ))
}
