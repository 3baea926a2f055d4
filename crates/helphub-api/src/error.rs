//! API error types.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use helphub_db::DbError;
use helphub_models::ModelError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// The target exists but is in the wrong state for the request.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Conflict(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Database(e) => match e {
                DbError::NotFound(_) => StatusCode::NOT_FOUND,
                e if e.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {field}"),
                })
            })
            .collect();

        ApiError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            match self {
                ApiError::Database(e) => e.to_string(),
                other => other.to_string(),
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_db_error_status() {
        let cases = [
            (DbError::not_found("Booking not found"), StatusCode::NOT_FOUND),
            (DbError::AlreadyExists("dup".into()), StatusCode::BAD_REQUEST),
            (DbError::conflict("processed"), StatusCode::BAD_REQUEST),
            (DbError::NotOffered("no rate".into()), StatusCode::BAD_REQUEST),
            (DbError::Query("disk I/O".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_validation_message() {
        let req = helphub_models::RegisterUserRequest {
            name: "A".into(),
            email: "ann@example.com".into(),
            password: "secret1".into(),
            phone: None,
            address: None,
        };
        let err = ApiError::from(req.validate().unwrap_err());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Name must be at least 2 characters");
    }

    async fn message_of(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json["message"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_db_client_errors_keep_their_wording() {
        let cases = [
            (DbError::conflict("Booking not found or already processed"), StatusCode::BAD_REQUEST),
            (DbError::AlreadyExists("User with this email already exists".into()), StatusCode::BAD_REQUEST),
            (DbError::NotOffered("Worker does not provide this service".into()), StatusCode::BAD_REQUEST),
            (DbError::not_found("Booking not found"), StatusCode::NOT_FOUND),
        ];

        for (err, expected_status) in cases {
            let expected = err.to_string();
            let (status, message) = message_of(ApiError::from(err)).await;
            assert_eq!(status, expected_status);
            assert_eq!(message, expected);
        }
    }

    #[tokio::test]
    async fn test_internal_message_is_generic() {
        let response = ApiError::Database(DbError::Query("secret detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], INTERNAL_MESSAGE);
    }
}
