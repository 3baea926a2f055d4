//! Client error types.

use helphub_models::Role;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The session's role cannot perform the call. No request was sent.
    #[error("This action requires a {expected} session, not {actual}")]
    WrongRole { expected: Role, actual: Role },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Transport failures only; the server's answers are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(e) if !e.is_decode() && !e.is_builder())
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
