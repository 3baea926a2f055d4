//! Model-level parse and validation errors.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Unknown day of week '{0}'")]
    UnknownDay(String),

    #[error("Unknown time slot '{0}'")]
    UnknownSlot(String),

    #[error("Unknown booking status '{0}'")]
    UnknownStatus(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("{0}")]
    Invalid(String),
}

impl ModelError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
