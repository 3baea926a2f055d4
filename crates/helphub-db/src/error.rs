//! Storage error types.

use helphub_models::ModelError;
use thiserror::Error;

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// A guarded state transition matched no row.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),

    /// The worker has no rate for the requested service.
    #[error("{0}")]
    NotOffered(String),
}

impl DbError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True for errors caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DbError::NotFound(_)
                | DbError::AlreadyExists(_)
                | DbError::Conflict(_)
                | DbError::InvalidInput(_)
                | DbError::NotOffered(_)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::Query(e.to_string())
    }
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::InvalidInput(e.to_string())
    }
}

/// Constraint class of a failed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Check,
}

pub(crate) fn violation(e: &sqlx::Error) -> Option<Violation> {
    let sqlx::Error::Database(db_err) = e else {
        return None;
    };
    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else if db_err.is_check_violation() {
        Some(Violation::Check)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(DbError::not_found("Booking not found").is_client_error());
        assert!(DbError::conflict("already processed").is_client_error());
        assert!(!DbError::Query("disk I/O error".into()).is_client_error());
    }

    #[test]
    fn test_model_error_maps_to_invalid_input() {
        let err: DbError = ModelError::invalid("No services selected").into();
        assert!(matches!(err, DbError::InvalidInput(ref m) if m == "No services selected"));
    }

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert_eq!(violation(&sqlx::Error::RowNotFound), None);
    }
}
