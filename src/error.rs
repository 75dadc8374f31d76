//! Structured error types shared by both stores.

use serde::Serialize;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller-facing, never retried
    ValidationError,
    NotFound,

    // Fatal for the current operation
    PersistenceError,
}

/// Errors produced by the task store and the todo database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field failed its length or non-empty rule.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Task #{0} not found")]
    TaskNotFound(u64),

    #[error("Todo with ID {0} not found")]
    TodoNotFound(i64),

    #[error("No task ids left in this task file")]
    IdsExhausted,

    #[error("Failed to save tasks: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode tasks: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::TaskNotFound(_) | Self::TodoNotFound(_) => ErrorCode::NotFound,
            Self::IdsExhausted | Self::Io(_) | Self::Json(_) | Self::Database(_) => {
                ErrorCode::PersistenceError
            }
        }
    }

    /// The offending field, for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True for validation and not-found errors, which are reported to the
    /// caller instead of aborting the process.
    pub fn is_caller_error(&self) -> bool {
        self.code() != ErrorCode::PersistenceError
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::validation("title", "Title is required").code(),
            ErrorCode::ValidationError
        );
        assert_eq!(StoreError::TaskNotFound(3).code(), ErrorCode::NotFound);
        assert_eq!(StoreError::TodoNotFound(3).code(), ErrorCode::NotFound);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(StoreError::from(io).code(), ErrorCode::PersistenceError);
    }

    #[test]
    fn test_messages() {
        assert_eq!(StoreError::TaskNotFound(7).to_string(), "Task #7 not found");
        assert_eq!(
            StoreError::TodoNotFound(7).to_string(),
            "Todo with ID 7 not found"
        );
        let err = StoreError::validation("title", "Title is required");
        assert_eq!(err.to_string(), "Title is required");
        assert_eq!(err.field(), Some("title"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::PersistenceError).unwrap();
        assert_eq!(json, "\"PERSISTENCE_ERROR\"");
    }
}
