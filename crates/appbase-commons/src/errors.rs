//! Shared error types for AppBase.
//!
//! One taxonomy for the whole workspace: every fallible public API returns
//! [`Result`]. Validation errors are raised before any storage call; storage
//! failures surface immediately with no automatic retries.

use thiserror::Error;

/// Main error type for AppBase operations.
#[derive(Debug, Error)]
pub enum AppBaseError {
    /// Missing database, table, column or record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate name or namespace.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed request shape, rejected before any storage call.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A namespace session could not be opened or the driver failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Unexpected internal state.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppBaseError {
    /// Creates a NotFound error with a message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a Conflict error with a message.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Creates a ValidationFailed error with a message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Creates a StorageUnavailable error with a message.
    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for AppBaseError {
    fn from(err: serde_json::Error) -> Self {
        AppBaseError::Internal(format!("serialization error: {}", err))
    }
}

/// Result type alias using AppBaseError.
pub type Result<T> = std::result::Result<T, AppBaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppBaseError::not_found("table Leads");
        assert!(matches!(err, AppBaseError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: table Leads");

        let err = AppBaseError::conflict("database Sales");
        assert!(matches!(err, AppBaseError::Conflict(_)));
        assert_eq!(err.to_string(), "Conflict: database Sales");

        let err = AppBaseError::validation("column is required");
        assert_eq!(err.to_string(), "Validation failed: column is required");
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppBaseError = json_err.into();
        assert!(matches!(err, AppBaseError::Internal(_)));
    }
}
