//! Custom error types for Quarterbook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Quarterbook operations
#[derive(Error, Debug)]
pub enum QuarterbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Caller-side input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Malformed or unreadable import file
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Persistence errors (blob read/write failures)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl QuarterbookError {
    /// Settings have not been initialized yet
    pub fn settings_not_found() -> Self {
        Self::NotFound {
            entity_type: "Settings",
            identifier: "1".into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for QuarterbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for QuarterbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for QuarterbookError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for Quarterbook operations
pub type QuarterbookResult<T> = Result<T, QuarterbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuarterbookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_settings_not_found() {
        let err = QuarterbookError::settings_not_found();
        assert_eq!(err.to_string(), "Settings not found: 1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_transaction_not_found() {
        let err = QuarterbookError::transaction_not_found("1718000000000");
        assert_eq!(err.to_string(), "Transaction not found: 1718000000000");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: QuarterbookError = io_err.into();
        assert!(matches!(err, QuarterbookError::Io(_)));
    }
}
