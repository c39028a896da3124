//! Error handling for setupkit
//!
//! Provides the shared error type for the core data layer:
//! - Missing input (required geometry or request fields absent)
//! - Invalid input (malformed values, unknown identifiers)
//! - I/O and JSON failures when snapshots are read from disk
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for setupkit core
///
/// Ambiguous classifications are not errors; they surface as
/// `needs_review` on the feature instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input is absent
    #[error("Missing input: {field}")]
    MissingInput {
        /// Name of the absent field.
        field: String,
    },

    /// An input value could not be interpreted
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a missing-input error for the named field
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingInput {
            field: field.into(),
        }
    }

    /// Create an invalid-input error for the named field
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a missing-input error
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Error::MissingInput { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing("bounding_box");
        assert_eq!(err.to_string(), "Missing input: bounding_box");
        assert!(err.is_missing_input());

        let err = Error::invalid("feedback_type", "unknown value 'maybe'");
        assert_eq!(
            err.to_string(),
            "Invalid input 'feedback_type': unknown value 'maybe'"
        );
        assert!(!err.is_missing_input());
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
