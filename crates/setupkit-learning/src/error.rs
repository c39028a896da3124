//! Error types for preference and feedback storage.

use thiserror::Error;

/// Errors raised by a preference or feedback store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A requested record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// File I/O failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be (de)serialized.
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record failed validation before being written.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Whether the failure means the store cannot be used right now.
    ///
    /// Callers fall back to defaults on these.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
        assert!(err.is_unavailable());

        let err = StoreError::InvalidRecord("empty operation_type".to_string());
        assert_eq!(err.to_string(), "Invalid record: empty operation_type");
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_store_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(err.is_unavailable());

        let json = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: StoreError = json.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
