//! Error types for the analysis crate.
//!
//! This module provides structured error types for geometry analysis,
//! stock calculation and orientation parsing.

use thiserror::Error;

/// Errors that can occur during setup analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Required geometry is absent from the snapshot.
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// Dimensions are invalid (non-finite, negative, or wrong unit).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// An orientation name could not be parsed.
    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),
}

impl From<setupkit_core::Error> for AnalysisError {
    fn from(err: setupkit_core::Error) -> Self {
        match err {
            setupkit_core::Error::MissingInput { field } => AnalysisError::MissingInput(field),
            other => AnalysisError::InvalidDimensions(other.to_string()),
        }
    }
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
