//! Error types for the advisor crate.

use serde::{Deserialize, Serialize};
use setupkit_camtools::AnalysisError;
use setupkit_learning::StoreError;
use thiserror::Error;

/// Errors raised while building a suggestion.
///
/// Orchestrators never return these directly; they are folded into an
/// `error` response.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A required request field is absent.
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// A request field could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An analysis stage rejected the geometry.
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// A store call failed where it cannot be skipped.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AdvisorError {
    /// Stable kind name for responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::InvalidInput(_) => "invalid_input",
            Self::Analysis(AnalysisError::MissingInput(_)) => "missing_input",
            Self::Analysis(_) => "analysis",
            Self::Store(_) => "store",
        }
    }
}

impl From<setupkit_core::Error> for AdvisorError {
    fn from(err: setupkit_core::Error) -> Self {
        AdvisorError::Analysis(err.into())
    }
}

/// Result type alias for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Body of an `error` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&AdvisorError> for ErrorBody {
    fn from(err: &AdvisorError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
