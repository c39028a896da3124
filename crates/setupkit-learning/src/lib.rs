//! # setupkit-learning
//!
//! Preference and feedback persistence plus the learning loop that turns
//! accept/override history into adjusted confidence.
//!
//! ## Modules
//! - [`model`]: preference and feedback records
//! - [`store`]: storage traits with in-memory and JSON-file backends
//! - [`recency`]: exponential recency weighting
//! - [`adjuster`]: confidence blending and the learning notification
//! - [`matcher`]: similar-context lookup and conflict detection
//! - [`history`]: statistics, export and clearing

pub mod adjuster;
pub mod config;
pub mod error;
pub mod history;
pub mod matcher;
pub mod model;
pub mod recency;
pub mod store;

pub use adjuster::{
    adjust_confidence_from_feedback, should_notify_learning, AdjustedConfidence,
    ConfidenceAdjuster, ConfidenceSource,
};
pub use config::LearningConfig;
pub use error::{StoreError, StoreResult};
pub use history::{
    clear_feedback_history, export_feedback_history, get_feedback_statistics, ExportFormat,
    FeedbackStatistics, GroupStatistics, OverallStatistics, CSV_HEADER,
};
pub use matcher::{
    detect_conflicts, get_similar_context_feedback, ChoiceConflict, DEFAULT_CONTEXT_LIMIT,
};
pub use model::{
    composite_key, FeedbackEvent, FeedbackFilter, FeedbackType, NewFeedback, StockPreference,
    StrategyPreference,
};
pub use recency::{calculate_recency_weight, get_weighted_acceptance_rate};
pub use store::{FeedbackStore, InMemoryStore, JsonFileStore, PreferenceStore};
