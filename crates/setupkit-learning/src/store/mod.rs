//! Preference and feedback storage
//!
//! The engine talks to storage only through [`PreferenceStore`] and
//! [`FeedbackStore`]. Keys are normalized (lowercase, trimmed) on write and
//! on lookup. Two implementations ship with the crate:
//! - [`InMemoryStore`] for tests and single-process use
//! - [`JsonFileStore`] which persists a JSON snapshot after every mutation

pub mod json_file;
pub mod memory;
mod state;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::error::StoreResult;
use crate::model::{
    FeedbackEvent, FeedbackFilter, NewFeedback, StockPreference, StrategyPreference,
};

/// Keyed preference records with upsert semantics (last write wins)
pub trait PreferenceStore: Send + Sync {
    /// Stock preference for (material, geometry type)
    fn get_stock_preference(
        &self,
        material: &str,
        geometry_type: &str,
    ) -> StoreResult<Option<StockPreference>>;

    /// Insert or replace a stock preference; `created_at` survives replacement
    fn save_stock_preference(&self, preference: StockPreference) -> StoreResult<StockPreference>;

    /// Strategy preference for (material, feature type)
    fn get_strategy_preference(
        &self,
        material: &str,
        feature_type: &str,
    ) -> StoreResult<Option<StrategyPreference>>;

    /// Insert or replace a strategy preference.
    ///
    /// Replacing an existing key increments `times_used`.
    fn save_strategy_preference(
        &self,
        preference: StrategyPreference,
    ) -> StoreResult<StrategyPreference>;
}

/// Append-only feedback log
pub trait FeedbackStore: Send + Sync {
    /// Append an event; the store assigns id and timestamp
    fn append_feedback(&self, feedback: NewFeedback) -> StoreResult<FeedbackEvent>;

    /// Events matching the filter, ordered by creation time
    fn query_feedback(&self, filter: &FeedbackFilter) -> StoreResult<Vec<FeedbackEvent>>;

    /// Delete events of one operation type, or all; returns the count removed
    fn delete_feedback(&self, operation_type: Option<&str>) -> StoreResult<usize>;
}
