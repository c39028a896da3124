//! In-process store

use super::state::StoreState;
use super::{FeedbackStore, PreferenceStore};
use crate::error::StoreResult;
use crate::model::{
    FeedbackEvent, FeedbackFilter, NewFeedback, StockPreference, StrategyPreference,
};
use chrono::Utc;
use parking_lot::RwLock;

/// Preference and feedback store held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a historical event, keeping its `created_at`.
    ///
    /// Used to seed history; the id is still store-assigned.
    pub fn import_event(&self, event: FeedbackEvent) -> FeedbackEvent {
        self.state.write().import(event)
    }

    /// Number of stored feedback events
    pub fn feedback_count(&self) -> usize {
        self.state.read().query(&FeedbackFilter::default()).len()
    }
}

impl PreferenceStore for InMemoryStore {
    fn get_stock_preference(
        &self,
        material: &str,
        geometry_type: &str,
    ) -> StoreResult<Option<StockPreference>> {
        Ok(self.state.read().stock_preference(material, geometry_type))
    }

    fn save_stock_preference(&self, preference: StockPreference) -> StoreResult<StockPreference> {
        self.state.write().upsert_stock(preference, Utc::now())
    }

    fn get_strategy_preference(
        &self,
        material: &str,
        feature_type: &str,
    ) -> StoreResult<Option<StrategyPreference>> {
        Ok(self.state.read().strategy_preference(material, feature_type))
    }

    fn save_strategy_preference(
        &self,
        preference: StrategyPreference,
    ) -> StoreResult<StrategyPreference> {
        self.state.write().upsert_strategy(preference, Utc::now())
    }
}

impl FeedbackStore for InMemoryStore {
    fn append_feedback(&self, feedback: NewFeedback) -> StoreResult<FeedbackEvent> {
        self.state.write().append(feedback, Utc::now())
    }

    fn query_feedback(&self, filter: &FeedbackFilter) -> StoreResult<Vec<FeedbackEvent>> {
        Ok(self.state.read().query(filter))
    }

    fn delete_feedback(&self, operation_type: Option<&str>) -> StoreResult<usize> {
        Ok(self.state.write().delete(operation_type))
    }
}
