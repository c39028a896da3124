//! JSON snapshot store
//!
//! Same semantics as the in-memory store. The whole snapshot is rewritten
//! after each mutation (write to a sibling temp file, then rename) and
//! reloaded on open.

use super::state::StoreState;
use super::{FeedbackStore, PreferenceStore};
use crate::error::StoreResult;
use crate::model::{
    FeedbackEvent, FeedbackFilter, NewFeedback, StockPreference, StrategyPreference,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

/// Store persisted to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileStore {
    /// Open a store, loading the snapshot if the file exists
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreState::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StoreState::default()
        };
        tracing::debug!("Opened feedback store at {}", path.display());
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a historical event, keeping its `created_at`
    pub fn import_event(&self, event: FeedbackEvent) -> StoreResult<FeedbackEvent> {
        self.mutate(|state| Ok(state.import(event)))
    }

    /// Apply a change to a copy, persist it, then publish it
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.state.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get_stock_preference(
        &self,
        material: &str,
        geometry_type: &str,
    ) -> StoreResult<Option<StockPreference>> {
        Ok(self.state.read().stock_preference(material, geometry_type))
    }

    fn save_stock_preference(&self, preference: StockPreference) -> StoreResult<StockPreference> {
        self.mutate(|state| state.upsert_stock(preference, Utc::now()))
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
        self.mutate(|state| state.upsert_strategy(preference, Utc::now()))
    }
}

impl FeedbackStore for JsonFileStore {
    fn append_feedback(&self, feedback: NewFeedback) -> StoreResult<FeedbackEvent> {
        self.mutate(|state| state.append(feedback, Utc::now()))
    }

    fn query_feedback(&self, filter: &FeedbackFilter) -> StoreResult<Vec<FeedbackEvent>> {
        Ok(self.state.read().query(filter))
    }

    fn delete_feedback(&self, operation_type: Option<&str>) -> StoreResult<usize> {
        self.mutate(|state| Ok(state.delete(operation_type)))
    }
}
