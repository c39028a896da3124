//! Store contents shared by the in-memory and JSON-file stores

use crate::error::{StoreError, StoreResult};
use crate::model::{
    composite_key, FeedbackEvent, FeedbackFilter, NewFeedback, StockPreference,
    StrategyPreference,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use setupkit_core::normalize_key;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreState {
    next_feedback_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
    stock_preferences: BTreeMap<String, StockPreference>,
    strategy_preferences: BTreeMap<String, StrategyPreference>,
    feedback: Vec<FeedbackEvent>,
}

impl StoreState {
    /// Strictly increasing timestamps even when the clock stalls
    fn next_timestamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn next_id(&mut self) -> u64 {
        self.next_feedback_id += 1;
        self.next_feedback_id
    }

    pub(crate) fn stock_preference(&self, material: &str, geometry_type: &str) -> Option<StockPreference> {
        self.stock_preferences
            .get(&composite_key(material, geometry_type))
            .cloned()
    }

    pub(crate) fn upsert_stock(
        &mut self,
        mut preference: StockPreference,
        now: DateTime<Utc>,
    ) -> StoreResult<StockPreference> {
        for (name, value) in [
            ("offsets_xy_mm", preference.offsets_xy_mm),
            ("offsets_z_mm", preference.offsets_z_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StoreError::InvalidRecord(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        preference.material = normalize_key(&preference.material);
        preference.geometry_type = normalize_key(&preference.geometry_type);
        let key = preference.key();
        let ts = self.next_timestamp(now);
        preference.created_at = self
            .stock_preferences
            .get(&key)
            .and_then(|p| p.created_at)
            .or(Some(ts));
        preference.updated_at = Some(ts);
        self.stock_preferences.insert(key, preference.clone());
        Ok(preference)
    }

    pub(crate) fn strategy_preference(
        &self,
        material: &str,
        feature_type: &str,
    ) -> Option<StrategyPreference> {
        self.strategy_preferences
            .get(&composite_key(material, feature_type))
            .cloned()
    }

    pub(crate) fn upsert_strategy(
        &mut self,
        mut preference: StrategyPreference,
        now: DateTime<Utc>,
    ) -> StoreResult<StrategyPreference> {
        if !(0.0..=1.0).contains(&preference.confidence_score) {
            return Err(StoreError::InvalidRecord(format!(
                "confidence_score must be within [0, 1], got {}",
                preference.confidence_score
            )));
        }

        preference.material = normalize_key(&preference.material);
        preference.feature_type = normalize_key(&preference.feature_type);
        let key = preference.key();
        let ts = self.next_timestamp(now);
        match self.strategy_preferences.get(&key) {
            Some(existing) => {
                preference.times_used = existing.times_used.saturating_add(1);
                preference.created_at = existing.created_at.or(Some(ts));
            }
            None => {
                preference.times_used = 1;
                preference.created_at = Some(ts);
            }
        }
        preference.updated_at = Some(ts);
        self.strategy_preferences.insert(key, preference.clone());
        Ok(preference)
    }

    pub(crate) fn append(
        &mut self,
        feedback: NewFeedback,
        now: DateTime<Utc>,
    ) -> StoreResult<FeedbackEvent> {
        let feedback = feedback.normalized().map_err(StoreError::InvalidRecord)?;
        let ts = self.next_timestamp(now);
        let id = self.next_id();
        let event = feedback.into_event(id, ts);
        self.feedback.push(event.clone());
        Ok(event)
    }

    /// Keep an event's own timestamp (imported history)
    pub(crate) fn import(&mut self, mut event: FeedbackEvent) -> FeedbackEvent {
        event.id = self.next_id();
        event.operation_type = normalize_key(&event.operation_type);
        event.material = normalize_key(&event.material);
        event.geometry_type = normalize_key(&event.geometry_type);
        self.feedback.push(event.clone());
        event
    }

    pub(crate) fn query(&self, filter: &FeedbackFilter) -> Vec<FeedbackEvent> {
        let mut events: Vec<FeedbackEvent> = self
            .feedback
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if filter.newest_first {
            events.reverse();
        }
        if let Some(limit) = filter.limit {
            events.truncate(limit);
        }
        events
    }

    pub(crate) fn delete(&mut self, operation_type: Option<&str>) -> usize {
        let before = self.feedback.len();
        match operation_type {
            Some(op) => {
                let op = normalize_key(op);
                self.feedback.retain(|e| e.operation_type != op);
            }
            None => self.feedback.clear(),
        }
        before - self.feedback.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeedbackType;

    #[test]
    fn test_timestamps_are_monotonic() {
        let mut state = StoreState::default();
        let now = Utc::now();
        let a = state.next_timestamp(now);
        let b = state.next_timestamp(now);
        let c = state.next_timestamp(now - Duration::seconds(10));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_query_ordering_and_limit() {
        let mut state = StoreState::default();
        let now = Utc::now();
        for i in 0..5 {
            let mut fb = NewFeedback::new("stock_setup", "aluminum", "simple", FeedbackType::ImplicitAccept);
            fb.feedback_note = Some(i.to_string());
            state.append(fb, now).unwrap();
        }
        let filter = FeedbackFilter {
            limit: Some(2),
            newest_first: true,
            ..Default::default()
        };
        let events = state.query(&filter);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].feedback_note.as_deref(), Some("4"));
        assert_eq!(events[1].id, 4);
    }
}
