//! Context matching and conflict detection

use crate::error::StoreResult;
use crate::model::{FeedbackEvent, FeedbackFilter};
use crate::store::FeedbackStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use setupkit_core::normalize_key;

/// Events considered when no limit is given
pub const DEFAULT_CONTEXT_LIMIT: usize = 50;

/// Past feedback from a similar context, newest first.
///
/// Operation and geometry type must match exactly. Materials match when
/// either name contains the other, so "6061 aluminum" finds "aluminum".
pub fn get_similar_context_feedback(
    store: &dyn FeedbackStore,
    operation_type: &str,
    material: &str,
    geometry_type: &str,
    limit: Option<usize>,
) -> StoreResult<Vec<FeedbackEvent>> {
    let limit = limit.unwrap_or(DEFAULT_CONTEXT_LIMIT);
    let material = normalize_key(material);
    let filter = FeedbackFilter {
        operation_type: Some(normalize_key(operation_type)),
        geometry_type: Some(normalize_key(geometry_type)),
        limit: None,
        newest_first: true,
    };

    let events = store
        .query_feedback(&filter)?
        .into_iter()
        .filter(|e| materials_related(&e.material, &material))
        .take(limit)
        .collect();
    Ok(events)
}

fn materials_related(stored: &str, requested: &str) -> bool {
    stored.contains(requested) || requested.contains(stored)
}

/// One distinct user override and how often it was chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConflict {
    pub choice: Value,
    pub count: usize,
    pub most_recent_date: Option<DateTime<Utc>>,
    pub weighted_score: f64,
}

/// Group distinct non-null user choices.
///
/// Empty unless at least two different choices exist. Sorted by count,
/// ties keep first-seen order.
pub fn detect_conflicts(history: &[FeedbackEvent]) -> Vec<ChoiceConflict> {
    let mut groups: Vec<ChoiceConflict> = Vec::new();
    for event in history {
        let Some(choice) = event.user_choice.as_ref().filter(|c| !c.is_null()) else {
            continue;
        };
        match groups.iter_mut().find(|g| &g.choice == choice) {
            Some(group) => {
                group.count += 1;
                if event.created_at > group.most_recent_date {
                    group.most_recent_date = event.created_at;
                }
            }
            None => groups.push(ChoiceConflict {
                choice: choice.clone(),
                count: 1,
                most_recent_date: event.created_at,
                weighted_score: 0.0,
            }),
        }
    }

    if groups.len() <= 1 {
        return Vec::new();
    }
    for group in &mut groups {
        group.weighted_score = group.count as f64;
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
