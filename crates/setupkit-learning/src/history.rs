//! Feedback history: statistics, export and clearing

use crate::error::{StoreError, StoreResult};
use crate::model::{FeedbackEvent, FeedbackFilter};
use crate::store::FeedbackStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use setupkit_core::round_to;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Column order of the CSV export
pub const CSV_HEADER: &str = "id,operation_type,material,geometry_type,context_snapshot,suggestion_payload,user_choice,feedback_type,feedback_note,confidence_before,created_at";

/// Totals across the selected events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_count: usize,
    pub accept_count: usize,
    /// Fraction in [0, 1]
    pub acceptance_rate: f64,
}

/// Counts for one group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub key: String,
    pub count: usize,
    /// Percentage, one decimal
    pub acceptance_pct: f64,
}

/// Acceptance statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStatistics {
    pub overall: OverallStatistics,
    pub by_material: Vec<GroupStatistics>,
    pub by_geometry_type: Vec<GroupStatistics>,
    /// Only filled when no operation type filter is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_operation_type: Option<Vec<GroupStatistics>>,
}

/// Acceptance statistics, optionally for one operation type.
///
/// A failing store yields zeroed statistics.
pub fn get_feedback_statistics(
    store: &dyn FeedbackStore,
    operation_type: Option<&str>,
) -> FeedbackStatistics {
    let events = match store.query_feedback(&FeedbackFilter::for_operation(operation_type)) {
        Ok(events) => events,
        Err(e) => {
            tracing::warn!("Failed to read feedback statistics: {}", e);
            return FeedbackStatistics::default();
        }
    };

    let total_count = events.len();
    let accept_count = events.iter().filter(|e| e.feedback_type.is_accept()).count();
    let acceptance_rate = if total_count == 0 {
        0.0
    } else {
        accept_count as f64 / total_count as f64
    };

    FeedbackStatistics {
        overall: OverallStatistics {
            total_count,
            accept_count,
            acceptance_rate,
        },
        by_material: group_by(&events, |e| &e.material),
        by_geometry_type: group_by(&events, |e| &e.geometry_type),
        by_operation_type: operation_type
            .is_none()
            .then(|| group_by(&events, |e| &e.operation_type)),
    }
}

fn group_by(events: &[FeedbackEvent], key: impl Fn(&FeedbackEvent) -> &String) -> Vec<GroupStatistics> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for event in events {
        let k = key(event);
        let entry = counts.entry(k.clone()).or_insert_with(|| {
            order.push(k.clone());
            (0, 0)
        });
        entry.0 += 1;
        if event.feedback_type.is_accept() {
            entry.1 += 1;
        }
    }

    let mut groups: Vec<GroupStatistics> = order
        .into_iter()
        .map(|k| {
            let (count, accepted) = counts.get(&k).copied().unwrap_or_default();
            GroupStatistics {
                acceptance_pct: round_to(accepted as f64 * 100.0 / count.max(1) as f64, 1),
                key: k,
                count,
            }
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Export encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported export format '{}' (expected csv or json)", other)),
        }
    }
}

/// Serialize stored feedback, oldest first
pub fn export_feedback_history(
    store: &dyn FeedbackStore,
    format: ExportFormat,
    operation_type: Option<&str>,
) -> StoreResult<String> {
    let events = store.query_feedback(&FeedbackFilter::for_operation(operation_type))?;
    tracing::debug!("Exporting {} feedback events as {}", events.len(), format);
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&events)?),
        ExportFormat::Csv => {
            let mut out = String::from(CSV_HEADER);
            out.push('\n');
            for event in &events {
                out.push_str(&csv_row(event)?);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn csv_row(event: &FeedbackEvent) -> Result<String, StoreError> {
    let json_cell = |v: &Value| -> Result<String, StoreError> {
        if v.is_null() {
            Ok(String::new())
        } else {
            Ok(serde_json::to_string(v)?)
        }
    };

    let cells = [
        event.id.to_string(),
        event.operation_type.clone(),
        event.material.clone(),
        event.geometry_type.clone(),
        json_cell(&event.context_snapshot)?,
        json_cell(&event.suggestion_payload)?,
        match &event.user_choice {
            Some(choice) => json_cell(choice)?,
            None => String::new(),
        },
        event.feedback_type.as_str().to_string(),
        event.feedback_note.clone().unwrap_or_default(),
        event
            .confidence_before
            .map(|c| c.to_string())
            .unwrap_or_default(),
        event
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    ];

    Ok(cells
        .iter()
        .map(|c| csv_escape(c))
        .collect::<Vec<_>>()
        .join(","))
}

/// Quote a cell when it holds a separator, quote or line break
pub fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Delete feedback for one operation type, or all of it
pub fn clear_feedback_history(
    store: &dyn FeedbackStore,
    operation_type: Option<&str>,
) -> StoreResult<usize> {
    let deleted = store.delete_feedback(operation_type)?;
    tracing::info!(
        "Cleared {} feedback events ({})",
        deleted,
        operation_type.unwrap_or("all operation types")
    );
    Ok(deleted)
}
