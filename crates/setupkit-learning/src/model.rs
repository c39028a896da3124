//! Preference and feedback records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use setupkit_core::normalize_key;
use std::fmt;
use std::str::FromStr;

/// How the user reacted to a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    /// Suggestion used as-is
    ImplicitAccept,
    /// Suggestion overridden
    ImplicitReject,
    /// User rated the suggestion good
    ExplicitGood,
    /// User rated the suggestion bad
    ExplicitBad,
}

impl FeedbackType {
    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImplicitAccept => "implicit_accept",
            Self::ImplicitReject => "implicit_reject",
            Self::ExplicitGood => "explicit_good",
            Self::ExplicitBad => "explicit_bad",
        }
    }

    /// Counts toward the acceptance rate
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::ImplicitAccept | Self::ExplicitGood)
    }

    /// Direct rating by the user
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::ExplicitGood | Self::ExplicitBad)
    }

    /// Resolve a requested feedback type.
    ///
    /// `"implicit"` becomes accept when the user kept the suggestion (no
    /// override), reject otherwise. Every other value must name a type.
    pub fn resolve(requested: &str, user_choice: Option<&Value>) -> Result<Self, String> {
        let requested = normalize_key(requested);
        if requested == "implicit" {
            let overridden = user_choice.map_or(false, |c| !c.is_null());
            return Ok(if overridden {
                Self::ImplicitReject
            } else {
                Self::ImplicitAccept
            });
        }
        requested.parse()
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedbackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "implicit_accept" => Ok(Self::ImplicitAccept),
            "implicit_reject" => Ok(Self::ImplicitReject),
            "explicit_good" => Ok(Self::ExplicitGood),
            "explicit_bad" => Ok(Self::ExplicitBad),
            _ => Err(format!(
                "unknown feedback type '{}' (expected implicit, implicit_accept, implicit_reject, explicit_good or explicit_bad)",
                s
            )),
        }
    }
}

/// A feedback event as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// Store-assigned, monotonic
    pub id: u64,
    pub operation_type: String,
    pub material: String,
    pub geometry_type: String,
    #[serde(default)]
    pub context_snapshot: Value,
    #[serde(default)]
    pub suggestion_payload: Value,
    /// `None` when the user accepted the suggestion unchanged
    #[serde(default)]
    pub user_choice: Option<Value>,
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub feedback_note: Option<String>,
    #[serde(default)]
    pub confidence_before: Option<f64>,
    /// Store-assigned, monotonic UTC; may be absent in imported history
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A feedback event before the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub operation_type: String,
    pub material: String,
    pub geometry_type: String,
    #[serde(default)]
    pub context_snapshot: Value,
    #[serde(default)]
    pub suggestion_payload: Value,
    #[serde(default)]
    pub user_choice: Option<Value>,
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub feedback_note: Option<String>,
    #[serde(default)]
    pub confidence_before: Option<f64>,
}

impl NewFeedback {
    /// Minimal event; snapshots default to null
    pub fn new(
        operation_type: impl Into<String>,
        material: impl Into<String>,
        geometry_type: impl Into<String>,
        feedback_type: FeedbackType,
    ) -> Self {
        Self {
            operation_type: operation_type.into(),
            material: material.into(),
            geometry_type: geometry_type.into(),
            context_snapshot: Value::Null,
            suggestion_payload: Value::Null,
            user_choice: None,
            feedback_type,
            feedback_note: None,
            confidence_before: None,
        }
    }

    /// Builder method to set the user's override
    pub fn with_user_choice(mut self, choice: Value) -> Self {
        self.user_choice = Some(choice);
        self
    }

    /// Normalize keys and reject empty operation types
    pub fn normalized(mut self) -> Result<Self, String> {
        self.operation_type = normalize_key(&self.operation_type);
        self.material = normalize_key(&self.material);
        self.geometry_type = normalize_key(&self.geometry_type);
        if self.operation_type.is_empty() {
            return Err("operation_type must not be empty".to_string());
        }
        Ok(self)
    }

    /// Attach store-assigned fields
    pub fn into_event(self, id: u64, created_at: DateTime<Utc>) -> FeedbackEvent {
        FeedbackEvent {
            id,
            operation_type: self.operation_type,
            material: self.material,
            geometry_type: self.geometry_type,
            context_snapshot: self.context_snapshot,
            suggestion_payload: self.suggestion_payload,
            user_choice: self.user_choice,
            feedback_type: self.feedback_type,
            feedback_note: self.feedback_note,
            confidence_before: self.confidence_before,
            created_at: Some(created_at),
        }
    }
}

/// Query over stored feedback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    /// Exact operation type
    pub operation_type: Option<String>,
    /// Exact geometry type
    pub geometry_type: Option<String>,
    /// Maximum number of events returned
    pub limit: Option<usize>,
    /// Newest first instead of oldest first
    pub newest_first: bool,
}

impl FeedbackFilter {
    /// All events of one operation type (or all events), oldest first
    pub fn for_operation(operation_type: Option<&str>) -> Self {
        Self {
            operation_type: operation_type.map(normalize_key),
            ..Default::default()
        }
    }

    /// Whether an event passes the exact-match fields
    pub fn matches(&self, event: &FeedbackEvent) -> bool {
        self.operation_type
            .as_deref()
            .map_or(true, |op| event.operation_type == normalize_key(op))
            && self
                .geometry_type
                .as_deref()
                .map_or(true, |g| event.geometry_type == normalize_key(g))
    }
}

/// Stored stock setup preference, keyed by (material, geometry type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPreference {
    pub material: String,
    pub geometry_type: String,
    pub offsets_xy_mm: f64,
    pub offsets_z_mm: f64,
    #[serde(default)]
    pub preferred_orientation: Option<String>,
    pub stock_shape: String,
    #[serde(default)]
    pub machining_allowance_mm: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockPreference {
    /// Preference with default offsets and rectangular stock
    pub fn new(material: impl Into<String>, geometry_type: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            geometry_type: geometry_type.into(),
            offsets_xy_mm: 5.0,
            offsets_z_mm: 2.5,
            preferred_orientation: None,
            stock_shape: "rectangular".to_string(),
            machining_allowance_mm: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Normalized composite key
    pub fn key(&self) -> String {
        composite_key(&self.material, &self.geometry_type)
    }
}

/// Stored toolpath strategy preference, keyed by (material, feature type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPreference {
    pub material: String,
    pub feature_type: String,
    #[serde(default)]
    pub preferred_roughing_op: Option<String>,
    #[serde(default)]
    pub preferred_finishing_op: Option<String>,
    #[serde(default)]
    pub preferred_tool_diameter_mm: Option<f64>,
    pub confidence_score: f64,
    pub times_used: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StrategyPreference {
    /// Empty preference with neutral confidence
    pub fn new(material: impl Into<String>, feature_type: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            feature_type: feature_type.into(),
            preferred_roughing_op: None,
            preferred_finishing_op: None,
            preferred_tool_diameter_mm: None,
            confidence_score: 0.5,
            times_used: 1,
            created_at: None,
            updated_at: None,
        }
    }

    /// Normalized composite key
    pub fn key(&self) -> String {
        composite_key(&self.material, &self.feature_type)
    }
}

/// Composite store key from two normalized parts
pub fn composite_key(a: &str, b: &str) -> String {
    format!("{}::{}", normalize_key(a), normalize_key(b))
}
