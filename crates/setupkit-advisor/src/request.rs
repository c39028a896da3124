//! Orchestrator requests

use serde::{Deserialize, Serialize};
use serde_json::Value;
use setupkit_core::{BodyGeometry, MeasurementSystem, Quantity, Tool};

fn default_true() -> bool {
    true
}

/// Caller-supplied stock offsets; missing sides use the defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomOffsets {
    #[serde(default)]
    pub xy: Option<Quantity>,
    #[serde(default)]
    pub z: Option<Quantity>,
}

/// Input to [`crate::SetupAdvisor::suggest_stock_setup`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSetupRequest {
    pub geometry: BodyGeometry,
    /// Falls back to the configured default material
    #[serde(default)]
    pub material: Option<String>,
    /// Skip the stored-preference gate
    #[serde(default)]
    pub use_defaults: bool,
    /// `X_UP`, `Y_UP` or `Z_UP`; bypasses the orientation gate
    #[serde(default)]
    pub selected_orientation: Option<String>,
    #[serde(default)]
    pub custom_offsets: Option<CustomOffsets>,
    #[serde(default = "default_true")]
    pub round_to_standard: bool,
    #[serde(default)]
    pub unit_system: MeasurementSystem,
    #[serde(default)]
    pub save_as_preference: bool,
}

impl StockSetupRequest {
    /// Request with default options for a geometry snapshot
    pub fn new(geometry: BodyGeometry) -> Self {
        Self {
            geometry,
            material: None,
            use_defaults: false,
            selected_orientation: None,
            custom_offsets: None,
            round_to_standard: true,
            unit_system: MeasurementSystem::Metric,
            save_as_preference: false,
        }
    }
}

/// Input to [`crate::SetupAdvisor::suggest_toolpath_strategy`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolpathRequest {
    pub geometry: BodyGeometry,
    #[serde(default)]
    pub material: Option<String>,
    /// Tools available in the host library
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default = "default_true")]
    pub is_carbide: bool,
    #[serde(default)]
    pub use_defaults: bool,
    #[serde(default)]
    pub save_as_preference: bool,
}

impl ToolpathRequest {
    pub fn new(geometry: BodyGeometry, tools: Vec<Tool>) -> Self {
        Self {
            geometry,
            material: None,
            tools,
            is_carbide: true,
            use_defaults: false,
            save_as_preference: false,
        }
    }
}

/// Input to [`crate::SetupAdvisor::record_user_choice`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordChoiceRequest {
    pub operation_type: String,
    pub material: String,
    /// Derived from `geometry` when absent
    #[serde(default)]
    pub geometry_type: Option<String>,
    #[serde(default)]
    pub geometry: Option<BodyGeometry>,
    /// The suggestion as it was presented
    #[serde(default)]
    pub suggestion: Value,
    /// What the user chose instead; absent when the suggestion was kept
    #[serde(default)]
    pub user_choice: Option<Value>,
    /// `implicit` (default), `explicit_good` or `explicit_bad`
    #[serde(default)]
    pub feedback_type: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
