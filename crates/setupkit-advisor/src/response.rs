//! Orchestrator responses
//!
//! Every response is a tagged union on `status`; each variant carries only
//! the fields relevant to it.

use crate::error::ErrorBody;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use setupkit_camtools::stock::calculator::RawDimensions;
use setupkit_camtools::{
    CuttingParameters, Operation, OrientationAxis, SetupStep, StockTradeOffs, ToolConstraint,
};
use setupkit_core::{Axis, FeatureKind, MeasurementSystem, Quantity, ToolType};
use setupkit_learning::{ConfidenceSource, ExportFormat};

/// Confidence adjustment reported with a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningMetadata {
    pub sample_count: usize,
    pub adjusted_confidence: f64,
    pub source: ConfidenceSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
}

// ---------------------------------------------------------------------------
// Stock setup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockShape {
    Rectangular,
    Round,
}

impl StockShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rectangular => "rectangular",
            Self::Round => "round",
        }
    }
}

/// Defaults offered when no preference is stored, in the requested system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedDefaults {
    pub offsets_xy: Quantity,
    pub offsets_z: Quantity,
    pub stock_shape: StockShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationOption {
    pub axis: OrientationAxis,
    pub score: f64,
    pub reasoning: String,
    pub setup_sequence: Vec<SetupStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationAlternative {
    pub axis: OrientationAxis,
    pub score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationSummary {
    pub recommended: OrientationAxis,
    pub score: f64,
    pub reasoning: String,
    /// Other orientations within the alternative window of the best score
    pub alternatives: Vec<OrientationAlternative>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularStock {
    pub width: Quantity,
    pub depth: Quantity,
    pub height: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundStock {
    pub diameter: Quantity,
    pub length: Quantity,
    pub cylinder_axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOptions {
    pub rectangular: RectangularStock,
    pub round: Option<RoundStock>,
}

/// Offsets used for the stock, in the requested system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedOffsets {
    /// Added on each side of width and depth
    pub xy: Quantity,
    /// Added once, on top
    pub z: Quantity,
}

/// Full stock setup suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSuggestion {
    pub stock_dimensions: StockOptions,
    pub recommended_shape: StockShape,
    pub shape_trade_offs: Option<StockTradeOffs>,
    pub orientation: OrientationSummary,
    pub setup_sequence: Vec<SetupStep>,
    pub offsets_applied: AppliedOffsets,
    pub source: String,
    pub material: String,
    pub geometry_type: String,
    pub unit_system: MeasurementSystem,
    pub raw_dimensions: RawDimensions,
    pub rounded_to_standard: bool,
    pub learning_metadata: Option<LearningMetadata>,
    pub confidence: f64,
    pub machine_warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StockSetupResponse {
    Success(Box<StockSuggestion>),
    PreferenceNeeded {
        message: String,
        material: String,
        geometry_type: String,
        suggested_defaults: SuggestedDefaults,
        how_to_proceed: String,
    },
    OrientationChoiceNeeded {
        message: String,
        best_orientation: OrientationOption,
        alternatives: Vec<OrientationOption>,
        how_to_proceed: String,
    },
    Error(ErrorBody),
}

impl StockSetupResponse {
    /// The `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::PreferenceNeeded { .. } => "preference_needed",
            Self::OrientationChoiceNeeded { .. } => "orientation_choice_needed",
            Self::Error(_) => "error",
        }
    }

    /// The suggestion, when the call succeeded
    pub fn suggestion(&self) -> Option<&StockSuggestion> {
        match self {
            Self::Success(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Toolpath strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_corner_radius: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub id: Option<String>,
    pub dimensions: FeatureDimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationChoice {
    pub operation_type: Operation,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedTool {
    pub description: String,
    pub diameter: Quantity,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub flutes: Option<u32>,
    pub reasoning: String,
}

/// Strategy for one feature with a fitting tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStrategy {
    pub feature: FeatureSummary,
    pub roughing: OperationChoice,
    pub finishing: OperationChoice,
    pub recommended_tool: RecommendedTool,
    pub cutting_parameters: CuttingParameters,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureSuggestion {
    Ok(Box<FeatureStrategy>),
    NoToolAvailable {
        feature: FeatureSummary,
        reason: String,
        constraint: ToolConstraint,
    },
}

impl FeatureSuggestion {
    pub fn strategy(&self) -> Option<&FeatureStrategy> {
        match self {
            Self::Ok(s) => Some(s),
            Self::NoToolAvailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritySummary {
    pub name: String,
    pub priority: u8,
    pub description: String,
    pub feature_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolpathSuggestion {
    pub material: String,
    pub is_carbide: bool,
    pub geometry_type: String,
    pub feature_count: usize,
    pub suggestions: Vec<FeatureSuggestion>,
    pub priority_groups: Vec<PrioritySummary>,
    pub processing_order: String,
    pub source: String,
    pub note: String,
    pub learning_metadata: Option<LearningMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limitations {
    pub detected_types: Vec<String>,
    pub not_detected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFound {
    pub cylindrical_faces: u32,
    pub planar_faces: u32,
    pub has_complex_surfaces: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolpathResponse {
    Success(Box<ToolpathSuggestion>),
    NoFeatures {
        message: String,
        body_name: String,
        material: String,
        limitations: Limitations,
        geometry_found: GeometryFound,
        next_steps: String,
    },
    Error(ErrorBody),
}

impl ToolpathResponse {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NoFeatures { .. } => "no_features",
            Self::Error(_) => "error",
        }
    }

    pub fn suggestion(&self) -> Option<&ToolpathSuggestion> {
        match self {
            Self::Success(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordChoiceResponse {
    Recorded {
        feedback_id: u64,
        operation_type: String,
        feedback_type: String,
        message: String,
        context: Value,
    },
    /// The store rejected the write; the caller's flow continues
    NotRecorded {
        operation_type: String,
        feedback_type: String,
        message: String,
    },
    Error(ErrorBody),
}

impl RecordChoiceResponse {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Recorded { .. } => "recorded",
            Self::NotRecorded { .. } => "not_recorded",
            Self::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportResponse {
    Exported {
        format: ExportFormat,
        operation_type: Option<String>,
        data: String,
    },
    Error(ErrorBody),
}

impl ExportResponse {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Exported { .. } => "exported",
            Self::Error(_) => "error",
        }
    }

    /// The exported document, when the store could be read
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::Exported { data, .. } => Some(data),
            Self::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClearResponse {
    Cleared {
        deleted_count: usize,
        operation_type: Option<String>,
        message: String,
    },
    /// Nothing was deleted because `confirm` was not set
    ConfirmationRequired {
        operation_type: Option<String>,
        message: String,
    },
    Error(ErrorBody),
}

impl ClearResponse {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Cleared { .. } => "cleared",
            Self::ConfirmationRequired { .. } => "confirmation_required",
            Self::Error(_) => "error",
        }
    }
}
