//! Orientation analysis
//!
//! Scores the three principal-axis orientations by feature access, setup
//! count and base stability, and builds a setup sequence for each.
//!
//! score = 0.60 × reachable/total + 0.30 × 1/setups + 0.10 × base/Σ faces

use crate::error::{AnalysisError, AnalysisResult};
use crate::geometry_helpers::analyze_feature_accessibility;
use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, BoundingBox, Feature, Quantity};
use std::fmt;
use std::str::FromStr;

/// One of the three principal part orientations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum OrientationAxis {
    /// Part Z axis points at the spindle
    #[serde(rename = "Z_UP")]
    ZUp,
    /// Part Y axis points at the spindle
    #[serde(rename = "Y_UP")]
    YUp,
    /// Part X axis points at the spindle
    #[serde(rename = "X_UP")]
    XUp,
}

impl OrientationAxis {
    /// Evaluation order, also the tie-break order
    pub const ALL: [OrientationAxis; 3] = [Self::ZUp, Self::YUp, Self::XUp];

    /// Name as used in requests and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZUp => "Z_UP",
            Self::YUp => "Y_UP",
            Self::XUp => "X_UP",
        }
    }

    /// Direction the tool travels when approaching the part
    pub fn tool_direction(&self) -> [f64; 3] {
        match self {
            Self::ZUp => [0.0, 0.0, -1.0],
            Self::YUp => [0.0, -1.0, 0.0],
            Self::XUp => [-1.0, 0.0, 0.0],
        }
    }

    /// Area of the face the part rests on
    pub fn base_area(&self, dims: [f64; 3]) -> f64 {
        let [x, y, z] = dims;
        match self {
            Self::ZUp => x * y,
            Self::YUp => x * z,
            Self::XUp => y * z,
        }
    }

    /// (width, depth, height) as seen from this orientation
    pub fn oriented_dims(&self, dims: [f64; 3]) -> [f64; 3] {
        let [x, y, z] = dims;
        match self {
            Self::ZUp => [x, y, z],
            Self::YUp => [x, z, y],
            Self::XUp => [y, z, x],
        }
    }
}

impl fmt::Display for OrientationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrientationAxis {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Z_UP" | "Z" => Ok(Self::ZUp),
            "Y_UP" | "Y" => Ok(Self::YUp),
            "X_UP" | "X" => Ok(Self::XUp),
            _ => Err(AnalysisError::UnknownOrientation(s.to_string())),
        }
    }
}

/// Scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    pub feature_access_weight: f64,
    pub setup_count_weight: f64,
    pub stability_weight: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            feature_access_weight: 0.60,
            setup_count_weight: 0.30,
            stability_weight: 0.10,
        }
    }
}

/// Kind of setup step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupAction {
    MachineTopFeatures,
    FlipPart,
    MachineBottomFeatures,
}

/// One step in a setup sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupStep {
    pub step: u32,
    pub action: SetupAction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

/// Feature that needs the second setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreachableEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
}

/// Part extents as seen from an orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseDimensions {
    pub width: Quantity,
    pub depth: Quantity,
    pub height: Quantity,
}

/// A scored orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationCandidate {
    pub axis: OrientationAxis,
    /// Composite score in `[0, 1]`, two decimals
    pub score: f64,
    pub setup_count: u32,
    pub reachable_features: usize,
    pub unreachable_features: usize,
    pub unreachable_feature_list: Vec<UnreachableEntry>,
    pub setup_sequence: Vec<SetupStep>,
    pub base_dimensions: BaseDimensions,
    pub reasoning: String,
}

/// Orientation analyzer
#[derive(Debug, Clone, Default)]
pub struct OrientationAnalyzer {
    config: OrientationConfig,
}

impl OrientationAnalyzer {
    /// Create an analyzer with the given weights
    pub fn new(config: OrientationConfig) -> Self {
        Self { config }
    }

    /// Score all three orientations, best first.
    ///
    /// Equal scores keep the Z_UP, Y_UP, X_UP order.
    pub fn suggest_orientations(
        &self,
        bbox: &BoundingBox,
        features: &[Feature],
    ) -> AnalysisResult<Vec<OrientationCandidate>> {
        bbox.validate()?;
        let dims = bbox.dims_mm();
        let total_area = dims[0] * dims[1] + dims[0] * dims[2] + dims[1] * dims[2];
        let feature_count = features.len();

        let mut candidates: Vec<OrientationCandidate> = OrientationAxis::ALL
            .iter()
            .map(|&axis| {
                let access = analyze_feature_accessibility(features, axis);
                let reachable = access.reachable.len();
                let unreachable = access.unreachable.len();
                let setup_count: u32 = if unreachable == 0 { 1 } else { 2 };

                let feature_ratio = reachable as f64 / feature_count.max(1) as f64;
                let setup_score = 1.0 / setup_count as f64;
                let stability = axis.base_area(dims) / total_area.max(0.001);
                let score = feature_ratio * self.config.feature_access_weight
                    + setup_score * self.config.setup_count_weight
                    + stability * self.config.stability_weight;

                let [w, d, h] = axis.oriented_dims(dims);
                OrientationCandidate {
                    axis,
                    score: round_to(score.clamp(0.0, 1.0), 2),
                    setup_count,
                    reachable_features: reachable,
                    unreachable_features: unreachable,
                    unreachable_feature_list: access
                        .unreachable
                        .iter()
                        .map(|u| UnreachableEntry {
                            kind: u.feature.kind.as_str().to_string(),
                            reason: u.reason.clone(),
                        })
                        .collect(),
                    setup_sequence: build_setup_sequence(reachable, unreachable, axis),
                    base_dimensions: BaseDimensions {
                        width: Quantity::mm(round_to(w, 3)),
                        depth: Quantity::mm(round_to(d, 3)),
                        height: Quantity::mm(round_to(h, 3)),
                    },
                    reasoning: format!(
                        "{}/{} features reachable, {} setup(s) required",
                        reachable, feature_count, setup_count
                    ),
                }
            })
            .collect();

        // sort_by is stable, so ties keep evaluation order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        tracing::debug!(
            "Orientation ranking: {}",
            candidates
                .iter()
                .map(|c| format!("{}={:.2}", c.axis, c.score))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(candidates)
    }
}

/// Machine what is reachable, then flip once for the rest
fn build_setup_sequence(
    reachable: usize,
    unreachable: usize,
    axis: OrientationAxis,
) -> Vec<SetupStep> {
    let mut sequence = Vec::new();
    if reachable > 0 {
        sequence.push(SetupStep {
            step: 1,
            action: SetupAction::MachineTopFeatures,
            description: format!(
                "Machine {} accessible features from {} orientation",
                reachable, axis
            ),
            feature_count: Some(reachable),
            requires: None,
        });
    }
    if unreachable > 0 {
        sequence.push(SetupStep {
            step: 2,
            action: SetupAction::FlipPart,
            description: "Flip part 180 degrees".to_string(),
            feature_count: None,
            requires: Some("Manual flip or tombstone fixture".to_string()),
        });
        sequence.push(SetupStep {
            step: 3,
            action: SetupAction::MachineBottomFeatures,
            description: format!("Machine {} features from opposite side", unreachable),
            feature_count: Some(unreachable),
            requires: None,
        });
    }
    sequence
}
