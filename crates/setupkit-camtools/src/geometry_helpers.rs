//! Geometry helpers
//!
//! - Tool radius limits from internal corner radii (the 80% rule)
//! - Feature accessibility per orientation
//! - Grouping features by machining priority

use crate::orientation::OrientationAxis;
use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, Feature, FeatureKind, Quantity};

/// Tool radius must not exceed this share of the smallest internal corner radius
pub const CORNER_RADIUS_RULE: f64 = 0.8;

/// Dot products at or below this count as "not opposing"
const NORMAL_TOLERANCE: f64 = 1e-6;

/// Result of [`calculate_minimum_tool_radii`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRadii {
    /// Smallest positive internal corner radius
    pub global_minimum_radius: Option<Quantity>,
    /// Largest recommended tool radius (80% of the minimum)
    pub recommended_tool_radius: Option<Quantity>,
    /// Guideline text for the user
    pub design_guideline: String,
}

/// Apply the 80% rule to a set of internal corner radii
pub fn calculate_minimum_tool_radii(corner_radii: &[Quantity]) -> ToolRadii {
    let min_radius = corner_radii
        .iter()
        .map(|q| q.to_mm())
        .filter(|r| *r > 0.0 && r.is_finite())
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.min(r))));

    match min_radius {
        Some(r) => ToolRadii {
            global_minimum_radius: Some(Quantity::mm(round_to(r, 3))),
            recommended_tool_radius: Some(Quantity::mm(round_to(r * CORNER_RADIUS_RULE, 3))),
            design_guideline: "Tool radius should be <= 80% of smallest internal corner radius"
                .to_string(),
        },
        None => ToolRadii {
            global_minimum_radius: None,
            recommended_tool_radius: None,
            design_guideline: "No internal corners detected; any tool radius acceptable"
                .to_string(),
        },
    }
}

/// Tool radii from the corner radii carried by a feature list
pub fn tool_radii_for_features(features: &[Feature]) -> ToolRadii {
    let radii: Vec<Quantity> = features.iter().filter_map(|f| f.min_corner_radius).collect();
    calculate_minimum_tool_radii(&radii)
}

/// A feature the tool cannot reach from one orientation
#[derive(Debug, Clone, PartialEq)]
pub struct UnreachableFeature<'a> {
    pub feature: &'a Feature,
    pub reason: String,
}

/// Partition of features for one orientation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessibility<'a> {
    pub reachable: Vec<&'a Feature>,
    pub unreachable: Vec<UnreachableFeature<'a>>,
}

/// Split features into reachable and unreachable for an orientation.
///
/// Conservative: a feature is unreachable only when the host flagged it, or
/// when its approach normal points away from a tool coming down the
/// orientation's axis. Features without data count as reachable.
pub fn analyze_feature_accessibility(
    features: &[Feature],
    orientation: OrientationAxis,
) -> Accessibility<'_> {
    let tool = orientation.tool_direction();
    let mut result = Accessibility::default();

    for feature in features {
        if feature.unreachable_in_3axis {
            let reason = feature
                .unreachable_reason
                .clone()
                .unwrap_or_else(|| "Feature normal opposes tool direction".to_string());
            result.unreachable.push(UnreachableFeature { feature, reason });
            continue;
        }

        let opposes = feature
            .approach_normal
            .map(|n| dot(n, tool) > NORMAL_TOLERANCE)
            .unwrap_or(false);
        if opposes {
            result.unreachable.push(UnreachableFeature {
                feature,
                reason: "Feature normal opposes tool direction".to_string(),
            });
        } else {
            result.reachable.push(feature);
        }
    }

    result
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Features sharing a machining priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityGroup {
    pub name: String,
    pub priority: u8,
    pub description: String,
    pub features: Vec<Feature>,
}

/// Group features into drilling (1), roughing (2) and finishing (3).
///
/// Only non-empty groups are returned, in ascending priority.
pub fn group_by_machining_priority(features: &[Feature]) -> Vec<PriorityGroup> {
    let mut groups = [
        PriorityGroup {
            name: "drilling_operations".to_string(),
            priority: 1,
            description: "Holes suitable for drilling".to_string(),
            features: Vec::new(),
        },
        PriorityGroup {
            name: "roughing_operations".to_string(),
            priority: 2,
            description: "Features requiring significant material removal".to_string(),
            features: Vec::new(),
        },
        PriorityGroup {
            name: "finishing_operations".to_string(),
            priority: 3,
            description: "Shallow features and fine details".to_string(),
            features: Vec::new(),
        },
    ];

    for feature in features {
        let diameter = feature.diameter_mm().unwrap_or(0.0);
        let depth = feature.depth_mm().unwrap_or(0.0);
        let index = if feature.kind == FeatureKind::Hole && diameter < 12.0 {
            0
        } else if feature.kind.is_pocket_like() && depth > 10.0 {
            1
        } else {
            2
        };
        groups[index].features.push(feature.clone());
    }

    groups
        .into_iter()
        .filter(|g| !g.features.is_empty())
        .collect()
}
