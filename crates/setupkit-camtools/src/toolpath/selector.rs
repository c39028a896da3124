//! Tool selection
//!
//! A tool fits a feature when:
//! - its radius is at most 80% of the feature's smallest internal corner radius
//! - its flute length is at least 1.2× the feature depth
//! - it matches the optional type filter
//!
//! Among fitting tools the largest diameter wins.

use super::feeds::ToolpathConfig;
use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, Feature, Quantity, Tool};

/// Numeric limits a tool had to satisfy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConstraint {
    /// Absent when the feature has no internal corners
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_radius_mm: Option<f64>,
    /// Absent when the feature has no depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_flute_length_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_type_filter: Option<String>,
}

/// Outcome of [`select_best_tool`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolSelection {
    /// A tool fits
    Ok {
        tool: Tool,
        reasoning: String,
        stepover_roughing: Quantity,
        stepover_finishing: Quantity,
    },
    /// Nothing fits; the violated limits are reported
    NoToolAvailable {
        reason: String,
        constraint: ToolConstraint,
    },
}

impl ToolSelection {
    /// Selected tool, if any
    pub fn tool(&self) -> Option<&Tool> {
        match self {
            Self::Ok { tool, .. } => Some(tool),
            Self::NoToolAvailable { .. } => None,
        }
    }
}

/// Choose the largest tool satisfying the corner radius and flute length rules
pub fn select_best_tool(
    tools: &[Tool],
    feature: &Feature,
    tool_type_filter: Option<&str>,
    config: &ToolpathConfig,
) -> ToolSelection {
    let corner_radius = feature
        .min_corner_radius_mm()
        .filter(|r| *r > 0.0 && r.is_finite());
    let max_radius = corner_radius
        .map(|r| r * config.corner_radius_rule)
        .unwrap_or(f64::INFINITY);
    let depth = feature.depth_mm().filter(|d| *d > 0.0);
    let min_flute = depth.map(|d| d * config.flute_length_factor);

    let best = tools
        .iter()
        .filter(|t| t.radius_mm() <= max_radius)
        .filter(|t| match (min_flute, t.flute_length_mm()) {
            (Some(required), Some(flute)) => flute >= required,
            _ => true,
        })
        .filter(|t| tool_type_filter.map_or(true, |f| t.tool_type.matches_filter(f)))
        .max_by(|a, b| a.diameter_mm().total_cmp(&b.diameter_mm()));

    match best {
        Some(tool) => {
            let mut parts = vec![format!(
                "Selected {:.2}mm {}",
                tool.diameter_mm(),
                tool.tool_type
            )];
            if max_radius.is_finite() {
                parts.push(format!(
                    "(largest fitting tool, radius {:.2}mm <= {:.2}mm limit)",
                    tool.radius_mm(),
                    max_radius
                ));
            } else {
                parts.push("(largest fitting tool)".to_string());
            }
            if let Some(required) = min_flute {
                let flute = tool
                    .flute_length_mm()
                    .map(|f| format!("{:.1}", f))
                    .unwrap_or_else(|| "unknown".to_string());
                parts.push(format!(
                    "flute length {}mm >= {:.2}mm required",
                    flute, required
                ));
            }
            if let Some(filter) = tool_type_filter {
                parts.push(format!("matches type filter '{}'", filter));
            }

            let diameter = tool.diameter_mm();
            ToolSelection::Ok {
                tool: tool.clone(),
                reasoning: format!("{}.", parts.join(". ")),
                stepover_roughing: Quantity::mm(round_to(
                    diameter * config.roughing_stepover,
                    2,
                )),
                stepover_finishing: Quantity::mm(round_to(
                    diameter * config.finishing_stepover,
                    2,
                )),
            }
        }
        None => {
            let mut violated = Vec::new();
            if let Some(filter) = tool_type_filter {
                violated.push(format!("type='{}'", filter));
            }
            if let Some(r) = corner_radius {
                violated.push(format!(
                    "max_radius={:.2}mm ({:.0}% of {:.2}mm)",
                    max_radius,
                    config.corner_radius_rule * 100.0,
                    r
                ));
            }
            if let (Some(required), Some(d)) = (min_flute, depth) {
                violated.push(format!(
                    "min_flute_length={:.2}mm (depth {:.2}mm * {})",
                    required, d, config.flute_length_factor
                ));
            }
            let reason = if violated.is_empty() {
                "No tools available".to_string()
            } else {
                format!(
                    "No tools available matching constraints: {}",
                    violated.join(", ")
                )
            };
            tracing::debug!("{} for {} feature", reason, feature.kind);

            ToolSelection::NoToolAvailable {
                reason,
                constraint: ToolConstraint {
                    max_radius_mm: max_radius.is_finite().then(|| round_to(max_radius, 3)),
                    min_flute_length_mm: min_flute.map(|f| round_to(f, 3)),
                    tool_type_filter: tool_type_filter.map(str::to_string),
                },
            }
        }
    }
}
