//! Toolpath strategy orchestration
//!
//! Features are processed in machining order (holes, pockets, slots, then
//! anything else). Each gets operations from the mapping rules or a stored
//! strategy preference, the largest fitting tool, and roughing feeds.

use crate::advisor::{SetupAdvisor, TOOLPATH_STRATEGY_OPERATION};
use crate::error::{AdvisorError, AdvisorResult, ErrorBody};
use crate::request::ToolpathRequest;
use crate::response::{
    FeatureDimensions, FeatureStrategy, FeatureSuggestion, FeatureSummary, GeometryFound,
    Limitations, OperationChoice, PrioritySummary, RecommendedTool, ToolpathResponse,
    ToolpathSuggestion,
};
use crate::stock::log_save_failure;
use setupkit_camtools::{
    group_by_machining_priority, map_feature_to_operations, select_best_tool, CutType, Operation,
    ToolSelection,
};
use setupkit_core::{BodyGeometry, Feature, FeatureKind, Tool};
use setupkit_learning::StrategyPreference;
use std::collections::HashMap;

const PROCESSING_ORDER: &str = "drilling -> roughing -> finishing";

const STARTING_POINT_NOTE: &str = "These are starting-point suggestions. Adjust based on machine rigidity, workholding, and tool condition.";

const DETECTED_TYPES: [&str; 3] = [
    "Simple holes (drilled, counterbored, countersunk)",
    "Rectangular pockets",
    "Slots",
];

const NOT_DETECTED: [&str; 5] = [
    "Threaded holes (use a thread operation manually)",
    "Complex surface geometry (NURBS, splines, sculpted surfaces)",
    "Chamfers, fillets, and radii (considered finish features)",
    "Holes in patterns that weren't modeled as hole features",
    "Non-standard pocket shapes or blind cavities",
];

const MANUAL_NEXT_STEPS: &str = "For this part, create CAM operations manually. Typical strategy: (1) Adaptive Clearing for roughing, (2) Contour for walls/profiles, (3) Scallop or Parallel for complex surfaces, (4) Thread Milling for threaded holes.";

fn machining_rank(kind: FeatureKind) -> u8 {
    match kind {
        FeatureKind::Hole => 0,
        FeatureKind::Pocket => 1,
        FeatureKind::Slot => 2,
        FeatureKind::Unknown => 3,
    }
}

impl SetupAdvisor {
    /// Suggest operations, tools and cutting parameters per feature.
    ///
    /// Never fails: errors become a `status: "error"` response.
    pub fn suggest_toolpath_strategy(&self, request: &ToolpathRequest) -> ToolpathResponse {
        match self.try_suggest_toolpath_strategy(request) {
            Ok(response) => {
                tracing::info!("Toolpath strategy suggestion: {}", response.status());
                response
            }
            Err(e) => {
                tracing::warn!("Toolpath strategy suggestion failed: {}", e);
                ToolpathResponse::Error(ErrorBody::from(&e))
            }
        }
    }

    fn try_suggest_toolpath_strategy(
        &self,
        request: &ToolpathRequest,
    ) -> AdvisorResult<ToolpathResponse> {
        let material = self.resolve_material(request.material.as_deref());

        let mut features: Vec<Feature> = self
            .refine_features(&request.geometry.features)
            .into_iter()
            .filter(|f| !f.is_error())
            .collect();
        features.sort_by_key(|f| machining_rank(f.kind));

        if features.is_empty() {
            return Ok(no_features_response(&request.geometry, material));
        }
        if request.tools.is_empty() {
            return Err(AdvisorError::MissingInput("tools".to_string()));
        }

        let geometry_type = self.classify(&features).as_str().to_string();

        let mut preferences: HashMap<FeatureKind, StrategyPreference> = HashMap::new();
        if !request.use_defaults {
            for feature in &features {
                if preferences.contains_key(&feature.kind) {
                    continue;
                }
                match self
                    .preferences
                    .get_strategy_preference(&material, feature.kind.as_str())
                {
                    Ok(Some(pref)) => {
                        preferences.insert(feature.kind, pref);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            "Failed to read strategy preference for {}: {}",
                            feature.kind,
                            e
                        );
                    }
                }
            }
        }

        let learning =
            self.learning_metadata(TOOLPATH_STRATEGY_OPERATION, &material, &geometry_type);

        let feeds = self.feeds_calculator();
        let material_props = self.materials.lookup(&material).properties;
        let mut suggestions = Vec::with_capacity(features.len());
        let mut used_preference = false;

        for feature in &features {
            let mapping = map_feature_to_operations(feature, material_props);
            let mut roughing = OperationChoice {
                operation_type: mapping.roughing.operation,
                confidence: mapping.roughing.confidence,
                reasoning: mapping.roughing.reasoning.clone(),
            };
            let mut finishing = OperationChoice {
                operation_type: mapping.finishing.operation,
                confidence: mapping.finishing.confidence,
                reasoning: mapping.finishing.reasoning.clone(),
            };
            let source = match preferences.get(&feature.kind) {
                Some(pref) => {
                    used_preference = true;
                    apply_preferred_operation(&mut roughing, &pref.preferred_roughing_op);
                    apply_preferred_operation(&mut finishing, &pref.preferred_finishing_op);
                    "from: user_preference"
                }
                None => "from: default_rules",
            };

            let tool_filter = (roughing.operation_type == Operation::Drilling).then_some("drill");
            let summary = summarize_feature(feature);

            match select_best_tool(&request.tools, feature, tool_filter, feeds.config()) {
                ToolSelection::NoToolAvailable { reason, constraint } => {
                    suggestions.push(FeatureSuggestion::NoToolAvailable {
                        feature: summary,
                        reason,
                        constraint,
                    });
                }
                ToolSelection::Ok { tool, reasoning, .. } => {
                    let cutting_parameters = feeds.calculate(
                        &material,
                        tool.diameter,
                        tool.flutes,
                        request.is_carbide,
                        CutType::Roughing,
                    )?;
                    suggestions.push(FeatureSuggestion::Ok(Box::new(FeatureStrategy {
                        feature: summary,
                        roughing,
                        finishing,
                        recommended_tool: recommended_tool(&tool, reasoning),
                        cutting_parameters,
                        source: source.to_string(),
                    })));
                }
            }
        }

        if request.save_as_preference {
            self.save_strategy_preferences(&material, &suggestions);
        }

        let priority_groups = group_by_machining_priority(&features)
            .into_iter()
            .map(|g| PrioritySummary {
                feature_count: g.features.len(),
                name: g.name,
                priority: g.priority,
                description: g.description,
            })
            .collect();

        Ok(ToolpathResponse::Success(Box::new(ToolpathSuggestion {
            material,
            is_carbide: request.is_carbide,
            geometry_type,
            feature_count: features.len(),
            suggestions,
            priority_groups,
            processing_order: PROCESSING_ORDER.to_string(),
            source: if used_preference {
                "from: user_preference"
            } else {
                "from: default_rules"
            }
            .to_string(),
            note: STARTING_POINT_NOTE.to_string(),
            learning_metadata: learning,
        })))
    }

    /// One preference per feature type, from its first suggestion with a tool
    fn save_strategy_preferences(&self, material: &str, suggestions: &[FeatureSuggestion]) {
        let mut saved: Vec<FeatureKind> = Vec::new();
        for strategy in suggestions.iter().filter_map(FeatureSuggestion::strategy) {
            let kind = strategy.feature.kind;
            if saved.contains(&kind) {
                continue;
            }
            saved.push(kind);

            let mut pref = StrategyPreference::new(material, kind.as_str());
            pref.preferred_roughing_op = Some(strategy.roughing.operation_type.as_str().to_string());
            pref.preferred_finishing_op =
                Some(strategy.finishing.operation_type.as_str().to_string());
            pref.preferred_tool_diameter_mm = Some(strategy.recommended_tool.diameter.to_mm());
            pref.confidence_score = strategy.roughing.confidence.clamp(0.0, 1.0);
            if let Err(e) = self.preferences.save_strategy_preference(pref) {
                log_save_failure(&e);
            }
        }
    }
}

fn preferred_operation(name: &Option<String>) -> Option<Operation> {
    let name = name.as_deref()?;
    let op = Operation::parse(name);
    if op.is_none() {
        tracing::warn!("Ignoring unknown preferred operation '{}'", name);
    }
    op
}

/// Swap in a stored operation and note it in the reasoning
fn apply_preferred_operation(choice: &mut OperationChoice, preferred: &Option<String>) {
    let Some(op) = preferred_operation(preferred) else {
        return;
    };
    if op != choice.operation_type {
        choice.reasoning = format!(
            "{} was chosen from your stored preference (default rule: {})",
            op, choice.reasoning
        );
        choice.operation_type = op;
    } else {
        choice.reasoning = format!("{}; matches your stored preference", choice.reasoning);
    }
}

fn summarize_feature(feature: &Feature) -> FeatureSummary {
    let dimensions = match feature.kind {
        FeatureKind::Hole => FeatureDimensions {
            diameter: feature.diameter,
            depth: feature.depth,
            ..Default::default()
        },
        FeatureKind::Pocket | FeatureKind::Slot => FeatureDimensions {
            depth: feature.depth,
            width: feature.width,
            length: feature.length,
            min_corner_radius: feature.min_corner_radius,
            ..Default::default()
        },
        FeatureKind::Unknown => FeatureDimensions::default(),
    };
    FeatureSummary {
        kind: feature.kind,
        id: feature.id.clone(),
        dimensions,
    }
}

fn recommended_tool(tool: &Tool, reasoning: String) -> RecommendedTool {
    RecommendedTool {
        description: tool.description_short(),
        diameter: tool.diameter,
        tool_type: tool.tool_type,
        flutes: tool.flutes,
        reasoning,
    }
}

fn no_features_response(geometry: &BodyGeometry, material: String) -> ToolpathResponse {
    let counts = geometry.face_counts.unwrap_or_default();
    let mut found = Vec::new();
    if counts.cylindrical > 0 {
        found.push(format!("{} cylindrical faces", counts.cylindrical));
    }
    if counts.planar > 0 {
        found.push(format!("{} planar faces", counts.planar));
    }
    if counts.has_complex_surfaces {
        found.push("complex surfaces (fillets, rounds, or sculpted geometry)".to_string());
    }
    let description = if found.is_empty() {
        "various geometry".to_string()
    } else {
        found.join(", ")
    };
    let body_name = geometry.display_name().to_string();

    ToolpathResponse::NoFeatures {
        message: format!(
            "No automatically recognizable features detected in '{}'. Found {}, but no simple holes, pockets, or slots that feature recognition can identify.",
            body_name, description
        ),
        body_name,
        material,
        limitations: Limitations {
            detected_types: DETECTED_TYPES.iter().map(|s| s.to_string()).collect(),
            not_detected: NOT_DETECTED.iter().map(|s| s.to_string()).collect(),
        },
        geometry_found: GeometryFound {
            cylindrical_faces: counts.cylindrical,
            planar_faces: counts.planar,
            has_complex_surfaces: counts.has_complex_surfaces,
        },
        next_steps: MANUAL_NEXT_STEPS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machining_rank_order() {
        let mut kinds = vec![
            FeatureKind::Unknown,
            FeatureKind::Slot,
            FeatureKind::Hole,
            FeatureKind::Pocket,
        ];
        kinds.sort_by_key(|k| machining_rank(*k));
        assert_eq!(
            kinds,
            vec![
                FeatureKind::Hole,
                FeatureKind::Pocket,
                FeatureKind::Slot,
                FeatureKind::Unknown
            ]
        );
    }

    #[test]
    fn test_feature_summary_dimensions() {
        let hole = summarize_feature(&Feature::hole(6.0, 10.0).with_id("h1"));
        assert_eq!(hole.id.as_deref(), Some("h1"));
        assert!(hole.dimensions.diameter.is_some());
        assert!(hole.dimensions.width.is_none());

        let pocket = summarize_feature(&Feature::pocket(20.0, 30.0, 5.0).with_corner_radius(3.0));
        assert!(pocket.dimensions.diameter.is_none());
        assert_eq!(pocket.dimensions.min_corner_radius.map(|q| q.to_mm()), Some(3.0));
    }

    #[test]
    fn test_preferred_operation_noted_in_reasoning() {
        let mut choice = OperationChoice {
            operation_type: Operation::Pocket2d,
            confidence: 0.75,
            reasoning: "Standard 2D pocket with contour finishing".to_string(),
        };
        apply_preferred_operation(&mut choice, &Some("adaptive_clearing".to_string()));
        assert_eq!(choice.operation_type, Operation::AdaptiveClearing);
        assert!(choice
            .reasoning
            .starts_with("adaptive_clearing was chosen from your stored preference"));

        let mut unchanged = choice.clone();
        apply_preferred_operation(&mut unchanged, &Some("boring".to_string()));
        assert_eq!(unchanged, choice);
    }

    #[test]
    fn test_unknown_preferred_operation_ignored() {
        assert_eq!(
            preferred_operation(&Some("2d_pocket".to_string())),
            Some(Operation::Pocket2d)
        );
        assert_eq!(preferred_operation(&Some("boring".to_string())), None);
        assert_eq!(preferred_operation(&None), None);
    }
}
