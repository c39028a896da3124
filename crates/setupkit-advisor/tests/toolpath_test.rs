mod common;

use common::{drill, endmill, OfflineStore};
use setupkit_advisor::{FeatureSuggestion, SetupAdvisor, ToolpathRequest, ToolpathResponse};
use setupkit_camtools::Operation;
use setupkit_core::types::FaceCounts;
use setupkit_core::{BodyGeometry, BoundingBox, Feature, FeatureKind, Tool};
use setupkit_learning::{InMemoryStore, PreferenceStore, StrategyPreference};
use setupkit_settings::{EngineConfig, MachineProfile};
use std::sync::Arc;

fn mixed_part() -> BodyGeometry {
    BodyGeometry::new(
        BoundingBox::from_mm(80.0, 50.0, 15.0),
        vec![
            Feature::slot(5.0, 40.0, 3.0).with_corner_radius(1.0).with_id("slot-1"),
            Feature::pocket(20.0, 30.0, 5.0).with_corner_radius(3.0).with_id("pocket-1"),
            Feature::hole(6.0, 10.0).with_id("hole-1"),
        ],
    )
}

fn tools() -> Vec<Tool> {
    vec![drill(1, 6.0, 20.0), endmill(2, 6.0, 25.0), endmill(3, 4.0, 12.0)]
}

#[test]
fn test_features_processed_in_machining_order() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));

    assert_eq!(response.status(), "success");
    let suggestion = response.suggestion().unwrap();
    assert_eq!(suggestion.feature_count, 3);
    assert_eq!(suggestion.geometry_type, "mixed");
    assert_eq!(suggestion.source, "from: default_rules");
    assert_eq!(suggestion.processing_order, "drilling -> roughing -> finishing");
    assert!(!suggestion.priority_groups.is_empty());

    let kinds: Vec<FeatureKind> = suggestion
        .suggestions
        .iter()
        .map(|s| match s {
            FeatureSuggestion::Ok(strategy) => strategy.feature.kind,
            FeatureSuggestion::NoToolAvailable { feature, .. } => feature.kind,
        })
        .collect();
    assert_eq!(kinds, vec![FeatureKind::Hole, FeatureKind::Pocket, FeatureKind::Slot]);
}

#[test]
fn test_elongated_pocket_is_milled_as_slot() {
    let geometry = BodyGeometry::new(
        BoundingBox::from_mm(80.0, 40.0, 10.0),
        vec![Feature::pocket(12.5, 50.0, 5.0).with_id("channel")],
    );
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(geometry, tools()));

    let suggestion = response.suggestion().unwrap();
    let channel = suggestion.suggestions[0].strategy().unwrap();
    assert_eq!(channel.feature.kind, FeatureKind::Slot);
    assert_eq!(channel.feature.id.as_deref(), Some("channel"));
    assert_eq!(channel.roughing.operation_type, Operation::SlotMilling);
    assert_eq!(channel.finishing.operation_type, Operation::Contour2d);
    assert_eq!(suggestion.priority_groups[0].name, "finishing_operations");
}

#[test]
fn test_small_hole_is_drilled_with_a_drill() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));
    let hole = response.suggestion().unwrap().suggestions[0].strategy().unwrap();

    assert_eq!(hole.feature.id.as_deref(), Some("hole-1"));
    assert_eq!(hole.roughing.operation_type, Operation::Drilling);
    assert_eq!(hole.finishing.operation_type, Operation::Drilling);
    assert_eq!(hole.recommended_tool.tool_type.slug(), "drill");
    assert_eq!(hole.recommended_tool.diameter.to_mm(), 6.0);
    assert_eq!(hole.source, "from: default_rules");

    let params = &hole.cutting_parameters;
    assert!(params.spindle_speed.value > 0.0);
    assert!(params.spindle_speed.value <= 24000.0);
    assert!(params.feed_rate.value > 0.0);
    assert!(params.is_carbide);
}

#[test]
fn test_pocket_tool_respects_corner_radius() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));
    let pocket = response.suggestion().unwrap().suggestions[1].strategy().unwrap();

    assert_eq!(pocket.roughing.operation_type, Operation::Pocket2d);
    assert_eq!(pocket.finishing.operation_type, Operation::Contour2d);
    // 3mm corners allow at most a 2.4mm radius
    assert_eq!(pocket.recommended_tool.diameter.to_mm(), 4.0);
    assert_eq!(
        pocket
            .feature
            .dimensions
            .min_corner_radius
            .map(|q| q.to_mm()),
        Some(3.0)
    );
}

#[test]
fn test_tight_slot_reports_no_tool() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));

    let FeatureSuggestion::NoToolAvailable {
        feature,
        reason,
        constraint,
    } = &response.suggestion().unwrap().suggestions[2]
    else {
        panic!("expected no_tool_available");
    };
    assert_eq!(feature.kind, FeatureKind::Slot);
    assert!(reason.contains("max_radius=0.80mm"));
    assert_eq!(constraint.max_radius_mm, Some(0.8));
}

#[test]
fn test_no_recognized_features() {
    let mut broken = Feature::hole(5.0, 5.0);
    broken.error = Some("failed to read hole".to_string());
    let mut geometry = BodyGeometry::new(BoundingBox::from_mm(50.0, 50.0, 20.0), vec![broken]);
    geometry.name = Some("Knob".to_string());
    geometry.face_counts = Some(FaceCounts {
        cylindrical: 4,
        planar: 10,
        total: 16,
        has_complex_surfaces: true,
    });

    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let ToolpathResponse::NoFeatures {
        message,
        body_name,
        limitations,
        geometry_found,
        ..
    } = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(geometry, Vec::new()))
    else {
        panic!("expected no_features");
    };
    assert_eq!(body_name, "Knob");
    assert!(message.contains("'Knob'"));
    assert!(message.contains("Found 4 cylindrical faces, 10 planar faces, complex surfaces"));
    assert_eq!(limitations.detected_types.len(), 3);
    assert_eq!(limitations.not_detected.len(), 5);
    assert_eq!(geometry_found.planar_faces, 10);
    assert!(geometry_found.has_complex_surfaces);
}

#[test]
fn test_empty_tool_library_is_an_error() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let ToolpathResponse::Error(body) =
        advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), Vec::new()))
    else {
        panic!("expected error");
    };
    assert_eq!(body.kind, "missing_input");
    assert!(body.message.contains("tools"));
}

#[test]
fn test_strategy_preference_overrides_operations() {
    let store = Arc::new(InMemoryStore::new());
    let mut pref = StrategyPreference::new("aluminum", "hole");
    pref.preferred_roughing_op = Some("helical_milling".to_string());
    store.save_strategy_preference(pref).unwrap();

    let advisor = SetupAdvisor::with_store(EngineConfig::default(), store);
    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));
    let suggestion = response.suggestion().unwrap();
    assert_eq!(suggestion.source, "from: user_preference");

    let hole = suggestion.suggestions[0].strategy().unwrap();
    assert_eq!(hole.roughing.operation_type, Operation::HelicalMilling);
    assert!(hole
        .roughing
        .reasoning
        .starts_with("helical_milling was chosen from your stored preference"));
    assert_eq!(hole.finishing.operation_type, Operation::Drilling);
    assert!(!hole.finishing.reasoning.contains("stored preference"));
    assert_eq!(hole.source, "from: user_preference");

    let pocket = suggestion.suggestions[1].strategy().unwrap();
    assert_eq!(pocket.source, "from: default_rules");

    let mut request = ToolpathRequest::new(mixed_part(), tools());
    request.use_defaults = true;
    let response = advisor.suggest_toolpath_strategy(&request);
    assert_eq!(response.suggestion().unwrap().source, "from: default_rules");
}

#[test]
fn test_save_as_preference_counts_uses() {
    let store = Arc::new(InMemoryStore::new());
    let advisor = SetupAdvisor::with_store(EngineConfig::default(), store.clone());
    let mut request = ToolpathRequest::new(mixed_part(), tools());
    request.use_defaults = true;
    request.save_as_preference = true;

    advisor.suggest_toolpath_strategy(&request);
    advisor.suggest_toolpath_strategy(&request);

    let hole = store
        .get_strategy_preference("aluminum", "hole")
        .unwrap()
        .unwrap();
    assert_eq!(hole.times_used, 2);
    assert_eq!(hole.preferred_roughing_op.as_deref(), Some("drilling"));
    assert_eq!(hole.preferred_tool_diameter_mm, Some(6.0));
    assert_eq!(hole.confidence_score, 0.95);

    // the slot had no tool, so nothing is saved for it
    assert!(store
        .get_strategy_preference("aluminum", "slot")
        .unwrap()
        .is_none());
}

#[test]
fn test_spindle_limit_from_machine_profile() {
    let mut config = EngineConfig::default();
    config.machine =
        Some(MachineProfile::new("Router", 600.0, 400.0, 100.0).with_spindle_max_rpm(10000.0));
    let advisor = SetupAdvisor::in_memory(config);

    let response = advisor.suggest_toolpath_strategy(&ToolpathRequest::new(mixed_part(), tools()));
    for strategy in response
        .suggestion()
        .unwrap()
        .suggestions
        .iter()
        .filter_map(FeatureSuggestion::strategy)
    {
        assert!(strategy.cutting_parameters.spindle_speed.value <= 10000.0);
    }
}

#[test]
fn test_offline_store_still_suggests() {
    let advisor = SetupAdvisor::with_store(EngineConfig::default(), Arc::new(OfflineStore));
    let mut request = ToolpathRequest::new(mixed_part(), tools());
    request.save_as_preference = true;

    let response = advisor.suggest_toolpath_strategy(&request);
    let suggestion = response.suggestion().unwrap();
    assert_eq!(suggestion.source, "from: default_rules");
    assert!(suggestion.learning_metadata.is_none());
}
