mod common;

use common::{hole_plate, OfflineStore};
use serde_json::{json, Value};
use setupkit_advisor::{
    ClearResponse, ExportResponse, RecordChoiceRequest, RecordChoiceResponse, SetupAdvisor,
};
use setupkit_learning::{ExportFormat, FeedbackEvent, JsonFileStore};
use setupkit_settings::EngineConfig;
use std::sync::Arc;

fn choice(operation_type: &str, user_choice: Option<Value>) -> RecordChoiceRequest {
    RecordChoiceRequest {
        operation_type: operation_type.to_string(),
        material: "aluminum".to_string(),
        geometry_type: Some("simple".to_string()),
        geometry: None,
        suggestion: json!({"offsets_xy_mm": 5.0, "confidence_score": 0.8}),
        user_choice,
        feedback_type: None,
        note: None,
    }
}

#[test]
fn test_implicit_accept_and_reject() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());

    let RecordChoiceResponse::Recorded {
        feedback_id,
        feedback_type,
        message,
        context,
        ..
    } = advisor.record_user_choice(&choice("stock_setup", None))
    else {
        panic!("expected recorded");
    };
    assert_eq!(feedback_id, 1);
    assert_eq!(feedback_type, "implicit_accept");
    assert_eq!(message, "Feedback recorded successfully");
    assert_eq!(context["geometry_type"], "simple");

    let RecordChoiceResponse::Recorded {
        feedback_id,
        feedback_type,
        ..
    } = advisor.record_user_choice(&choice(
        "stock_setup",
        Some(json!({"offsets_xy_mm": 3.0})),
    ))
    else {
        panic!("expected recorded");
    };
    assert_eq!(feedback_id, 2);
    assert_eq!(feedback_type, "implicit_reject");
}

#[test]
fn test_explicit_rating_and_invalid_type() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());

    let mut request = choice("toolpath_strategy", None);
    request.feedback_type = Some("explicit_bad".to_string());
    request.note = Some("chatter on the walls".to_string());
    let RecordChoiceResponse::Recorded { feedback_type, .. } = advisor.record_user_choice(&request)
    else {
        panic!("expected recorded");
    };
    assert_eq!(feedback_type, "explicit_bad");

    request.feedback_type = Some("meh".to_string());
    let RecordChoiceResponse::Error(body) = advisor.record_user_choice(&request) else {
        panic!("expected error");
    };
    assert_eq!(body.kind, "invalid_input");
}

#[test]
fn test_missing_fields_are_rejected() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());

    let mut request = choice("", None);
    assert_eq!(advisor.record_user_choice(&request).status(), "error");

    request = choice("stock_setup", None);
    request.suggestion = Value::Null;
    let RecordChoiceResponse::Error(body) = advisor.record_user_choice(&request) else {
        panic!("expected error");
    };
    assert!(body.message.contains("suggestion"));

    request = choice("stock_setup", None);
    request.geometry_type = None;
    let RecordChoiceResponse::Error(body) = advisor.record_user_choice(&request) else {
        panic!("expected error");
    };
    assert!(body.message.contains("geometry_type"));
}

#[test]
fn test_geometry_type_derived_from_geometry() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    let mut request = choice("stock_setup", None);
    request.geometry_type = None;
    request.geometry = Some(hole_plate());

    let RecordChoiceResponse::Recorded { context, .. } = advisor.record_user_choice(&request)
    else {
        panic!("expected recorded");
    };
    assert_eq!(context["geometry_type"], "hole-heavy");
}

#[test]
fn test_offline_store_does_not_record() {
    let advisor = SetupAdvisor::with_store(EngineConfig::default(), Arc::new(OfflineStore));
    let response = advisor.record_user_choice(&choice("stock_setup", None));
    assert_eq!(response.status(), "not_recorded");

    let stats = advisor.feedback_statistics(None);
    assert_eq!(stats.overall.total_count, 0);
}

#[test]
fn test_clear_requires_confirmation() {
    let advisor = SetupAdvisor::in_memory(EngineConfig::default());
    advisor.record_user_choice(&choice("stock_setup", None));
    advisor.record_user_choice(&choice("toolpath_strategy", None));

    let ClearResponse::ConfirmationRequired {
        operation_type,
        message,
    } = advisor.clear_feedback_history(Some("stock_setup"), false)
    else {
        panic!("expected confirmation_required");
    };
    assert_eq!(operation_type.as_deref(), Some("stock_setup"));
    assert!(message.contains("confirm=true"));
    assert_eq!(advisor.feedback_statistics(None).overall.total_count, 2);

    let ClearResponse::Cleared {
        deleted_count,
        operation_type,
        ..
    } = advisor.clear_feedback_history(Some("stock_setup"), true)
    else {
        panic!("expected cleared");
    };
    assert_eq!(deleted_count, 1);
    assert_eq!(operation_type.as_deref(), Some("stock_setup"));

    let response = advisor.clear_feedback_history(None, true);
    assert_eq!(response.status(), "cleared");
    assert!(matches!(response, ClearResponse::Cleared { deleted_count: 1, .. }));
}

#[test]
fn test_offline_store_history_calls_return_errors() {
    let advisor = SetupAdvisor::with_store(EngineConfig::default(), Arc::new(OfflineStore));

    let ExportResponse::Error(body) = advisor.export_feedback_history(ExportFormat::Csv, None)
    else {
        panic!("expected error");
    };
    assert_eq!(body.kind, "store");
    assert!(body.message.contains("connection refused"));

    let ClearResponse::Error(body) = advisor.clear_feedback_history(None, true) else {
        panic!("expected error");
    };
    assert_eq!(body.kind, "store");

    // the confirmation check needs no store
    let response = advisor.clear_feedback_history(None, false);
    assert_eq!(response.status(), "confirmation_required");

    let value = serde_json::to_value(advisor.export_feedback_history(ExportFormat::Json, None))
        .unwrap();
    assert_eq!(value["status"], "error");
}

#[test]
fn test_history_persists_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learning.json");

    {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let advisor = SetupAdvisor::with_store(EngineConfig::default(), store);
        advisor.record_user_choice(&choice("stock_setup", None));
        advisor.record_user_choice(&choice("stock_setup", Some(json!({"offsets_z_mm": 1.0}))));
    }

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let advisor = SetupAdvisor::with_store(EngineConfig::default(), store);

    let stats = advisor.feedback_statistics(Some("stock_setup"));
    assert_eq!(stats.overall.total_count, 2);

    let exported = advisor.export_feedback_history(ExportFormat::Json, None);
    assert_eq!(exported.status(), "exported");
    let events: Vec<FeedbackEvent> = serde_json::from_str(exported.data().unwrap()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, 1);
    assert_eq!(events[0].confidence_before, Some(0.8));
    assert!(events[1].user_choice.is_some());

    let csv = advisor.export_feedback_history(ExportFormat::Csv, Some("stock_setup"));
    assert_eq!(csv.data().unwrap().lines().count(), 3);
}
