use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use setupkit_learning::{
    adjust_confidence_from_feedback, clear_feedback_history, detect_conflicts,
    export_feedback_history, get_feedback_statistics, get_similar_context_feedback,
    get_weighted_acceptance_rate, should_notify_learning, ConfidenceSource, ExportFormat,
    FeedbackEvent, FeedbackStore, FeedbackType, InMemoryStore, LearningConfig, NewFeedback,
    CSV_HEADER,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn event(feedback_type: FeedbackType, age_days: i64) -> FeedbackEvent {
    NewFeedback::new("stock_setup", "aluminum", "simple", feedback_type)
        .into_event(0, fixed_now() - Duration::days(age_days))
}

#[test]
fn test_short_history_keeps_base_confidence() {
    for len in 0..3 {
        let history: Vec<_> = (0..len).map(|_| event(FeedbackType::ImplicitReject, 0)).collect();
        let adjusted = adjust_confidence_from_feedback(0.8, &history, fixed_now());
        assert_eq!(adjusted.confidence, 0.8);
        assert_eq!(adjusted.source, ConfidenceSource::DefaultRules);
        assert_eq!(adjusted.source.as_str(), "default_rules");
    }
}

#[test]
fn test_three_accepts_raise_confidence() {
    let history: Vec<_> = (0..3).map(|_| event(FeedbackType::ImplicitAccept, 0)).collect();
    let adjusted = adjust_confidence_from_feedback(0.8, &history, fixed_now());
    // 0.8 * 0.7 + 1.0 * 0.3
    assert_eq!(adjusted.confidence, 0.86);
    assert_eq!(adjusted.source, ConfidenceSource::UserPreference);
    assert_eq!(adjusted.sample_count, 3);
}

#[test]
fn test_rejections_mark_tentative_and_floor() {
    let history: Vec<_> = (0..3).map(|_| event(FeedbackType::ImplicitReject, 0)).collect();
    let adjusted = adjust_confidence_from_feedback(0.8, &history, fixed_now());
    assert_eq!(adjusted.confidence, 0.56);
    assert_eq!(adjusted.source, ConfidenceSource::UserPreferenceTentative);

    let history: Vec<_> = (0..12).map(|_| event(FeedbackType::ExplicitBad, 1)).collect();
    let adjusted = adjust_confidence_from_feedback(0.8, &history, fixed_now());
    assert_eq!(adjusted.confidence, 0.2);
}

#[test]
fn test_weighted_rate_uses_recency_and_explicit_weight() {
    let history = vec![
        event(FeedbackType::ExplicitBad, 0),
        event(FeedbackType::ImplicitAccept, 0),
        event(FeedbackType::ImplicitAccept, 30),
    ];
    let (rate, count) =
        get_weighted_acceptance_rate(&history, fixed_now(), &LearningConfig::default());
    assert!((rate - 1.5 / 3.5).abs() < 1e-9);
    assert_eq!(count, 3);
}

#[test]
fn test_untimestamped_events_are_skipped() {
    let mut old = event(FeedbackType::ImplicitReject, 0);
    old.created_at = None;
    let history = vec![old, event(FeedbackType::ImplicitAccept, 0)];
    let (rate, count) =
        get_weighted_acceptance_rate(&history, fixed_now(), &LearningConfig::default());
    assert_eq!(rate, 1.0);
    assert_eq!(count, 2);
}

#[test]
fn test_notification_fires_only_at_threshold() {
    let history: Vec<_> = (0..4).map(|_| event(FeedbackType::ImplicitAccept, 0)).collect();
    assert!(!should_notify_learning(&history[..2]));
    assert!(should_notify_learning(&history[..3]));
    assert!(!should_notify_learning(&history[..4]));
}

#[test]
fn test_similar_context_matches_material_family() {
    let store = InMemoryStore::new();
    store
        .append_feedback(NewFeedback::new("stock_setup", "aluminum", "simple", FeedbackType::ImplicitAccept))
        .unwrap();
    store
        .append_feedback(NewFeedback::new("stock_setup", "6061 Aluminum", "simple", FeedbackType::ImplicitReject))
        .unwrap();
    store
        .append_feedback(NewFeedback::new("stock_setup", "steel", "simple", FeedbackType::ImplicitAccept))
        .unwrap();
    store
        .append_feedback(NewFeedback::new("stock_setup", "aluminum", "mixed", FeedbackType::ImplicitAccept))
        .unwrap();
    store
        .append_feedback(NewFeedback::new("toolpath_strategy", "aluminum", "simple", FeedbackType::ImplicitAccept))
        .unwrap();

    let similar =
        get_similar_context_feedback(&store, "stock_setup", "6061 aluminum", "Simple", None).unwrap();
    assert_eq!(similar.len(), 2);
    // newest first
    assert_eq!(similar[0].material, "6061 aluminum");
    assert_eq!(similar[1].material, "aluminum");

    let limited =
        get_similar_context_feedback(&store, "stock_setup", "aluminum", "simple", Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_conflicts_group_distinct_choices() {
    let a = json!({"offsets_xy_mm": 3.0});
    let b = json!({"offsets_xy_mm": 8.0});
    let mut history = vec![
        event(FeedbackType::ImplicitReject, 3),
        event(FeedbackType::ImplicitReject, 2),
        event(FeedbackType::ImplicitReject, 1),
        event(FeedbackType::ImplicitAccept, 0),
    ];
    history[0].user_choice = Some(b.clone());
    history[1].user_choice = Some(a.clone());
    history[2].user_choice = Some(a.clone());

    let conflicts = detect_conflicts(&history);
    assert_eq!(conflicts.len(), 2);
    assert_eq!(conflicts[0].choice, a);
    assert_eq!(conflicts[0].count, 2);
    assert_eq!(conflicts[0].weighted_score, 2.0);
    assert_eq!(conflicts[0].most_recent_date, Some(fixed_now() - Duration::days(1)));
    assert_eq!(conflicts[1].choice, b);

    // a single distinct choice is not a conflict
    assert!(detect_conflicts(&history[1..]).is_empty());
}

fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    for (op, material, geometry, ty) in [
        ("stock_setup", "aluminum", "simple", FeedbackType::ImplicitAccept),
        ("stock_setup", "aluminum", "simple", FeedbackType::ImplicitReject),
        ("stock_setup", "steel", "complex", FeedbackType::ImplicitAccept),
        ("toolpath_strategy", "aluminum", "hole", FeedbackType::ExplicitGood),
    ] {
        store
            .append_feedback(NewFeedback::new(op, material, geometry, ty))
            .unwrap();
    }
    store
}

#[test]
fn test_statistics_overall_and_grouped() {
    let store = seeded_store();
    let stats = get_feedback_statistics(&store, None);
    assert_eq!(stats.overall.total_count, 4);
    assert_eq!(stats.overall.accept_count, 3);
    assert_eq!(stats.overall.acceptance_rate, 0.75);

    assert_eq!(stats.by_material[0].key, "aluminum");
    assert_eq!(stats.by_material[0].count, 3);
    assert_eq!(stats.by_material[0].acceptance_pct, 66.7);
    assert_eq!(stats.by_material[1].acceptance_pct, 100.0);

    let by_op = stats.by_operation_type.unwrap();
    assert_eq!(by_op[0].key, "stock_setup");
    assert_eq!(by_op[0].count, 3);

    let filtered = get_feedback_statistics(&store, Some("stock_setup"));
    assert_eq!(filtered.overall.total_count, 3);
    assert!(filtered.by_operation_type.is_none());
}

#[test]
fn test_statistics_on_empty_store() {
    let stats = get_feedback_statistics(&InMemoryStore::new(), None);
    assert_eq!(stats.overall.total_count, 0);
    assert_eq!(stats.overall.acceptance_rate, 0.0);
    assert!(stats.by_material.is_empty());
}

#[test]
fn test_csv_export_quotes_json_cells() {
    let store = InMemoryStore::new();
    let mut fb = NewFeedback::new("stock_setup", "aluminum", "simple", FeedbackType::ImplicitReject)
        .with_user_choice(json!({"offsets_xy_mm": 3.0}));
    fb.feedback_note = Some("too much, waste".to_string());
    fb.confidence_before = Some(0.8);
    store.append_feedback(fb).unwrap();
    store
        .append_feedback(NewFeedback::new("stock_setup", "steel", "simple", FeedbackType::ImplicitAccept))
        .unwrap();

    let csv = export_feedback_history(&store, ExportFormat::Csv, None).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,stock_setup,aluminum,simple,,,"));
    assert!(lines[1].contains("\"{\"\"offsets_xy_mm\"\":3.0}\""));
    assert!(lines[1].contains(",implicit_reject,\"too much, waste\",0.8,"));
    assert!(lines[2].starts_with("2,stock_setup,steel"));
}

#[test]
fn test_json_export_oldest_first() {
    let store = seeded_store();
    let json = export_feedback_history(&store, ExportFormat::Json, Some("stock_setup")).unwrap();
    let events: Vec<FeedbackEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[test]
fn test_clear_history_counts_deleted() {
    let store = seeded_store();
    assert_eq!(clear_feedback_history(&store, Some("toolpath_strategy")).unwrap(), 1);
    assert_eq!(clear_feedback_history(&store, None).unwrap(), 3);
    assert_eq!(clear_feedback_history(&store, None).unwrap(), 0);
}
