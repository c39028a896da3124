use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use setupkit_learning::{
    adjust_confidence_from_feedback, calculate_recency_weight, should_notify_learning,
    ConfidenceSource, FeedbackType, NewFeedback,
};

fn feedback_type() -> impl Strategy<Value = FeedbackType> {
    prop_oneof![
        Just(FeedbackType::ImplicitAccept),
        Just(FeedbackType::ImplicitReject),
        Just(FeedbackType::ExplicitGood),
        Just(FeedbackType::ExplicitBad),
    ]
}

proptest! {
    #[test]
    fn short_history_never_adjusts(
        base in 0.0f64..=1.0,
        types in prop::collection::vec(feedback_type(), 0..3),
    ) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let history: Vec<_> = types
            .into_iter()
            .map(|t| NewFeedback::new("stock_setup", "aluminum", "simple", t).into_event(0, now))
            .collect();
        let adjusted = adjust_confidence_from_feedback(base, &history, now);
        prop_assert_eq!(adjusted.confidence, base);
        prop_assert_eq!(adjusted.source, ConfidenceSource::DefaultRules);
    }

    #[test]
    fn adjusted_confidence_stays_in_range(
        base in 0.0f64..=1.0,
        entries in prop::collection::vec((feedback_type(), 0i64..365), 3..40),
    ) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let history: Vec<_> = entries
            .into_iter()
            .map(|(t, age)| {
                NewFeedback::new("stock_setup", "aluminum", "simple", t)
                    .into_event(0, now - Duration::days(age))
            })
            .collect();
        let adjusted = adjust_confidence_from_feedback(base, &history, now);
        prop_assert!(adjusted.confidence >= 0.2 && adjusted.confidence <= 1.0);
        prop_assert!(adjusted.source.is_learned());
    }

    #[test]
    fn notification_only_at_three(len in 0usize..20) {
        let now = Utc::now();
        let history: Vec<_> = (0..len)
            .map(|_| {
                NewFeedback::new("stock_setup", "aluminum", "simple", FeedbackType::ImplicitAccept)
                    .into_event(0, now)
            })
            .collect();
        prop_assert_eq!(should_notify_learning(&history), len == 3);
    }

    #[test]
    fn recency_weight_in_unit_range(age_days in -30i64..3650, half_life in 1.0f64..365.0) {
        let now = Utc::now();
        let w = calculate_recency_weight(now - Duration::days(age_days), now, half_life);
        prop_assert!((0.0..=1.0).contains(&w));
    }
}
