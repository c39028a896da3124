//! Recency weighting
//!
//! weight = e^(-ln 2 / half_life × age_days), clamped to [0, 1]. Events in
//! the future (clock skew) weigh 1.

use crate::config::LearningConfig;
use crate::model::FeedbackEvent;
use chrono::{DateTime, Utc};

/// Neutral rate when history carries no usable weight
pub const NEUTRAL_ACCEPTANCE_RATE: f64 = 0.5;

const MIN_TOTAL_WEIGHT: f64 = 0.01;

/// Exponential decay weight of an event created at `created_at`
pub fn calculate_recency_weight(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    half_life_days: f64,
) -> f64 {
    let age_days = (now - created_at).num_milliseconds() as f64 / 86_400_000.0;
    let decay = std::f64::consts::LN_2 / half_life_days;
    (-decay * age_days).exp().clamp(0.0, 1.0)
}

/// Recency-weighted share of accepting feedback.
///
/// Returns `(rate, sample_count)` where the count is the full history length.
/// Events without a timestamp contribute nothing to the sums.
pub fn get_weighted_acceptance_rate(
    history: &[FeedbackEvent],
    now: DateTime<Utc>,
    config: &LearningConfig,
) -> (f64, usize) {
    if history.is_empty() {
        return (NEUTRAL_ACCEPTANCE_RATE, 0);
    }

    let mut accepted = 0.0;
    let mut total = 0.0;
    for event in history {
        let Some(created_at) = event.created_at else {
            continue;
        };
        let mut weight = calculate_recency_weight(created_at, now, config.half_life_days);
        if event.feedback_type.is_explicit() {
            weight *= config.explicit_multiplier;
        }
        total += weight;
        if event.feedback_type.is_accept() {
            accepted += weight;
        }
    }

    if total < MIN_TOTAL_WEIGHT {
        return (NEUTRAL_ACCEPTANCE_RATE, 0);
    }
    (accepted / total, history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_weight_halves_at_half_life() {
        let now = Utc::now();
        let w = calculate_recency_weight(now - Duration::days(30), now, 30.0);
        assert!((w - 0.5).abs() < 1e-9);
        assert_eq!(calculate_recency_weight(now, now, 30.0), 1.0);
        assert_eq!(calculate_recency_weight(now + Duration::days(2), now, 30.0), 1.0);
    }

    #[test]
    fn test_empty_history_is_neutral() {
        let (rate, count) = get_weighted_acceptance_rate(&[], Utc::now(), &LearningConfig::default());
        assert_eq!(rate, 0.5);
        assert_eq!(count, 0);
    }
}
