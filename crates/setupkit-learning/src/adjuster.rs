//! Confidence adjustment from feedback history
//!
//! Below `min_samples` events the base confidence passes through untouched.
//! From there history is blended in linearly until `full_trust_samples`,
//! where the weighted acceptance rate replaces the base entirely.

use crate::config::LearningConfig;
use crate::model::FeedbackEvent;
use crate::recency::get_weighted_acceptance_rate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use setupkit_core::round_to;
use std::fmt;

/// Where a confidence value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// Too little history; base rules only
    DefaultRules,
    /// History-adjusted and above the tentative threshold
    UserPreference,
    /// History-adjusted but below the tentative threshold
    UserPreferenceTentative,
}

impl ConfidenceSource {
    /// Tag as reported in learning metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultRules => "default_rules",
            Self::UserPreference => "user_preference",
            Self::UserPreferenceTentative => "user_preference_tentative",
        }
    }

    /// Whether user history shaped the value
    pub fn is_learned(&self) -> bool {
        !matches!(self, Self::DefaultRules)
    }
}

impl fmt::Display for ConfidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adjusted confidence with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedConfidence {
    pub confidence: f64,
    pub source: ConfidenceSource,
    pub sample_count: usize,
}

/// Blends base confidence with recency-weighted acceptance
#[derive(Debug, Clone, Default)]
pub struct ConfidenceAdjuster {
    config: LearningConfig,
}

impl ConfidenceAdjuster {
    pub fn new(config: LearningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Adjust `base` using `history` as seen at `now`
    pub fn adjust(
        &self,
        base: f64,
        history: &[FeedbackEvent],
        now: DateTime<Utc>,
    ) -> AdjustedConfidence {
        if history.len() < self.config.min_samples {
            return AdjustedConfidence {
                confidence: base,
                source: ConfidenceSource::DefaultRules,
                sample_count: history.len(),
            };
        }

        let (rate, sample_count) = get_weighted_acceptance_rate(history, now, &self.config);
        let sample_weight =
            (sample_count as f64 / self.config.full_trust_samples as f64).min(1.0);
        let adjusted = (base * (1.0 - sample_weight) + rate * sample_weight)
            .max(self.config.confidence_floor);

        let source = if adjusted >= self.config.tentative_threshold {
            ConfidenceSource::UserPreference
        } else {
            ConfidenceSource::UserPreferenceTentative
        };

        tracing::debug!(
            "Adjusted confidence {:.2} -> {:.2} from {} samples (rate {:.2})",
            base,
            adjusted,
            sample_count,
            rate
        );

        AdjustedConfidence {
            confidence: round_to(adjusted, 2),
            source,
            sample_count,
        }
    }

    /// True exactly when history has just reached the learning threshold
    pub fn should_notify(&self, history: &[FeedbackEvent]) -> bool {
        history.len() == self.config.min_samples
    }
}

/// [`ConfidenceAdjuster::adjust`] with default constants
pub fn adjust_confidence_from_feedback(
    base: f64,
    history: &[FeedbackEvent],
    now: DateTime<Utc>,
) -> AdjustedConfidence {
    ConfidenceAdjuster::default().adjust(base, history, now)
}

/// [`ConfidenceAdjuster::should_notify`] with default constants
pub fn should_notify_learning(history: &[FeedbackEvent]) -> bool {
    ConfidenceAdjuster::default().should_notify(history)
}
