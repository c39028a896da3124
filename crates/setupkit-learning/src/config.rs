//! Learning constants

use serde::{Deserialize, Serialize};

/// Tunables for confidence adjustment and recency weighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Events needed before history affects confidence
    pub min_samples: usize,
    /// Events at which history fully replaces the base confidence
    pub full_trust_samples: usize,
    /// Lowest adjusted confidence
    pub confidence_floor: f64,
    /// Below this the source is tagged tentative
    pub tentative_threshold: f64,
    /// Age (days) at which an event's weight halves
    pub half_life_days: f64,
    /// Extra weight for explicit ratings
    pub explicit_multiplier: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            full_trust_samples: 10,
            confidence_floor: 0.20,
            tentative_threshold: 0.60,
            half_life_days: 30.0,
            explicit_multiplier: 2.0,
        }
    }
}

impl LearningConfig {
    /// Check ranges; returns a message naming the first bad field
    pub fn validate(&self) -> Result<(), String> {
        if self.min_samples == 0 {
            return Err("min_samples must be at least 1".to_string());
        }
        if self.full_trust_samples < self.min_samples {
            return Err("full_trust_samples must be >= min_samples".to_string());
        }
        for (name, value) in [
            ("confidence_floor", self.confidence_floor),
            ("tentative_threshold", self.tentative_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if !(self.half_life_days > 0.0) {
            return Err(format!(
                "half_life_days must be positive, got {}",
                self.half_life_days
            ));
        }
        if !(self.explicit_multiplier > 0.0) {
            return Err(format!(
                "explicit_multiplier must be positive, got {}",
                self.explicit_multiplier
            ));
        }
        Ok(())
    }
}
