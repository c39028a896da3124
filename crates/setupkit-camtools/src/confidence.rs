//! Confidence scoring for detected features
//!
//! Every feature carries a score in `[floor, 1.0]` plus human-readable
//! reasoning. The score starts from a base value per detection source and is
//! reduced by geometry complexity and by ambiguity flags.

use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, Feature, FeatureKind};
use std::fmt;

/// Where a feature classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Reported directly by the host's feature recognition
    ApiProvided,
    /// Derived from raw face/edge geometry
    DerivedGeometry,
    /// Rule of thumb (aspect ratios, depth/diameter rules)
    Heuristic,
}

impl DetectionSource {
    /// Label used at the start of reasoning text
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApiProvided => "Host API",
            Self::DerivedGeometry => "Geometry analysis",
            Self::Heuristic => "Heuristic classification",
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tunable constants for the confidence scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Base confidence for host-recognized features
    pub api_provided_base: f64,
    /// Base confidence for geometry-derived features
    pub derived_geometry_base: f64,
    /// Base confidence for heuristic classification
    pub heuristic_base: f64,
    /// Upper bound on the complexity penalty
    pub complexity_penalty_cap: f64,
    /// Penalty per ambiguity flag
    pub flag_penalty: f64,
    /// Upper bound on the total ambiguity penalty
    pub flag_penalty_cap: f64,
    /// Lowest score ever returned
    pub floor: f64,
    /// Scores below this need human review
    pub review_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            api_provided_base: 0.95,
            derived_geometry_base: 0.75,
            heuristic_base: 0.60,
            complexity_penalty_cap: 0.15,
            flag_penalty: 0.05,
            flag_penalty_cap: 0.25,
            floor: 0.30,
            review_threshold: 0.80,
        }
    }
}

impl ConfidenceConfig {
    /// Base confidence for a detection source
    pub fn base_for(&self, source: DetectionSource) -> f64 {
        match source {
            DetectionSource::ApiProvided => self.api_provided_base,
            DetectionSource::DerivedGeometry => self.derived_geometry_base,
            DetectionSource::Heuristic => self.heuristic_base,
        }
    }
}

/// A confidence score with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// Score in `[floor, base]`, two decimals
    pub score: f64,
    /// Explanation of how the score was reached
    pub reasoning: String,
}

/// Confidence scorer
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    /// Create a scorer with the given constants
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// Score a classification.
    ///
    /// `geometry_complexity` is clamped to `0..=10`; each point costs 0.01 up
    /// to the complexity cap. Each ambiguity flag costs `flag_penalty` up to
    /// the flag cap. The result never drops below the floor.
    pub fn calculate_confidence(
        &self,
        source: DetectionSource,
        geometry_complexity: i32,
        ambiguity_flags: &[String],
    ) -> ConfidenceScore {
        let cfg = &self.config;
        let base = cfg.base_for(source);

        let complexity = geometry_complexity.clamp(0, 10);
        let complexity_penalty = (complexity as f64 / 100.0).min(cfg.complexity_penalty_cap);
        let ambiguity_penalty =
            (ambiguity_flags.len() as f64 * cfg.flag_penalty).min(cfg.flag_penalty_cap);

        let score = round_to(
            (base - complexity_penalty - ambiguity_penalty).max(cfg.floor),
            2,
        );

        let complexity_desc = if complexity <= 2 {
            "simple geometry"
        } else if complexity <= 5 {
            "moderate complexity"
        } else {
            "complex geometry"
        };

        let mut parts = vec![format!("{} detection ({})", source.label(), complexity_desc)];
        if !ambiguity_flags.is_empty() {
            parts.push(format!("Ambiguous: {}", ambiguity_flags.join("; ")));
        }
        if complexity_penalty > 0.05 {
            parts.push(format!("complexity penalty: -{:.2}", complexity_penalty));
        }
        if ambiguity_penalty > 0.0 {
            parts.push(format!("ambiguity penalty: -{:.2}", ambiguity_penalty));
        }

        ConfidenceScore {
            score,
            reasoning: parts.join("; "),
        }
    }

    /// Whether a score is low enough to need human review
    pub fn needs_review(&self, score: f64) -> bool {
        score < self.config.review_threshold
    }
}

/// Collect ambiguity flags for a feature.
///
/// The bands are fixed domain constants: pocket/slot aspect ratio in
/// `[2.5, 3.5]`, hole with more than 3 segments, depth/diameter in `[3, 4]`.
pub fn get_ambiguity_flags(feature: &Feature) -> Vec<String> {
    let mut flags = Vec::new();

    if feature.kind.is_pocket_like() {
        if let Some(ratio) = feature.aspect_ratio {
            if (2.5..=3.5).contains(&ratio) {
                flags.push(format!(
                    "aspect_ratio in ambiguous range (2.5-3.5): {:.2}",
                    ratio
                ));
            }
        }
    }

    if feature.kind == FeatureKind::Hole && feature.segment_count > 3 {
        flags.push(format!(
            "complex hole ({} segments, >3)",
            feature.segment_count
        ));
    }

    if let (Some(depth), Some(diameter)) = (feature.depth_mm(), feature.diameter_mm()) {
        if diameter > 0.0 {
            let ratio = depth / diameter;
            if (3.0..=4.0).contains(&ratio) {
                flags.push(format!(
                    "depth/diameter ratio in ambiguous range (3-4:1): {:.2}",
                    ratio
                ));
            }
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_api_detection() {
        let scorer = ConfidenceScorer::default();
        let result = scorer.calculate_confidence(DetectionSource::ApiProvided, 0, &[]);
        assert_eq!(result.score, 0.95);
        assert_eq!(result.reasoning, "Host API detection (simple geometry)");
        assert!(!scorer.needs_review(result.score));
    }

    #[test]
    fn test_penalties_in_reasoning() {
        let scorer = ConfidenceScorer::default();
        let flags = vec!["a".to_string(), "b".to_string()];
        let result = scorer.calculate_confidence(DetectionSource::Heuristic, 8, &flags);
        // 0.60 - 0.08 - 0.10
        assert_eq!(result.score, 0.42);
        assert_eq!(
            result.reasoning,
            "Heuristic classification detection (complex geometry); Ambiguous: a; b; \
             complexity penalty: -0.08; ambiguity penalty: -0.10"
        );
        assert!(scorer.needs_review(result.score));
    }

    #[test]
    fn test_floor_applies() {
        let scorer = ConfidenceScorer::default();
        let flags: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let result = scorer.calculate_confidence(DetectionSource::Heuristic, 50, &flags);
        assert_eq!(result.score, 0.30);
    }

    #[test]
    fn test_review_threshold_boundary() {
        let scorer = ConfidenceScorer::default();
        assert!(!scorer.needs_review(0.80));
        assert!(scorer.needs_review(0.79));
    }
}
