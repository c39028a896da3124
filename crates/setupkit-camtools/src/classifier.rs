//! Feature classification
//!
//! Turns raw pocket extents and hole segment lists into scored [`Feature`]s,
//! and buckets a part's feature histogram into a coarse [`GeometryType`] used
//! as a preference and feedback key.

use crate::confidence::{get_ambiguity_flags, ConfidenceConfig, ConfidenceScorer, DetectionSource};
use serde::{Deserialize, Serialize};
use setupkit_core::{Feature, FeatureKind, HoleSegment, Quantity};
use std::fmt;

/// Tunable constants for the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Aspect ratios strictly above this are slots
    pub slot_aspect_ratio: f64,
    /// Parts with fewer counted features are "simple"
    pub simple_max_features: usize,
    /// Share of one feature family needed to dominate the histogram
    pub dominance_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            slot_aspect_ratio: 3.0,
            simple_max_features: 3,
            dominance_ratio: 0.70,
        }
    }
}

/// Coarse classification of a part's feature histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum GeometryType {
    /// Fewer than three features
    #[serde(rename = "simple")]
    Simple,
    /// Mostly holes
    #[serde(rename = "hole-heavy")]
    HoleHeavy,
    /// Mostly pockets and slots
    #[serde(rename = "pocket-heavy")]
    PocketHeavy,
    /// No dominant family
    #[serde(rename = "mixed")]
    Mixed,
}

impl GeometryType {
    /// Key string used by the preference and feedback stores
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::HoleHeavy => "hole-heavy",
            Self::PocketHeavy => "pocket-heavy",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw pocket measurements reported by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketInput {
    pub id: Option<String>,
    pub width: Option<Quantity>,
    pub length: Option<Quantity>,
    pub depth: Option<Quantity>,
    pub is_through: bool,
    pub min_corner_radius: Option<Quantity>,
    pub approach_normal: Option<[f64; 3]>,
}

/// Raw hole segment list reported by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleInput {
    pub id: Option<String>,
    pub segments: Vec<HoleSegment>,
    pub approach_normal: Option<[f64; 3]>,
}

/// Unclassified host feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawFeature {
    Pocket(PocketInput),
    Hole(HoleInput),
}

/// Feature classifier
#[derive(Debug, Clone, Default)]
pub struct FeatureClassifier {
    config: ClassifierConfig,
    scorer: ConfidenceScorer,
}

impl FeatureClassifier {
    /// Create a classifier
    pub fn new(config: ClassifierConfig, confidence: ConfidenceConfig) -> Self {
        Self {
            config,
            scorer: ConfidenceScorer::new(confidence),
        }
    }

    /// The scorer used for classified features
    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    /// Classify every raw feature, preserving order
    pub fn classify_all(&self, raw: &[RawFeature]) -> Vec<Feature> {
        raw.iter()
            .map(|r| match r {
                RawFeature::Pocket(p) => self.classify_pocket(p),
                RawFeature::Hole(h) => self.classify_hole(h),
            })
            .collect()
    }

    /// Classify a pocket as pocket or slot by its aspect ratio
    pub fn classify_pocket(&self, input: &PocketInput) -> Feature {
        let width = input.width.map(|q| q.to_mm()).unwrap_or(0.0);
        let length = input.length.map(|q| q.to_mm()).unwrap_or(0.0);
        let (aspect_ratio, degenerate) = aspect_ratio(width, length);

        let kind = if aspect_ratio > self.config.slot_aspect_ratio {
            FeatureKind::Slot
        } else {
            FeatureKind::Pocket
        };

        let mut feature = Feature {
            kind,
            id: input.id.clone(),
            width: input.width,
            length: input.length,
            depth: input.depth,
            aspect_ratio: Some(aspect_ratio),
            min_corner_radius: input.min_corner_radius,
            is_through: input.is_through,
            approach_normal: input.approach_normal,
            ..Default::default()
        };
        self.score(&mut feature, 0);

        if degenerate {
            feature.needs_review = true;
            feature.reasoning.push_str("; degenerate pocket extents");
        }
        tracing::debug!(
            "Classified pocket {:?} as {} (aspect {:.2}, confidence {:.2})",
            feature.id,
            feature.kind,
            aspect_ratio,
            feature.confidence
        );
        feature
    }

    /// Classify a (possibly stepped) hole from its segments
    pub fn classify_hole(&self, input: &HoleInput) -> Feature {
        let total_depth: f64 = input
            .segments
            .iter()
            .filter_map(|s| s.length.map(|q| q.to_mm()))
            .sum();
        let diameter = input.segments.iter().find_map(|s| s.diameter);
        let segment_count = input.segments.len() as u32;

        let mut feature = Feature {
            kind: FeatureKind::Hole,
            id: input.id.clone(),
            diameter,
            depth: (total_depth > 0.0).then(|| Quantity::mm(total_depth)),
            segment_count,
            segments: input.segments.clone(),
            approach_normal: input.approach_normal,
            ..Default::default()
        };

        let complexity = 2 * (segment_count.max(1) as i32 - 1);
        self.score(&mut feature, complexity);
        feature
    }

    /// Normalize a feature the host already classified.
    ///
    /// Pockets and slots are re-bucketed by aspect ratio when both extents
    /// are present. Unscored features (empty reasoning) get a score. Error
    /// entries pass through untouched.
    pub fn refine(&self, mut feature: Feature) -> Feature {
        if feature.is_error() {
            return feature;
        }

        if feature.kind.is_pocket_like() {
            if let (Some(w), Some(l)) = (feature.width_mm(), feature.length_mm()) {
                let (ratio, _) = aspect_ratio(w, l);
                feature.aspect_ratio = Some(ratio);
                feature.kind = if ratio > self.config.slot_aspect_ratio {
                    FeatureKind::Slot
                } else {
                    FeatureKind::Pocket
                };
            }
        }

        if feature.kind == FeatureKind::Hole && feature.segment_count == 0 {
            feature.segment_count = feature.segments.len().max(1) as u32;
        }

        if feature.reasoning.is_empty() {
            let complexity = if feature.kind == FeatureKind::Hole {
                2 * (feature.segment_count.max(1) as i32 - 1)
            } else {
                0
            };
            self.score(&mut feature, complexity);
        } else {
            feature.confidence = feature.confidence.clamp(self.scorer.config().floor, 1.0);
            feature.needs_review = feature.needs_review || self.scorer.needs_review(feature.confidence);
        }
        feature
    }

    /// Bucket a feature list into a geometry type
    pub fn classify_geometry_type(&self, features: &[Feature]) -> GeometryType {
        classify_geometry_type_with(features, &self.config)
    }

    fn score(&self, feature: &mut Feature, complexity: i32) {
        let flags = get_ambiguity_flags(feature);
        let result = self
            .scorer
            .calculate_confidence(DetectionSource::ApiProvided, complexity, &flags);
        feature.needs_review = self.scorer.needs_review(result.score);
        feature.confidence = result.score;
        feature.reasoning = result.reasoning;
    }
}

/// max/min aspect ratio; degenerate extents yield `(1.0, true)`
fn aspect_ratio(width: f64, length: f64) -> (f64, bool) {
    let min = width.min(length);
    let max = width.max(length);
    if min <= 0.0 || !min.is_finite() || !max.is_finite() {
        (1.0, true)
    } else {
        (max / min, false)
    }
}

/// Bucket a feature list with the default thresholds
pub fn classify_geometry_type(features: &[Feature]) -> GeometryType {
    classify_geometry_type_with(features, &ClassifierConfig::default())
}

fn classify_geometry_type_with(features: &[Feature], config: &ClassifierConfig) -> GeometryType {
    let counted: Vec<&Feature> = features.iter().filter(|f| !f.is_error()).collect();
    if counted.len() < config.simple_max_features {
        return GeometryType::Simple;
    }

    let total = counted.len() as f64;
    let holes = counted
        .iter()
        .filter(|f| f.kind == FeatureKind::Hole)
        .count() as f64;
    let pockets = counted.iter().filter(|f| f.kind.is_pocket_like()).count() as f64;

    if holes / total > config.dominance_ratio {
        GeometryType::HoleHeavy
    } else if pockets / total > config.dominance_ratio {
        GeometryType::PocketHeavy
    } else {
        GeometryType::Mixed
    }
}
