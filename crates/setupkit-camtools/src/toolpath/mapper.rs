//! Feature to operation mapping
//!
//! Each feature type has an ordered rule table. The first rule whose
//! predicate holds wins; when none holds the type's fallback applies.
//! Missing feature measures read as 0.

use serde::{Deserialize, Serialize};
use setupkit_core::{Feature, FeatureKind, Hardness, MaterialProperties};
use std::fmt;

/// Machining operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Operation {
    #[serde(rename = "drilling")]
    Drilling,
    #[serde(rename = "helical_milling")]
    HelicalMilling,
    #[serde(rename = "adaptive_clearing")]
    AdaptiveClearing,
    #[serde(rename = "2d_pocket")]
    Pocket2d,
    #[serde(rename = "2d_contour")]
    Contour2d,
    #[serde(rename = "slot_milling")]
    SlotMilling,
}

impl Operation {
    /// Name as used in responses and stored preferences
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drilling => "drilling",
            Self::HelicalMilling => "helical_milling",
            Self::AdaptiveClearing => "adaptive_clearing",
            Self::Pocket2d => "2d_pocket",
            Self::Contour2d => "2d_contour",
            Self::SlotMilling => "slot_milling",
        }
    }

    /// Parse a stored operation name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "drilling" => Some(Self::Drilling),
            "helical_milling" => Some(Self::HelicalMilling),
            "adaptive_clearing" => Some(Self::AdaptiveClearing),
            "2d_pocket" => Some(Self::Pocket2d),
            "2d_contour" => Some(Self::Contour2d),
            "slot_milling" => Some(Self::SlotMilling),
            _ => None,
        }
    }

    /// Sequencing priority when used for roughing
    pub fn roughing_priority(&self) -> u8 {
        match self {
            Self::Drilling => 1,
            _ => 2,
        }
    }

    /// Sequencing priority when used for finishing
    pub fn finishing_priority(&self) -> u8 {
        match self {
            Self::Drilling => 1,
            _ => 3,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One half (roughing or finishing) of a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStep {
    pub operation: Operation,
    pub confidence: f64,
    pub priority: u8,
    pub reasoning: String,
}

/// Roughing and finishing operations for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMapping {
    pub roughing: OperationStep,
    pub finishing: OperationStep,
    pub source: String,
}

type RulePredicate = fn(&Feature, &MaterialProperties) -> bool;

/// A predicate and the operations it selects
pub struct MappingRule {
    pub name: &'static str,
    pub applies: RulePredicate,
    pub roughing: Operation,
    pub finishing: Operation,
    pub confidence: f64,
    pub reasoning: &'static str,
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("name", &self.name)
            .field("roughing", &self.roughing)
            .field("finishing", &self.finishing)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Fallback when no rule matches
#[derive(Debug)]
pub struct FallbackRule {
    pub roughing: Operation,
    pub finishing: Operation,
    pub confidence: f64,
    pub reasoning: &'static str,
}

fn diameter(f: &Feature) -> f64 {
    f.diameter_mm().unwrap_or(0.0)
}

fn depth(f: &Feature) -> f64 {
    f.depth_mm().unwrap_or(0.0)
}

fn width(f: &Feature) -> f64 {
    f.width_mm().unwrap_or(0.0)
}

static HOLE_RULES: &[MappingRule] = &[
    MappingRule {
        name: "small_hole",
        applies: |f, _| diameter(f) < 12.0,
        roughing: Operation::Drilling,
        finishing: Operation::Drilling,
        confidence: 0.95,
        reasoning: "Small hole (diameter < 12mm) best suited for drilling",
    },
    MappingRule {
        name: "large_hole",
        applies: |f, _| diameter(f) >= 12.0,
        roughing: Operation::HelicalMilling,
        finishing: Operation::HelicalMilling,
        confidence: 0.85,
        reasoning: "Large hole (diameter >= 12mm) requires helical milling or boring",
    },
];

static HOLE_FALLBACK: FallbackRule = FallbackRule {
    roughing: Operation::Drilling,
    finishing: Operation::Drilling,
    confidence: 0.70,
    reasoning: "Default drilling operation for hole",
};

static POCKET_RULES: &[MappingRule] = &[
    MappingRule {
        name: "deep_pocket_hard_material",
        applies: |f, m| depth(f) > 10.0 && m.hardness != Hardness::Soft,
        roughing: Operation::AdaptiveClearing,
        finishing: Operation::Contour2d,
        confidence: 0.90,
        reasoning: "Deep pocket (>10mm) in medium/hard material requires adaptive clearing",
    },
    MappingRule {
        name: "shallow_pocket_or_soft_material",
        applies: |f, m| depth(f) <= 10.0 || m.hardness == Hardness::Soft,
        roughing: Operation::Pocket2d,
        finishing: Operation::Contour2d,
        confidence: 0.85,
        reasoning: "Shallow pocket or soft material suitable for 2D pocket operation",
    },
];

static POCKET_FALLBACK: FallbackRule = FallbackRule {
    roughing: Operation::Pocket2d,
    finishing: Operation::Contour2d,
    confidence: 0.75,
    reasoning: "Standard 2D pocket with contour finishing",
};

static SLOT_RULES: &[MappingRule] = &[
    MappingRule {
        name: "narrow_slot",
        applies: |f, _| width(f) > 0.0 && width(f) <= 20.0,
        roughing: Operation::SlotMilling,
        finishing: Operation::Contour2d,
        confidence: 0.90,
        reasoning: "Narrow slot suitable for dedicated slot milling",
    },
    MappingRule {
        name: "wide_slot",
        applies: |f, _| width(f) > 20.0,
        roughing: Operation::AdaptiveClearing,
        finishing: Operation::Contour2d,
        confidence: 0.85,
        reasoning: "Wide slot requires adaptive clearing for efficient material removal",
    },
];

static SLOT_FALLBACK: FallbackRule = FallbackRule {
    roughing: Operation::SlotMilling,
    finishing: Operation::Contour2d,
    confidence: 0.80,
    reasoning: "Standard slot milling operation",
};

/// Ordered rules and fallback for a feature type
pub fn rules_for(kind: FeatureKind) -> Option<(&'static [MappingRule], &'static FallbackRule)> {
    match kind {
        FeatureKind::Hole => Some((HOLE_RULES, &HOLE_FALLBACK)),
        FeatureKind::Pocket => Some((POCKET_RULES, &POCKET_FALLBACK)),
        FeatureKind::Slot => Some((SLOT_RULES, &SLOT_FALLBACK)),
        FeatureKind::Unknown => None,
    }
}

/// Pick roughing and finishing operations for a feature
pub fn map_feature_to_operations(
    feature: &Feature,
    material: &MaterialProperties,
) -> OperationMapping {
    let Some((rules, fallback)) = rules_for(feature.kind) else {
        return OperationMapping {
            roughing: OperationStep {
                operation: Operation::Contour2d,
                confidence: 0.50,
                priority: 2,
                reasoning: "Unknown feature type, defaulting to 2D contour".to_string(),
            },
            finishing: OperationStep {
                operation: Operation::Contour2d,
                confidence: 0.45,
                priority: 3,
                reasoning: "Standard contour finishing".to_string(),
            },
            source: "from: default_rules".to_string(),
        };
    };

    let (roughing, finishing, confidence, reasoning) =
        match rules.iter().find(|r| (r.applies)(feature, material)) {
            Some(rule) => {
                tracing::debug!("Rule '{}' matched {} feature", rule.name, feature.kind);
                (rule.roughing, rule.finishing, rule.confidence, rule.reasoning)
            }
            None => (
                fallback.roughing,
                fallback.finishing,
                fallback.confidence,
                fallback.reasoning,
            ),
        };

    let finishing_reasoning = if finishing == Operation::Drilling {
        "Drilling operation is self-finishing".to_string()
    } else {
        format!("Standard {} finishing for {}", finishing, feature.kind)
    };

    OperationMapping {
        roughing: OperationStep {
            operation: roughing,
            confidence,
            priority: roughing.roughing_priority(),
            reasoning: reasoning.to_string(),
        },
        finishing: OperationStep {
            operation: finishing,
            confidence: confidence * 0.95,
            priority: finishing.finishing_priority(),
            reasoning: finishing_reasoning,
        },
        source: "from: default_rules".to_string(),
    }
}
