//! Cylindrical (lathe-candidate) detection
//!
//! Combines two signals:
//! - bounding-box shape (elongated bar or flat disc)
//! - share of cylindrical faces reported by the host
//!
//! combined = face_weight × face_ratio + bbox_weight × shape_score

use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, Axis, BodyGeometry, Quantity};
use std::fmt;

/// Tunable constants for the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylindricalConfig {
    /// Two dims are "similar" when their ratio is within 1 ± this
    pub similarity_tolerance: f64,
    /// Minimum length/cross-section ratio for an elongated part
    pub elongated_min_ratio: f64,
    /// Weight of the cylindrical face ratio
    pub face_weight: f64,
    /// Weight of the bounding-box shape score
    pub bbox_weight: f64,
    /// Combined score needed to call a part cylindrical
    pub threshold: f64,
}

impl Default for CylindricalConfig {
    fn default() -> Self {
        Self {
            similarity_tolerance: 0.20,
            elongated_min_ratio: 1.5,
            face_weight: 0.6,
            bbox_weight: 0.4,
            threshold: 0.5,
        }
    }
}

/// Bounding-box shape class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    /// Long bar with a near-square cross-section
    Elongated,
    /// Flat disc or flange
    Disc,
    /// Anything else
    Prismatic,
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elongated => write!(f, "elongated"),
            Self::Disc => write!(f, "disc"),
            Self::Prismatic => write!(f, "prismatic"),
        }
    }
}

/// Rectangular versus round stock comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTradeOffs {
    pub rectangular: String,
    pub round: String,
}

impl Default for StockTradeOffs {
    fn default() -> Self {
        Self {
            rectangular:
                "More stable fixturing, easier to clamp in vise, better for features requiring XY indexing"
                    .to_string(),
            round: "Less material waste, faster for cylindrical parts, natural for turning operations"
                .to_string(),
        }
    }
}

/// Result of [`CylindricalDetector::detect`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylindricalAnalysis {
    pub is_cylindrical: bool,
    /// Combined score, three decimals
    pub confidence: f64,
    pub shape: ShapeClass,
    pub shape_score: f64,
    pub face_ratio: f64,
    /// Inferred turning axis
    pub cylinder_axis: Option<Axis>,
    /// Smallest round stock diameter enclosing the cross-section
    pub enclosing_diameter: Quantity,
    /// Only present for cylindrical parts
    pub trade_offs: Option<StockTradeOffs>,
    pub reasoning: String,
}

/// Cylindrical detector
#[derive(Debug, Clone, Default)]
pub struct CylindricalDetector {
    config: CylindricalConfig,
}

struct ShapeAnalysis {
    shape: ShapeClass,
    score: f64,
    axis: Option<Axis>,
    notes: Vec<String>,
}

impl CylindricalDetector {
    /// Create a detector
    pub fn new(config: CylindricalConfig) -> Self {
        Self { config }
    }

    /// Decide whether a body is better suited to round stock
    pub fn detect(&self, body: &BodyGeometry) -> CylindricalAnalysis {
        let face_ratio = body.face_ratio();
        let dims = body
            .bounding_box
            .map(|b| b.dims_mm())
            .unwrap_or([0.0, 0.0, 0.0]);

        if dims.iter().any(|d| !(d.is_finite() && *d > 0.0)) {
            return CylindricalAnalysis {
                is_cylindrical: false,
                confidence: 0.0,
                shape: ShapeClass::Prismatic,
                shape_score: 0.0,
                face_ratio,
                cylinder_axis: None,
                enclosing_diameter: Quantity::mm(0.0),
                trade_offs: None,
                reasoning: "Bounding box has a non-positive extent; cannot assess shape"
                    .to_string(),
            };
        }

        let analysis = self.analyze_shape(dims);
        let shape_score = round_to(analysis.score.min(1.0), 3);
        let combined = round_to(
            (face_ratio * self.config.face_weight + shape_score * self.config.bbox_weight)
                .min(1.0),
            3,
        );
        let is_cylindrical = combined >= self.config.threshold;

        let mut notes = analysis.notes;
        if let Some(counts) = body.face_counts.filter(|_| body.cylindrical_face_ratio.is_none()) {
            notes.push(format!(
                "Cylindrical faces: {}/{} ({:.0}%)",
                counts.cylindrical,
                counts.total,
                face_ratio * 100.0
            ));
        } else {
            notes.push(format!("Cylindrical face ratio: {:.0}%", face_ratio * 100.0));
        }
        if face_ratio > 0.5 {
            notes.push("High proportion of cylindrical surfaces".to_string());
        }
        if is_cylindrical {
            match analysis.shape {
                ShapeClass::Elongated => {
                    notes.push("Elongated profile suitable for turning".to_string())
                }
                ShapeClass::Disc => {
                    notes.push("Disc/flange profile suitable for facing".to_string())
                }
                ShapeClass::Prismatic => {}
            }
            notes.push(format!("Confidence: {:.0}%", combined * 100.0));
        } else {
            notes.push(format!(
                "Below cylindrical threshold ({:.0}%)",
                self.config.threshold * 100.0
            ));
        }

        let enclosing = enclosing_diameter(dims, analysis.axis);
        tracing::debug!(
            "Cylindrical check for {}: shape={} score={:.3} faces={:.3} combined={:.3}",
            body.display_name(),
            analysis.shape,
            shape_score,
            face_ratio,
            combined
        );

        CylindricalAnalysis {
            is_cylindrical,
            confidence: combined,
            shape: analysis.shape,
            shape_score,
            face_ratio,
            cylinder_axis: analysis.axis,
            enclosing_diameter: Quantity::mm(round_to(enclosing, 2)),
            trade_offs: is_cylindrical.then(StockTradeOffs::default),
            reasoning: notes.join("; "),
        }
    }

    fn analyze_shape(&self, dims: [f64; 3]) -> ShapeAnalysis {
        let mut sorted = dims;
        sorted.sort_by(|a, b| a.total_cmp(b));
        let [min, mid, max] = sorted;
        let tol = 1.0 + self.config.similarity_tolerance;

        let elongation = max / ((min + mid) / 2.0);
        let cross = mid / min;

        if cross <= tol && elongation >= self.config.elongated_min_ratio {
            let similarity = 1.0 - (1.0 - cross).abs();
            return ShapeAnalysis {
                shape: ShapeClass::Elongated,
                score: similarity * 0.6 + (elongation / 3.0).min(1.0) * 0.4,
                axis: axis_of(dims, max),
                notes: vec![
                    format!("Elongated shape (ratio {:.1}:1)", elongation),
                    format!("Cross-section similarity: {:.0}%", similarity * 100.0),
                ],
            };
        }

        let face = max / mid;
        if face <= tol && min < 0.5 * mid {
            return ShapeAnalysis {
                shape: ShapeClass::Disc,
                score: (1.0 - (1.0 - face).abs()) * 0.5 + (1.0 - min / mid) * 0.5,
                axis: axis_of(dims, min),
                notes: vec![format!("Disc/flange shape (thin axis: {:.1}mm)", min)],
            };
        }

        if elongation > 1.2 {
            ShapeAnalysis {
                shape: ShapeClass::Prismatic,
                score: 0.2 * (elongation - 1.0),
                axis: None,
                notes: vec![format!("Slightly elongated (ratio {:.1}:1)", elongation)],
            }
        } else {
            ShapeAnalysis {
                shape: ShapeClass::Prismatic,
                score: 0.0,
                axis: None,
                notes: vec!["Cubic/prismatic shape - not cylindrical".to_string()],
            }
        }
    }
}

/// Axis carrying `value`; on ties the last axis wins
fn axis_of(dims: [f64; 3], value: f64) -> Option<Axis> {
    dims.iter()
        .rposition(|d| *d == value)
        .and_then(Axis::from_index)
}

/// Diagonal of the cross-section perpendicular to `axis`
fn enclosing_diameter(dims: [f64; 3], axis: Option<Axis>) -> f64 {
    let [x, y, z] = dims;
    match axis {
        Some(Axis::X) => y.hypot(z),
        Some(Axis::Y) => x.hypot(z),
        Some(Axis::Z) => x.hypot(y),
        None => x.hypot(y).max(x.hypot(z)).max(y.hypot(z)),
    }
}
