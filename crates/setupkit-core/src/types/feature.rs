//! Recognized machining features

use crate::units::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Drilled or milled hole
    Hole,
    /// Closed or through pocket
    Pocket,
    /// Elongated pocket (aspect ratio above the slot threshold)
    Slot,
    /// Anything the host reported that is not one of the above
    #[serde(other)]
    Unknown,
}

impl FeatureKind {
    /// Lowercase name used in keys and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hole => "hole",
            Self::Pocket => "pocket",
            Self::Slot => "slot",
            Self::Unknown => "unknown",
        }
    }

    /// Pockets and slots share most machining rules
    pub fn is_pocket_like(&self) -> bool {
        matches!(self, Self::Pocket | Self::Slot)
    }
}

impl Default for FeatureKind {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hole segment geometry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Straight cylindrical bore
    Cylinder,
    /// Countersink or drill point
    Cone,
    /// Flat bottom
    Flat,
    /// Toroidal transition
    Torus,
    /// Unrecognized segment
    #[serde(other)]
    Unknown,
}

impl Default for SegmentKind {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cylinder => write!(f, "Cylinder"),
            Self::Cone => write!(f, "Cone"),
            Self::Flat => write!(f, "Flat"),
            Self::Torus => write!(f, "Torus"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One segment of a (possibly stepped) hole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleSegment {
    /// Segment geometry type
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Axial length of the segment
    pub length: Option<Quantity>,
    /// Diameter, for segments that have one
    pub diameter: Option<Quantity>,
    /// Taper angle, for conical segments
    pub taper_angle: Option<Quantity>,
}

/// A recognized machining feature
///
/// Produced by the feature classifier (or handed over already classified by
/// the host) and treated as immutable downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    /// Feature type
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Host identifier, if any
    pub id: Option<String>,
    /// Hole diameter
    pub diameter: Option<Quantity>,
    /// Depth (for holes, the sum of segment lengths)
    pub depth: Option<Quantity>,
    /// Pocket or slot width
    pub width: Option<Quantity>,
    /// Pocket or slot length
    pub length: Option<Quantity>,
    /// max(length, width) / min(length, width)
    pub aspect_ratio: Option<f64>,
    /// Smallest internal corner radius
    pub min_corner_radius: Option<Quantity>,
    /// Number of hole segments
    pub segment_count: u32,
    /// Per-segment breakdown for holes
    pub segments: Vec<HoleSegment>,
    /// Pocket goes through the part
    pub is_through: bool,
    /// Detection confidence in `[0.30, 1.0]`
    pub confidence: f64,
    /// Human-readable classification rationale
    pub reasoning: String,
    /// Confidence below the review threshold
    pub needs_review: bool,
    /// Host flagged the feature as unreachable from any 3-axis approach
    pub unreachable_in_3axis: bool,
    /// Explanation for `unreachable_in_3axis`
    pub unreachable_reason: Option<String>,
    /// Outward normal of the face the tool must enter through
    pub approach_normal: Option<[f64; 3]>,
    /// Set when the host failed to process this feature
    pub error: Option<String>,
}

impl Feature {
    /// Create an empty feature of the given kind
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Convenience constructor for a simple hole
    pub fn hole(diameter_mm: f64, depth_mm: f64) -> Self {
        Self {
            kind: FeatureKind::Hole,
            diameter: Some(Quantity::mm(diameter_mm)),
            depth: Some(Quantity::mm(depth_mm)),
            segment_count: 1,
            ..Default::default()
        }
    }

    /// Convenience constructor for a pocket
    pub fn pocket(width_mm: f64, length_mm: f64, depth_mm: f64) -> Self {
        Self {
            kind: FeatureKind::Pocket,
            width: Some(Quantity::mm(width_mm)),
            length: Some(Quantity::mm(length_mm)),
            depth: Some(Quantity::mm(depth_mm)),
            ..Default::default()
        }
    }

    /// Convenience constructor for a slot
    pub fn slot(width_mm: f64, length_mm: f64, depth_mm: f64) -> Self {
        Self {
            kind: FeatureKind::Slot,
            ..Self::pocket(width_mm, length_mm, depth_mm)
        }
    }

    /// Builder method to set the minimum internal corner radius
    pub fn with_corner_radius(mut self, radius_mm: f64) -> Self {
        self.min_corner_radius = Some(Quantity::mm(radius_mm));
        self
    }

    /// Builder method to set the host identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Diameter in mm
    pub fn diameter_mm(&self) -> Option<f64> {
        self.diameter.map(|q| q.to_mm())
    }

    /// Depth in mm
    pub fn depth_mm(&self) -> Option<f64> {
        self.depth.map(|q| q.to_mm())
    }

    /// Width in mm
    pub fn width_mm(&self) -> Option<f64> {
        self.width.map(|q| q.to_mm())
    }

    /// Length in mm
    pub fn length_mm(&self) -> Option<f64> {
        self.length.map(|q| q.to_mm())
    }

    /// Minimum internal corner radius in mm
    pub fn min_corner_radius_mm(&self) -> Option<f64> {
        self.min_corner_radius.map(|q| q.to_mm())
    }

    /// Whether the host reported a processing error for this entry
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
