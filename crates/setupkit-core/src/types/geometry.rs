//! Bounding boxes, axes and the body snapshot

use crate::error::{Error, Result};
use crate::types::feature::Feature;
use crate::units::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Principal machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Index into an `[x, y, z]` array
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for an `[x, y, z]` index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Axis-aligned extents of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Extent along X
    pub x: Quantity,
    /// Extent along Y
    pub y: Quantity,
    /// Extent along Z
    pub z: Quantity,
}

impl BoundingBox {
    /// Create a bounding box from millimetre extents
    pub fn from_mm(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Quantity::mm(x),
            y: Quantity::mm(y),
            z: Quantity::mm(z),
        }
    }

    /// Extents in millimetres as `[x, y, z]`
    pub fn dims_mm(&self) -> [f64; 3] {
        [self.x.to_mm(), self.y.to_mm(), self.z.to_mm()]
    }

    /// Extent along one axis in millimetres
    pub fn extent_mm(&self, axis: Axis) -> f64 {
        self.dims_mm()[axis.index()]
    }

    /// Check that every extent is a finite, non-negative length
    pub fn validate(&self) -> Result<()> {
        for (name, q) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !q.unit.is_length() {
                return Err(Error::invalid(
                    format!("bounding_box.{}", name),
                    format!("expected a length, got unit '{}'", q.unit),
                ));
            }
            if !q.value.is_finite() || q.value < 0.0 {
                return Err(Error::invalid(
                    format!("bounding_box.{}", name),
                    format!("extent must be a finite non-negative length, got {}", q.value),
                ));
            }
        }
        Ok(())
    }
}

/// Face statistics reported for a body
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceCounts {
    /// Number of cylindrical faces
    pub cylindrical: u32,
    /// Number of planar faces
    pub planar: u32,
    /// Total number of faces
    pub total: u32,
    /// Whether spherical, conical or toroidal faces were seen
    pub has_complex_surfaces: bool,
}

/// Geometry snapshot for one body, as supplied by the CAD host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyGeometry {
    /// Body name in the host document
    pub name: Option<String>,
    /// Bounding box extents
    pub bounding_box: Option<BoundingBox>,
    /// Recognized features
    pub features: Vec<Feature>,
    /// Ratio of cylindrical faces to all faces, if the host computed it
    pub cylindrical_face_ratio: Option<f64>,
    /// Raw face counts, used when no ratio is supplied
    pub face_counts: Option<FaceCounts>,
}

impl BodyGeometry {
    /// Create a snapshot from a bounding box and features
    pub fn new(bounding_box: BoundingBox, features: Vec<Feature>) -> Self {
        Self {
            bounding_box: Some(bounding_box),
            features,
            ..Default::default()
        }
    }

    /// Bounding box, or a missing-input error
    pub fn require_bounding_box(&self) -> Result<BoundingBox> {
        let bbox = self
            .bounding_box
            .ok_or_else(|| Error::missing("geometry.bounding_box"))?;
        bbox.validate()?;
        Ok(bbox)
    }

    /// Cylindrical face ratio in `[0, 1]`
    ///
    /// Falls back to face counts, then to 0.
    pub fn face_ratio(&self) -> f64 {
        if let Some(ratio) = self.cylindrical_face_ratio {
            return ratio.clamp(0.0, 1.0);
        }
        match self.face_counts {
            Some(counts) if counts.total > 0 => {
                (counts.cylindrical as f64 / counts.total as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Display name for messages
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("body")
    }
}
