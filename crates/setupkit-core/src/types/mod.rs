//! Geometry snapshot types
//!
//! This module provides:
//! - Bounding boxes and principal axes
//! - Recognized machining features (holes, pockets, slots)
//! - The per-body snapshot a CAD host supplies to the advisor
//! - Key normalization shared by preference and feedback lookups

pub mod feature;
pub mod geometry;

pub use feature::{Feature, FeatureKind, HoleSegment, SegmentKind};
pub use geometry::{Axis, BodyGeometry, BoundingBox, FaceCounts};

/// Normalize a lookup key (material, geometry type, feature type).
///
/// Keys are lowercased and trimmed before storage and before lookup.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
