//! # setupkit Core
//!
//! Core types and utilities shared by every setupkit crate.
//! Provides explicit-unit quantities, the geometry snapshot handed over by a
//! CAD host, the material property table and the cutting tool model.

pub mod data;
pub mod error;
pub mod types;
pub mod units;

pub use data::materials::{Hardness, MaterialLibrary, MaterialProperties};
pub use data::tools::{Tool, ToolId, ToolType};

pub use error::{Error, Result};

pub use types::{
    normalize_key, Axis, BodyGeometry, BoundingBox, Feature, FeatureKind, HoleSegment, SegmentKind,
};

pub use units::{MeasurementSystem, Quantity, Unit, MM_PER_INCH};

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
