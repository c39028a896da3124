//! Stock dimension calculation
//!
//! Width and depth get the XY offset on both sides. Height gets the Z offset
//! on the top only; the bottom face is the fixture reference.

use super::sizes::{round_to_standard_size, StockDimensionType};
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, BoundingBox, MeasurementSystem, Quantity};

/// Default offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Material left on each side in X and Y (mm)
    pub default_xy_offset_mm: f64,
    /// Material left on top (mm)
    pub default_z_offset_mm: f64,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            default_xy_offset_mm: 5.0,
            default_z_offset_mm: 2.5,
        }
    }
}

impl StockConfig {
    /// Default offsets as quantities
    pub fn default_offsets(&self) -> StockOffsets {
        StockOffsets::from_mm(self.default_xy_offset_mm, self.default_z_offset_mm)
    }
}

/// Offsets applied around the part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockOffsets {
    pub xy: Quantity,
    pub z: Quantity,
}

impl StockOffsets {
    /// Offsets from millimetre values
    pub fn from_mm(xy: f64, z: f64) -> Self {
        Self {
            xy: Quantity::mm(xy),
            z: Quantity::mm(z),
        }
    }

    /// XY offset in mm
    pub fn xy_mm(&self) -> f64 {
        self.xy.to_mm()
    }

    /// Z offset in mm
    pub fn z_mm(&self) -> f64 {
        self.z.to_mm()
    }

    fn validate(&self) -> AnalysisResult<()> {
        for (name, q) in [("xy", self.xy), ("z", self.z)] {
            if !q.unit.is_length() || !q.value.is_finite() || q.value < 0.0 {
                return Err(AnalysisError::InvalidDimensions(format!(
                    "offset {} must be a non-negative length, got {}",
                    name, q
                )));
            }
        }
        Ok(())
    }
}

/// Part extents before offsets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDimensions {
    pub width: Quantity,
    pub depth: Quantity,
    pub height: Quantity,
}

/// Calculated stock block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDimensions {
    pub width: Quantity,
    pub depth: Quantity,
    pub height: Quantity,
    /// Part extents in mm, three decimals
    pub raw_dimensions: RawDimensions,
    pub offsets_applied: StockOffsets,
    pub rounded_to_standard: bool,
    pub unit_system: MeasurementSystem,
}

impl StockDimensions {
    /// Final extents in mm as `[width, depth, height]`
    pub fn dims_mm(&self) -> [f64; 3] {
        [self.width.to_mm(), self.depth.to_mm(), self.height.to_mm()]
    }
}

/// Compute the stock block for a part bounding box
pub fn calculate_stock_dimensions(
    bbox: &BoundingBox,
    offsets: &StockOffsets,
    round_to_standard: bool,
    system: MeasurementSystem,
) -> AnalysisResult<StockDimensions> {
    bbox.validate()?;
    offsets.validate()?;

    let [raw_w, raw_d, raw_h] = bbox.dims_mm();
    let xy = offsets.xy_mm();
    let z = offsets.z_mm();

    let mut width = raw_w + 2.0 * xy;
    let mut depth = raw_d + 2.0 * xy;
    let mut height = raw_h + z;

    if round_to_standard {
        width = round_to_standard_size(width, StockDimensionType::BarWidth, system);
        depth = round_to_standard_size(depth, StockDimensionType::BarWidth, system);
        height = round_to_standard_size(height, StockDimensionType::PlateThickness, system);
    }

    tracing::debug!(
        "Stock {:.3} x {:.3} x {:.3} mm from part {:.3} x {:.3} x {:.3} mm (rounded: {})",
        width,
        depth,
        height,
        raw_w,
        raw_d,
        raw_h,
        round_to_standard
    );

    Ok(StockDimensions {
        width: Quantity::length_in(width, system),
        depth: Quantity::length_in(depth, system),
        height: Quantity::length_in(height, system),
        raw_dimensions: RawDimensions {
            width: Quantity::mm(round_to(raw_w, 3)),
            depth: Quantity::mm(round_to(raw_d, 3)),
            height: Quantity::mm(round_to(raw_h, 3)),
        },
        offsets_applied: *offsets,
        rounded_to_standard: round_to_standard,
        unit_system: system,
    })
}
