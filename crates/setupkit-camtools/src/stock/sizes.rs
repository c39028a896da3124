//! Standard stock size tables
//!
//! Sizes are ascending. Rounding always goes up to the next available size
//! and falls back to the largest entry when the value exceeds the table.

use serde::{Deserialize, Serialize};
use setupkit_core::{MeasurementSystem, MM_PER_INCH};

/// Values this close to a table entry count as that entry
const SIZE_EPSILON: f64 = 1e-9;

const METRIC_PLATE_MM: &[f64] = &[
    3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 15.0, 16.0, 18.0, 20.0, 22.0, 25.0, 30.0, 32.0, 35.0,
    40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 90.0, 100.0,
];

const METRIC_BAR_MM: &[f64] = &[
    10.0, 12.0, 15.0, 16.0, 18.0, 20.0, 22.0, 25.0, 30.0, 32.0, 35.0, 40.0, 45.0, 50.0, 55.0,
    60.0, 65.0, 70.0, 75.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 180.0,
    200.0, 220.0, 250.0, 300.0,
];

const METRIC_ROUND_MM: &[f64] = &[
    6.0, 8.0, 10.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 22.0, 25.0, 28.0, 30.0, 32.0, 35.0, 38.0,
    40.0, 42.0, 45.0, 48.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0,
    110.0, 120.0, 130.0, 150.0,
];

const IMPERIAL_PLATE_IN: &[f64] = &[
    0.125, 0.1875, 0.25, 0.3125, 0.375, 0.4375, 0.5, 0.625, 0.75, 0.875, 1.0, 1.25, 1.5, 1.75,
    2.0, 2.5, 3.0, 3.5, 4.0,
];

const IMPERIAL_BAR_IN: &[f64] = &[
    0.5, 0.625, 0.75, 0.875, 1.0, 1.125, 1.25, 1.375, 1.5, 1.75, 2.0, 2.25, 2.5, 2.75, 3.0, 3.5,
    4.0, 4.5, 5.0, 5.5, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0,
];

const IMPERIAL_ROUND_IN: &[f64] = &[
    0.25, 0.3125, 0.375, 0.4375, 0.5, 0.5625, 0.625, 0.75, 0.875, 1.0, 1.125, 1.25, 1.375, 1.5,
    1.625, 1.75, 2.0, 2.25, 2.5, 2.75, 3.0, 3.5, 4.0,
];

/// Which size table a dimension is rounded against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockDimensionType {
    /// Plate thickness (stock height)
    PlateThickness,
    /// Bar width (stock width and depth)
    BarWidth,
    /// Round bar diameter
    RoundDiameter,
}

/// Size table for a dimension type, in the system's native unit
pub fn standard_sizes(dim_type: StockDimensionType, system: MeasurementSystem) -> &'static [f64] {
    match (system, dim_type) {
        (MeasurementSystem::Metric, StockDimensionType::PlateThickness) => METRIC_PLATE_MM,
        (MeasurementSystem::Metric, StockDimensionType::BarWidth) => METRIC_BAR_MM,
        (MeasurementSystem::Metric, StockDimensionType::RoundDiameter) => METRIC_ROUND_MM,
        (MeasurementSystem::Imperial, StockDimensionType::PlateThickness) => IMPERIAL_PLATE_IN,
        (MeasurementSystem::Imperial, StockDimensionType::BarWidth) => IMPERIAL_BAR_IN,
        (MeasurementSystem::Imperial, StockDimensionType::RoundDiameter) => IMPERIAL_ROUND_IN,
    }
}

/// Round a millimetre dimension up to the next standard size.
///
/// Imperial rounding is done in inches and converted back, so the result is
/// always in millimetres. Values beyond the table get the largest size.
pub fn round_to_standard_size(
    value_mm: f64,
    dim_type: StockDimensionType,
    system: MeasurementSystem,
) -> f64 {
    let table = standard_sizes(dim_type, system);
    let value = match system {
        MeasurementSystem::Metric => value_mm,
        MeasurementSystem::Imperial => value_mm / MM_PER_INCH,
    };

    let size = table
        .iter()
        .copied()
        .find(|s| *s >= value - SIZE_EPSILON)
        .or_else(|| table.last().copied())
        .unwrap_or(value);

    match system {
        MeasurementSystem::Metric => size,
        MeasurementSystem::Imperial => size * MM_PER_INCH,
    }
}
