//! Unit handling
//!
//! Every physical quantity that crosses a component boundary travels as a
//! [`Quantity`], a value paired with its [`Unit`], so millimetres and inches
//! can never be confused. Handles conversion between Metric (mm) and
//! Imperial (inch) systems.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

impl MeasurementSystem {
    /// Length unit used to report values in this system
    pub fn length_unit(&self) -> Unit {
        match self {
            Self::Metric => Unit::Mm,
            Self::Imperial => Unit::Inch,
        }
    }
}

/// Unit attached to a [`Quantity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Unit {
    /// Millimetres
    #[serde(rename = "mm")]
    Mm,
    /// Inches
    #[serde(rename = "in")]
    Inch,
    /// Spindle revolutions per minute
    #[serde(rename = "rpm")]
    Rpm,
    /// Feed in millimetres per minute
    #[serde(rename = "mm/min")]
    MmPerMin,
    /// Angle in degrees
    #[serde(rename = "deg")]
    Degrees,
}

impl Unit {
    /// Whether this unit measures length
    pub fn is_length(&self) -> bool {
        matches!(self, Unit::Mm | Unit::Inch)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm => write!(f, "mm"),
            Self::Inch => write!(f, "in"),
            Self::Rpm => write!(f, "rpm"),
            Self::MmPerMin => write!(f, "mm/min"),
            Self::Degrees => write!(f, "deg"),
        }
    }
}

/// A value with an explicit unit
///
/// Serializes as `{"value": 12.5, "unit": "mm"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric value
    pub value: f64,
    /// Unit of `value`
    pub unit: Unit,
}

impl Quantity {
    /// Create a quantity from a value and unit
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Length in millimetres
    pub fn mm(value: f64) -> Self {
        Self::new(value, Unit::Mm)
    }

    /// Length in inches
    pub fn inches(value: f64) -> Self {
        Self::new(value, Unit::Inch)
    }

    /// Spindle speed
    pub fn rpm(value: f64) -> Self {
        Self::new(value, Unit::Rpm)
    }

    /// Feed rate in mm/min
    pub fn mm_per_min(value: f64) -> Self {
        Self::new(value, Unit::MmPerMin)
    }

    /// Angle in degrees
    pub fn degrees(value: f64) -> Self {
        Self::new(value, Unit::Degrees)
    }

    /// Length value converted to millimetres.
    ///
    /// Non-length units are returned unchanged.
    pub fn to_mm(&self) -> f64 {
        match self.unit {
            Unit::Inch => self.value * MM_PER_INCH,
            _ => self.value,
        }
    }

    /// Express a millimetre length in the given measurement system
    pub fn length_in(value_mm: f64, system: MeasurementSystem) -> Self {
        match system {
            MeasurementSystem::Metric => Self::mm(value_mm),
            MeasurementSystem::Imperial => Self::inches(value_mm / MM_PER_INCH),
        }
    }

    /// Round the value to a fixed number of decimals, keeping the unit
    pub fn rounded(self, decimals: i32) -> Self {
        Self::new(crate::round_to(self.value, decimals), self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
