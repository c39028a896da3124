//! Cutting tools as reported by the host tool library
//!
//! Geometry (diameter, flute length) is carried as explicit-unit quantities;
//! flute length and flute count are optional because not every library
//! records them.

use crate::units::Quantity;
use serde::{Deserialize, Serialize};

/// Tool types for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// Flat end mill
    FlatEndmill,
    /// Ball end mill / ball nose
    BallEndmill,
    /// Corner radius (bull nose) end mill
    BullNoseEndmill,
    /// Twist drill
    Drill,
    /// Spot drill
    SpotDrill,
    /// Center drill
    CenterDrill,
    /// Chamfer mill
    ChamferMill,
    /// Face mill
    FaceMill,
    /// Slitting / slot mill
    SlotMill,
    /// Anything else the host reports
    #[serde(other)]
    Other,
}

impl ToolType {
    /// Machine-readable name, matched by type filters
    pub fn slug(&self) -> &'static str {
        match self {
            Self::FlatEndmill => "flat_endmill",
            Self::BallEndmill => "ball_endmill",
            Self::BullNoseEndmill => "bull_nose_endmill",
            Self::Drill => "drill",
            Self::SpotDrill => "spot_drill",
            Self::CenterDrill => "center_drill",
            Self::ChamferMill => "chamfer_mill",
            Self::FaceMill => "face_mill",
            Self::SlotMill => "slot_mill",
            Self::Other => "other",
        }
    }

    /// Case-insensitive substring match against the slug
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.slug().contains(filter.to_lowercase().as_str())
    }
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Tool identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ToolId(
    /// The unique string identifier for the tool.
    pub String,
);

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique tool identifier
    pub id: ToolId,
    /// Tool number (for reference)
    #[serde(default)]
    pub number: u32,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Tool type
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    /// Cutting diameter
    pub diameter: Quantity,
    /// Flute length, when the library records it
    #[serde(default)]
    pub flute_length: Option<Quantity>,
    /// Number of flutes, when the library records it
    #[serde(default)]
    pub flutes: Option<u32>,
}

impl Tool {
    /// Create a new tool with basic properties
    pub fn new(id: ToolId, number: u32, tool_type: ToolType, diameter_mm: f64) -> Self {
        Self {
            id,
            number,
            description: String::new(),
            tool_type,
            diameter: Quantity::mm(diameter_mm),
            flute_length: None,
            flutes: None,
        }
    }

    /// Builder method to set the flute length in mm
    pub fn with_flute_length(mut self, flute_length_mm: f64) -> Self {
        self.flute_length = Some(Quantity::mm(flute_length_mm));
        self
    }

    /// Builder method to set the flute count
    pub fn with_flutes(mut self, flutes: u32) -> Self {
        self.flutes = Some(flutes);
        self
    }

    /// Builder method to set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Cutting diameter in mm
    pub fn diameter_mm(&self) -> f64 {
        self.diameter.to_mm()
    }

    /// Cutting radius in mm
    pub fn radius_mm(&self) -> f64 {
        self.diameter_mm() / 2.0
    }

    /// Flute length in mm
    pub fn flute_length_mm(&self) -> Option<f64> {
        self.flute_length.map(|q| q.to_mm())
    }

    /// Get a descriptive string for the tool
    pub fn description_short(&self) -> String {
        if self.description.is_empty() {
            format!("{:.2}mm {}", self.diameter_mm(), self.tool_type)
        } else {
            self.description.clone()
        }
    }
}
