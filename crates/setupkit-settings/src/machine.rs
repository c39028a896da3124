//! Machine profiles
//!
//! A profile narrows suggestions to one machine: the spindle maximum caps
//! calculated RPM and the travel envelope bounds the stock block.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MachineType {
    #[default]
    CncMill,
    CncRouter,
    CncLathe,
}

impl std::fmt::Display for MachineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CncMill => write!(f, "CNC Mill"),
            Self::CncRouter => write!(f, "CNC Router"),
            Self::CncLathe => write!(f, "CNC Lathe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfile {
    pub id: String,
    pub name: String,
    pub machine_type: MachineType,

    // Travel envelope
    pub max_x_mm: f64,
    pub max_y_mm: f64,
    pub max_z_mm: f64,

    pub spindle_max_rpm: Option<f64>,
    pub has_4th_axis: bool,
    pub has_5th_axis: bool,
    pub post_processor: Option<String>,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "New Machine".to_string(),
            machine_type: MachineType::default(),
            max_x_mm: 300.0,
            max_y_mm: 300.0,
            max_z_mm: 100.0,
            spindle_max_rpm: None,
            has_4th_axis: false,
            has_5th_axis: false,
            post_processor: None,
        }
    }
}

impl MachineProfile {
    /// Profile with a fresh id and the given name and envelope
    pub fn new(name: impl Into<String>, max_x_mm: f64, max_y_mm: f64, max_z_mm: f64) -> Self {
        Self {
            name: name.into(),
            max_x_mm,
            max_y_mm,
            max_z_mm,
            ..Default::default()
        }
    }

    /// Builder method to set the spindle maximum
    pub fn with_spindle_max_rpm(mut self, rpm: f64) -> Self {
        self.spindle_max_rpm = Some(rpm);
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("machine.max_x_mm", self.max_x_mm),
            ("machine.max_y_mm", self.max_y_mm),
            ("machine.max_z_mm", self.max_z_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        if let Some(rpm) = self.spindle_max_rpm {
            if !rpm.is_finite() || rpm <= 0.0 {
                return Err(ConfigError::out_of_range("machine.spindle_max_rpm", rpm));
            }
        }
        Ok(())
    }

    /// Warnings for stock extents (`[x, y, z]` in mm) outside the envelope
    pub fn envelope_warnings(&self, stock_mm: [f64; 3]) -> Vec<String> {
        let limits = [
            ("width", "X", self.max_x_mm),
            ("depth", "Y", self.max_y_mm),
            ("height", "Z", self.max_z_mm),
        ];
        stock_mm
            .iter()
            .zip(limits)
            .filter(|(value, (_, _, max))| **value > *max)
            .map(|(value, (name, axis, max))| {
                format!(
                    "Stock {} {:.1}mm exceeds {} {} travel {:.1}mm",
                    name, value, self.name, axis, max
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_warnings() {
        let machine = MachineProfile::new("Shapeoko", 400.0, 400.0, 75.0);
        assert!(machine.envelope_warnings([100.0, 100.0, 20.0]).is_empty());

        let warnings = machine.envelope_warnings([410.0, 100.0, 80.0]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            "Stock width 410.0mm exceeds Shapeoko X travel 400.0mm"
        );
        assert!(warnings[1].contains("Z travel 75.0mm"));
    }

    #[test]
    fn test_validate_rejects_zero_envelope() {
        let machine = MachineProfile::new("Broken", 0.0, 100.0, 100.0);
        assert!(machine.validate().is_err());
        let machine = MachineProfile::default().with_spindle_max_rpm(-1.0);
        assert!(machine.validate().is_err());
    }
}
