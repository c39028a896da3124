//! Feeds and speeds
//!
//! RPM = SFM × 3.82 / diameter (in), capped at the spindle limit.
//! Feed = RPM × flutes × chip load, converted from in/min to mm/min.

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use setupkit_core::{round_to, MaterialLibrary, Quantity, MM_PER_INCH};
use std::fmt;

/// Empirical constants for tool selection and feeds/speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathConfig {
    /// Spindle speed cap
    pub rpm_cap: f64,
    /// Flute count assumed when the tool does not record one
    pub default_flutes: u32,
    /// Roughing stepover as a share of tool diameter
    pub roughing_stepover: f64,
    /// Finishing stepover as a share of tool diameter
    pub finishing_stepover: f64,
    /// Roughing stepdown as a share of tool diameter
    pub roughing_stepdown: f64,
    /// Finishing chip load as a share of the material minimum
    pub finishing_chip_factor: f64,
    /// Required flute length as a multiple of feature depth
    pub flute_length_factor: f64,
    /// Maximum tool radius as a share of the smallest corner radius
    pub corner_radius_rule: f64,
}

impl Default for ToolpathConfig {
    fn default() -> Self {
        Self {
            rpm_cap: 24000.0,
            default_flutes: 2,
            roughing_stepover: 0.45,
            finishing_stepover: 0.15,
            roughing_stepdown: 1.0,
            finishing_chip_factor: 0.7,
            flute_length_factor: 1.2,
            corner_radius_rule: crate::geometry_helpers::CORNER_RADIUS_RULE,
        }
    }
}

impl ToolpathConfig {
    /// Lower the RPM cap to a machine's spindle maximum
    pub fn limited_to_spindle(mut self, spindle_max_rpm: Option<f64>) -> Self {
        if let Some(max) = spindle_max_rpm.filter(|m| *m > 0.0) {
            self.rpm_cap = self.rpm_cap.min(max);
        }
        self
    }
}

/// Cutting pass type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    Roughing,
    Finishing,
}

impl fmt::Display for CutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roughing => write!(f, "roughing"),
            Self::Finishing => write!(f, "finishing"),
        }
    }
}

/// Calculated cutting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingParameters {
    pub spindle_speed: Quantity,
    pub feed_rate: Quantity,
    /// Chip load per tooth (inches)
    pub chip_load: Quantity,
    pub stepover_roughing: Quantity,
    pub stepover_finishing: Quantity,
    pub stepdown_roughing: Quantity,
    pub is_carbide: bool,
    pub material_source: String,
    pub calculation_basis: String,
}

/// Feeds and speeds calculator
#[derive(Debug, Clone, Default)]
pub struct FeedsCalculator {
    config: ToolpathConfig,
    materials: MaterialLibrary,
}

impl FeedsCalculator {
    /// Create a calculator
    pub fn new(config: ToolpathConfig, materials: MaterialLibrary) -> Self {
        Self { config, materials }
    }

    /// Active configuration
    pub fn config(&self) -> &ToolpathConfig {
        &self.config
    }

    /// Material table
    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    /// Compute spindle speed, feed rate, stepovers and stepdown
    pub fn calculate(
        &self,
        material: &str,
        tool_diameter: Quantity,
        flutes: Option<u32>,
        is_carbide: bool,
        cut: CutType,
    ) -> AnalysisResult<CuttingParameters> {
        let diameter_mm = tool_diameter.to_mm();
        if !tool_diameter.unit.is_length() || !diameter_mm.is_finite() || diameter_mm <= 0.0 {
            return Err(AnalysisError::InvalidDimensions(format!(
                "tool diameter must be a positive length, got {}",
                tool_diameter
            )));
        }

        let matched = self.materials.lookup(material);
        let props = matched.properties;
        let sfm = props.sfm(is_carbide);
        let diameter_in = diameter_mm / MM_PER_INCH;
        let rpm = (sfm * 3.82 / diameter_in).min(self.config.rpm_cap);

        let (min_chip, max_chip) = props.chip_load_range_in;
        let chip_load = match cut {
            CutType::Finishing => min_chip * self.config.finishing_chip_factor,
            CutType::Roughing => (min_chip + max_chip) / 2.0,
        };
        let flutes = flutes.filter(|f| *f > 0).unwrap_or(self.config.default_flutes);
        let feed_mm_min = rpm * flutes as f64 * chip_load * MM_PER_INCH;

        tracing::debug!(
            "Feeds for {} ({}): {:.0} rpm, {:.0} mm/min",
            material,
            props.key,
            rpm,
            feed_mm_min
        );

        Ok(CuttingParameters {
            spindle_speed: Quantity::rpm(round_to(rpm, 0)),
            feed_rate: Quantity::mm_per_min(round_to(feed_mm_min, 0)),
            chip_load: Quantity::inches(chip_load),
            stepover_roughing: Quantity::mm(round_to(
                diameter_mm * self.config.roughing_stepover,
                2,
            )),
            stepover_finishing: Quantity::mm(round_to(
                diameter_mm * self.config.finishing_stepover,
                2,
            )),
            stepdown_roughing: Quantity::mm(round_to(
                diameter_mm * self.config.roughing_stepdown,
                2,
            )),
            is_carbide,
            material_source: matched.source().to_string(),
            calculation_basis: format!(
                "Material: {}, SFM: {}, Tool: {:.2}mm {} {}-flute, Operation: {}",
                material,
                sfm,
                diameter_mm,
                if is_carbide { "carbide" } else { "HSS" },
                flutes,
                cut
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spindle_limit() {
        let config = ToolpathConfig::default().limited_to_spindle(Some(18000.0));
        assert_eq!(config.rpm_cap, 18000.0);
        let config = ToolpathConfig::default().limited_to_spindle(Some(30000.0));
        assert_eq!(config.rpm_cap, 24000.0);
        let config = ToolpathConfig::default().limited_to_spindle(None);
        assert_eq!(config.rpm_cap, 24000.0);
    }

    #[test]
    fn test_zero_diameter_rejected() {
        let calc = FeedsCalculator::default();
        let err = calc
            .calculate("aluminum", Quantity::mm(0.0), Some(2), true, CutType::Roughing)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDimensions(_)));
    }
}
