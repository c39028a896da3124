//! Engine configuration
//!
//! Every tunable constant of the advisor in one immutable object:
//! - Confidence scoring and classification thresholds
//! - Cylindrical detection, stock offsets and orientation weights
//! - Toolpath constants (RPM cap, stepovers, flute/corner rules)
//! - Learning constants and the orchestration gates
//! - An optional machine profile
//!
//! Supports JSON and TOML files; the format follows the file extension.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use crate::machine::MachineProfile;
use serde::{Deserialize, Serialize};
use setupkit_camtools::{
    ClassifierConfig, ConfidenceConfig, CylindricalConfig, OrientationConfig, StockConfig,
    ToolpathConfig,
};
use setupkit_learning::LearningConfig;
use std::path::Path;

/// Gates and defaults of the suggestion orchestrators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Best orientation scores below this ask the user to choose
    pub orientation_threshold: f64,
    /// Alternatives within this distance of the best score are offered
    pub alternative_window: f64,
    /// Confidence before learning adjusts it
    pub base_confidence: f64,
    /// Feedback events considered by the context matcher
    pub matcher_limit: usize,
    /// Material assumed when a request names none
    pub default_material: String,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            orientation_threshold: 0.70,
            alternative_window: 0.15,
            base_confidence: 0.8,
            matcher_limit: 50,
            default_material: "aluminum".to_string(),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub confidence: ConfidenceConfig,
    pub classifier: ClassifierConfig,
    pub cylindrical: CylindricalConfig,
    pub stock: StockConfig,
    pub orientation: OrientationConfig,
    pub toolpath: ToolpathConfig,
    pub learning: LearningConfig,
    pub orchestration: OrchestrationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineProfile>,
}

/// Config file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format from the file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl EngineConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Toolpath constants with the machine's spindle limit applied
    pub fn effective_toolpath(&self) -> ToolpathConfig {
        self.toolpath
            .clone()
            .limited_to_spindle(self.machine.as_ref().and_then(|m| m.spindle_max_rpm))
    }

    /// Parse config text in the given format and validate it
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;
        let config = Self::from_str_with_format(&content, format)?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let unit = |key: &str, v: f64| -> ConfigResult<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::out_of_range(key, v))
            }
        };
        let positive = |key: &str, v: f64| -> ConfigResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::out_of_range(key, v))
            }
        };

        // Confidence scorer
        let c = &self.confidence;
        unit("confidence.api_provided_base", c.api_provided_base)?;
        unit("confidence.derived_geometry_base", c.derived_geometry_base)?;
        unit("confidence.heuristic_base", c.heuristic_base)?;
        unit("confidence.floor", c.floor)?;
        unit("confidence.review_threshold", c.review_threshold)?;

        positive("classifier.slot_aspect_ratio", self.classifier.slot_aspect_ratio)?;
        unit("classifier.dominance_ratio", self.classifier.dominance_ratio)?;

        unit("cylindrical.threshold", self.cylindrical.threshold)?;
        positive(
            "cylindrical.elongated_min_ratio",
            self.cylindrical.elongated_min_ratio,
        )?;

        for (key, v) in [
            ("stock.default_xy_offset_mm", self.stock.default_xy_offset_mm),
            ("stock.default_z_offset_mm", self.stock.default_z_offset_mm),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::out_of_range(key, v));
            }
        }

        let o = &self.orientation;
        let weights = o.feature_access_weight + o.setup_count_weight + o.stability_weight;
        if (weights - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidSection {
                section: "orientation".to_string(),
                reason: format!("weights must sum to 1.0, got {:.3}", weights),
            });
        }

        let t = &self.toolpath;
        positive("toolpath.rpm_cap", t.rpm_cap)?;
        if t.default_flutes == 0 {
            return Err(ConfigError::out_of_range("toolpath.default_flutes", 0));
        }
        positive("toolpath.roughing_stepover", t.roughing_stepover)?;
        positive("toolpath.finishing_stepover", t.finishing_stepover)?;
        positive("toolpath.flute_length_factor", t.flute_length_factor)?;
        positive("toolpath.corner_radius_rule", t.corner_radius_rule)?;

        self.learning
            .validate()
            .map_err(|reason| ConfigError::InvalidSection {
                section: "learning".to_string(),
                reason,
            })?;

        let g = &self.orchestration;
        unit("orchestration.orientation_threshold", g.orientation_threshold)?;
        unit("orchestration.alternative_window", g.alternative_window)?;
        unit("orchestration.base_confidence", g.base_confidence)?;
        if g.matcher_limit == 0 {
            return Err(ConfigError::out_of_range("orchestration.matcher_limit", 0));
        }

        if let Some(machine) = &self.machine {
            machine.validate()?;
        }
        Ok(())
    }
}
