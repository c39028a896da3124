//! Errors raised while loading, saving and validating an engine configuration.

use std::io;
use thiserror::Error;

/// Failure to read, write or accept an [`crate::EngineConfig`].
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading the config file failed.
    #[error("Failed to load engine config: {0}")]
    LoadError(String),

    /// Writing the config file failed.
    #[error("Failed to save engine config: {0}")]
    SaveError(String),

    /// A single value was rejected.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The platform config directory is unavailable.
    #[error("Config directory unavailable: {0}")]
    ConfigDirectory(String),

    #[error("Config I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed `.json` config.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed `.toml` config.
    #[error("Config TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Config TOML encoding error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Validation rejected the config.
    #[error("Invalid engine config: {0}")]
    Config(#[from] ConfigError),
}

/// Validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Extension other than `.toml` or `.json`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A tunable outside its accepted range.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// A section failed its own consistency checks.
    #[error("Invalid section '{section}': {reason}")]
    InvalidSection { section: String, reason: String },
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &str, value: impl ToString) -> Self {
        Self::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for config file operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type for validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
