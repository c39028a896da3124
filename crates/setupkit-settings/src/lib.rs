//! setupkit Settings Crate
//!
//! Engine configuration, its persistence, and machine profiles.

pub mod config;
pub mod error;
pub mod machine;
pub mod persistence;

pub use config::{ConfigFormat, EngineConfig, OrchestrationConfig};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use machine::{MachineProfile, MachineType};
pub use persistence::{default_config_path, ensure_config_dir, load_or_default, CONFIG_FILE_NAME};
