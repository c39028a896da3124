//! Config file location

use crate::config::EngineConfig;
use crate::error::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};

/// File name inside the application config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

const APP_DIR: &str = "setupkit";

/// `<config_dir>/setupkit/config.toml` for the current platform
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Create the application config directory if needed
pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
    let path = default_config_path()?;
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| SettingsError::ConfigDirectory(path.display().to_string()))?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}

/// Load the config at `path`, or defaults when the file does not exist.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_or_default(path: &Path) -> SettingsResult<EngineConfig> {
    if path.exists() {
        EngineConfig::load_from_file(path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(EngineConfig::default())
    }
}
