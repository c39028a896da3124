//! # SetupKit
//!
//! A CNC setup advisor. Given the features recognized on a part, it suggests:
//! - Stock dimensions (rectangular or round bar) with standard-size rounding
//! - Part orientation and the setup sequence that follows from it
//! - Roughing/finishing operations, tools and feeds per feature
//!
//! Suggestions improve over time from recorded accept/override feedback.
//!
//! ## Architecture
//!
//! SetupKit is organized as a workspace with multiple crates:
//!
//! 1. **setupkit-core** - Units, geometry snapshot, materials, tools
//! 2. **setupkit-camtools** - Classification, orientation, stock and toolpath analysis
//! 3. **setupkit-learning** - Preference and feedback stores, confidence learning
//! 4. **setupkit-settings** - Engine configuration and machine profiles
//! 5. **setupkit-advisor** - Suggestion orchestrators
//! 6. **setupkit** - CLI binary that integrates all crates

use serde::de::DeserializeOwned;
use std::path::Path;

pub use setupkit_advisor::{
    AdvisorError, ClearResponse, CustomOffsets, ExportResponse, RecordChoiceRequest,
    RecordChoiceResponse, SetupAdvisor, StockSetupRequest, StockSetupResponse, ToolpathRequest,
    ToolpathResponse,
};
pub use setupkit_camtools::{GeometryType, OrientationAxis};
pub use setupkit_core::{
    BodyGeometry, BoundingBox, Feature, FeatureKind, MeasurementSystem, Quantity, Tool,
};
pub use setupkit_learning::{
    ExportFormat, FeedbackStatistics, InMemoryStore, JsonFileStore, StoreError,
};
pub use setupkit_settings::{EngineConfig, MachineProfile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so stdout stays valid JSON
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Engine configuration from an explicit path, else the platform default
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => {
            let default_path = setupkit_settings::default_config_path()?;
            setupkit_settings::load_or_default(&default_path)?
        }
    };
    Ok(config)
}

/// Advisor over a JSON-file store, or an in-memory one when no path is given
pub fn build_advisor(config: EngineConfig, store: Option<&Path>) -> anyhow::Result<SetupAdvisor> {
    Ok(match store {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            tracing::debug!("Using feedback store at {}", store.path().display());
            SetupAdvisor::with_store(config, std::sync::Arc::new(store))
        }
        None => SetupAdvisor::in_memory(config),
    })
}

/// Parse a request document
pub fn read_request<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}
