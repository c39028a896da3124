//! # setupkit-advisor
//!
//! Suggestion orchestrators for CNC setup:
//! - [`SetupAdvisor::suggest_stock_setup`]: stock size, shape and orientation
//! - [`SetupAdvisor::suggest_toolpath_strategy`]: per-feature operations,
//!   tools and feeds
//! - [`SetupAdvisor::record_user_choice`] and the feedback history calls
//!
//! Orchestrators never return `Err`; every outcome is a response variant
//! tagged by `status`.

pub mod advisor;
pub mod error;
pub mod feedback;
pub mod request;
pub mod response;
pub mod stock;
pub mod toolpath;

pub use advisor::{SetupAdvisor, STOCK_SETUP_OPERATION, TOOLPATH_STRATEGY_OPERATION};
pub use error::{AdvisorError, AdvisorResult, ErrorBody};
pub use request::{CustomOffsets, RecordChoiceRequest, StockSetupRequest, ToolpathRequest};
pub use response::{
    AppliedOffsets, ClearResponse, ExportResponse, FeatureDimensions, FeatureStrategy, FeatureSuggestion,
    FeatureSummary, GeometryFound, LearningMetadata, Limitations, OperationChoice,
    OrientationAlternative, OrientationOption, OrientationSummary, PrioritySummary,
    RecommendedTool, RecordChoiceResponse, RectangularStock, RoundStock, StockOptions,
    StockSetupResponse, StockShape, StockSuggestion, SuggestedDefaults, ToolpathResponse,
    ToolpathSuggestion,
};
