//! # setupkit CAM tools
//!
//! Analysis stages of the setup advisor:
//! - Confidence scoring and feature classification
//! - Geometry helpers (tool radii, accessibility, machining priority)
//! - Cylindrical detection and stock sizing
//! - Orientation ranking
//! - Operation mapping, tool selection and feeds/speeds
//!
//! Every stage is a pure function of its inputs and an immutable config.

pub mod classifier;
pub mod confidence;
pub mod cylindrical;
pub mod error;
pub mod geometry_helpers;
pub mod orientation;
pub mod stock;
pub mod toolpath;

pub use classifier::{
    classify_geometry_type, ClassifierConfig, FeatureClassifier, GeometryType, HoleInput,
    PocketInput, RawFeature,
};
pub use confidence::{
    get_ambiguity_flags, ConfidenceConfig, ConfidenceScore, ConfidenceScorer, DetectionSource,
};
pub use cylindrical::{
    CylindricalAnalysis, CylindricalConfig, CylindricalDetector, ShapeClass, StockTradeOffs,
};
pub use error::{AnalysisError, AnalysisResult};
pub use geometry_helpers::{
    analyze_feature_accessibility, calculate_minimum_tool_radii, group_by_machining_priority,
    tool_radii_for_features, Accessibility, PriorityGroup, ToolRadii, CORNER_RADIUS_RULE,
};
pub use orientation::{
    OrientationAnalyzer, OrientationAxis, OrientationCandidate, OrientationConfig, SetupAction,
    SetupStep, UnreachableEntry,
};
pub use stock::{
    calculate_stock_dimensions, round_to_standard_size, StockConfig, StockDimensionType,
    StockDimensions, StockOffsets,
};
pub use toolpath::{
    map_feature_to_operations, select_best_tool, CutType, CuttingParameters, FeedsCalculator,
    Operation, OperationMapping, OperationStep, ToolConstraint, ToolSelection, ToolpathConfig,
};
