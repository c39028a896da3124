//! Toolpath strategy
//!
//! This module provides:
//! - Rule-table mapping from features to roughing/finishing operations
//! - Tool selection under the corner radius and flute length rules
//! - Feeds and speeds from the material table

pub mod feeds;
pub mod mapper;
pub mod selector;

pub use feeds::{CutType, CuttingParameters, FeedsCalculator, ToolpathConfig};
pub use mapper::{map_feature_to_operations, Operation, OperationMapping, OperationStep};
pub use selector::{select_best_tool, ToolConstraint, ToolSelection};
