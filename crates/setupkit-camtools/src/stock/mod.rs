//! Stock sizing
//!
//! This module provides:
//! - Offset application around the part bounding box
//! - Rounding up to commercially available stock sizes

pub mod calculator;
pub mod sizes;

pub use calculator::{calculate_stock_dimensions, StockConfig, StockDimensions, StockOffsets};
pub use sizes::{round_to_standard_size, standard_sizes, StockDimensionType};
