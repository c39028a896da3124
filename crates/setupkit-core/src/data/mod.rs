//! Static reference data
//!
//! This module provides:
//! - The material property table used for feeds/speeds and operation rules
//! - The cutting tool model

pub mod materials;
pub mod tools;
