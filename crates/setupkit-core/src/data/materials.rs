//! Material property table
//!
//! This module provides:
//! - Surface speeds (SFM) for HSS and carbide tooling per material family
//! - Chip load ranges (inches per tooth)
//! - Hardness class used by the operation mapper
//! - Fuzzy lookup so "6061 Aluminum" resolves to the aluminum family

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse hardness class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Hardness {
    /// Aluminum, brass, plastics, wood
    Soft,
    /// Mild steel and unknown materials
    Medium,
    /// Stainless and tool steels
    Hard,
}

impl Default for Hardness {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Hardness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft => write!(f, "soft"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Cutting properties of a material family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Library key (lowercase, underscore separated)
    pub key: String,
    /// Surface feet per minute with high speed steel tooling
    pub sfm_hss: f64,
    /// Surface feet per minute with carbide tooling
    pub sfm_carbide: f64,
    /// Chip load range (min, max) in inches per tooth
    pub chip_load_range_in: (f64, f64),
    /// Hardness class
    pub hardness: Hardness,
}

impl MaterialProperties {
    /// Create a material entry
    pub fn new(
        key: impl Into<String>,
        sfm_hss: f64,
        sfm_carbide: f64,
        chip_load_range_in: (f64, f64),
        hardness: Hardness,
    ) -> Self {
        Self {
            key: key.into(),
            sfm_hss,
            sfm_carbide,
            chip_load_range_in,
            hardness,
        }
    }

    /// SFM for the given tool material class
    pub fn sfm(&self, is_carbide: bool) -> f64 {
        if is_carbide {
            self.sfm_carbide
        } else {
            self.sfm_hss
        }
    }

    /// Whether the material counts as soft for roughing decisions
    pub fn is_soft(&self) -> bool {
        self.hardness == Hardness::Soft
    }
}

/// Result of a material lookup
#[derive(Debug, Clone, Copy)]
pub struct MaterialMatch<'a> {
    /// Matched (or fallback) properties
    pub properties: &'a MaterialProperties,
    /// False when the conservative fallback was used
    pub matched: bool,
}

impl MaterialMatch<'_> {
    /// Source attribution string
    pub fn source(&self) -> &'static str {
        if self.matched {
            "from: material_library"
        } else {
            "from: default_conservative"
        }
    }
}

/// Material library with ordered, deterministic lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Entries in lookup order
    materials: Vec<MaterialProperties>,
    /// Conservative fallback for unknown materials
    fallback: MaterialProperties,
}

impl MaterialLibrary {
    /// Create an empty library with the given fallback entry
    pub fn new(fallback: MaterialProperties) -> Self {
        Self {
            materials: Vec::new(),
            fallback,
        }
    }

    /// Add a material; an existing entry with the same key is replaced in place
    pub fn add_material(&mut self, material: MaterialProperties) {
        match self.materials.iter_mut().find(|m| m.key == material.key) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
    }

    /// Get a material by exact key
    pub fn get_material(&self, key: &str) -> Option<&MaterialProperties> {
        self.materials.iter().find(|m| m.key == key)
    }

    /// Get all materials in lookup order
    pub fn get_all_materials(&self) -> &[MaterialProperties] {
        &self.materials
    }

    /// The conservative fallback entry
    pub fn fallback(&self) -> &MaterialProperties {
        &self.fallback
    }

    /// Resolve a free-form material name.
    ///
    /// Tries, in order: exact key, substring in either direction, then any
    /// shared underscore-separated word. Falls back to the conservative entry.
    pub fn lookup(&self, material_name: &str) -> MaterialMatch<'_> {
        let normalized = normalize_material_name(material_name);
        if normalized.is_empty() {
            return self.unmatched();
        }

        if let Some(m) = self.get_material(&normalized) {
            return Self::matched(m);
        }

        if let Some(m) = self
            .materials
            .iter()
            .find(|m| normalized.contains(m.key.as_str()) || m.key.contains(normalized.as_str()))
        {
            return Self::matched(m);
        }

        let input_words: Vec<&str> = normalized.split('_').filter(|w| !w.is_empty()).collect();
        if let Some(m) = self.materials.iter().find(|m| {
            m.key
                .split('_')
                .any(|word| input_words.iter().any(|w| *w == word))
        }) {
            return Self::matched(m);
        }

        tracing::debug!("No material match for '{}', using conservative defaults", material_name);
        self.unmatched()
    }

    /// Convenience wrapper returning only the properties
    pub fn properties(&self, material_name: &str) -> &MaterialProperties {
        self.lookup(material_name).properties
    }

    /// Get the number of materials in the library
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    fn matched(properties: &MaterialProperties) -> MaterialMatch<'_> {
        MaterialMatch {
            properties,
            matched: true,
        }
    }

    fn unmatched(&self) -> MaterialMatch<'_> {
        MaterialMatch {
            properties: &self.fallback,
            matched: false,
        }
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        init_standard_library()
    }
}

/// Lowercase, trim, and turn spaces and hyphens into underscores
pub fn normalize_material_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Initialize the standard material library
pub fn init_standard_library() -> MaterialLibrary {
    let mut library = MaterialLibrary::new(MaterialProperties::new(
        "default",
        100.0,
        300.0,
        (0.0005, 0.001),
        Hardness::Medium,
    ));

    library.add_material(MaterialProperties::new(
        "aluminum",
        400.0,
        1200.0,
        (0.001, 0.003),
        Hardness::Soft,
    ));
    library.add_material(MaterialProperties::new(
        "mild_steel",
        100.0,
        300.0,
        (0.0005, 0.002),
        Hardness::Medium,
    ));
    library.add_material(MaterialProperties::new(
        "stainless_steel",
        40.0,
        120.0,
        (0.0003, 0.0015),
        Hardness::Hard,
    ));
    library.add_material(MaterialProperties::new(
        "brass",
        300.0,
        900.0,
        (0.001, 0.003),
        Hardness::Soft,
    ));
    library.add_material(MaterialProperties::new(
        "plastic",
        500.0,
        1500.0,
        (0.002, 0.004),
        Hardness::Soft,
    ));
    library.add_material(MaterialProperties::new(
        "wood",
        600.0,
        1800.0,
        (0.003, 0.006),
        Hardness::Soft,
    ));

    library
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_material_name() {
        assert_eq!(normalize_material_name(" 304 Stainless-Steel "), "304_stainless_steel");
    }

    #[test]
    fn test_empty_name_uses_fallback() {
        let library = init_standard_library();
        let m = library.lookup("   ");
        assert!(!m.matched);
        assert_eq!(m.properties.key, "default");
    }
}
