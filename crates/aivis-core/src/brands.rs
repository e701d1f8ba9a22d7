use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A named entity tracked in engine responses: the brand itself or a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub competitors: Vec<Entity>,
}

impl BrandEntry {
    #[must_use]
    pub fn entity(&self) -> Entity {
        Entity {
            name: self.name.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandEntry>,
}

impl BrandsFile {
    /// Case-insensitive lookup by brand name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&BrandEntry> {
        let needle = name.trim().to_lowercase();
        self.brands
            .iter()
            .find(|b| b.name.trim().to_lowercase() == needle)
    }
}

/// Load and validate the brand roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<BrandsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brands_file: BrandsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::BrandsFileParse)?;

    validate_brands(&brands_file)?;

    Ok(brands_file)
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for brand in &brands_file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        let lower_name = brand.name.trim().to_lowercase();
        if !seen_names.insert(lower_name.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        for competitor in &brand.competitors {
            if competitor.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has a competitor with an empty name",
                    brand.name
                )));
            }
            if competitor.name.trim().to_lowercase() == lower_name {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' lists itself as a competitor",
                    brand.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
