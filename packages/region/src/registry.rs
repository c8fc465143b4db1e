//! Compile-time registry of the mapped top-level regions.
//!
//! The default registry covers the six Wanbei cities and is embedded via
//! `include_str!`. A different area can be mapped by pointing the loader
//! at another TOML file with the same shape.

use std::collections::BTreeSet;
use std::path::Path;

use wanbei_map_region_models::RegionRegistry;

use crate::RegionError;

/// Number of cities in the embedded registry. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 6;

/// Embedded default registry.
const DEFAULT_REGISTRY_TOML: &str = include_str!("../regions/wanbei.toml");

/// Returns the embedded Wanbei registry.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse or validate. Since it is a
/// compile-time constant, a failure indicates a development error and is
/// caught by the tests below.
#[must_use]
pub fn default_registry() -> RegionRegistry {
    parse_registry(DEFAULT_REGISTRY_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded region registry: {e}"))
}

/// Parses and validates a registry from TOML text.
///
/// # Errors
///
/// Returns [`RegionError::Toml`] on malformed TOML and
/// [`RegionError::Conversion`] when the registry is empty or has
/// duplicate keys.
pub fn parse_registry(toml_str: &str) -> Result<RegionRegistry, RegionError> {
    let registry: RegionRegistry = toml::de::from_str(toml_str)?;
    validate(&registry)?;
    Ok(registry)
}

/// Reads a registry TOML file from disk.
///
/// # Errors
///
/// Returns [`RegionError::Io`] if the file cannot be read, or any error
/// from [`parse_registry`].
pub fn load_registry(path: &Path) -> Result<RegionRegistry, RegionError> {
    log::debug!("Loading region registry from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    parse_registry(&contents)
}

fn validate(registry: &RegionRegistry) -> Result<(), RegionError> {
    if registry.regions.is_empty() {
        return Err(RegionError::Conversion {
            message: format!("Region registry '{}' has no regions", registry.name),
        });
    }

    let mut seen = BTreeSet::new();
    for region in &registry.regions {
        if region.key.is_empty() || region.full_name.is_empty() {
            return Err(RegionError::Conversion {
                message: format!("Region '{}' has an empty key or full name", region.name),
            });
        }
        if !seen.insert(region.key.as_str()) {
            return Err(RegionError::Conversion {
                message: format!("Duplicate region key: {}", region.key),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_registry() {
        let registry = default_registry();
        assert_eq!(
            registry.regions.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            registry.regions.len()
        );
        assert_eq!(registry.combined_boundaries, "six_cities_from_anhui.geojson");
    }

    #[test]
    fn default_regions_are_complete_cities() {
        for region in &default_registry().regions {
            assert!(
                region.full_name.starts_with(&region.key),
                "{} should start with its key {}",
                region.full_name,
                region.key
            );
            let adcode = region
                .adcode
                .unwrap_or_else(|| panic!("{} has no adcode", region.key));
            assert_eq!(adcode % 100, 0, "{} adcode is not city level", region.key);
        }
    }

    #[test]
    fn finds_regions_by_any_name() {
        let registry = default_registry();
        assert_eq!(registry.find("阜阳").unwrap().key, "阜阳");
        assert_eq!(registry.find("蚌埠市").unwrap().key, "蚌埠");
        assert_eq!(registry.find_by_adcode(341_221).unwrap().key, "阜阳");
        assert!(registry.find("合肥").is_none());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let toml_str = r#"
            name = "dup"
            combined_boundaries = "x.geojson"

            [[regions]]
            key = "a"
            name = "a市"
            full_name = "a市"

            [[regions]]
            key = "a"
            name = "b市"
            full_name = "b市"
        "#;
        assert!(matches!(
            parse_registry(toml_str),
            Err(RegionError::Conversion { .. })
        ));
    }

    #[test]
    fn rejects_empty_registry() {
        let toml_str = r#"
            name = "empty"
            combined_boundaries = "x.geojson"
            regions = []
        "#;
        assert!(parse_registry(toml_str).is_err());
    }
}
