//! Where fixtures come from.
//!
//! The map reads three kinds of static files relative to one base
//! location: `data.json`, the combined boundary file named by the region
//! registry, and optional per-city detail files. The base is either a
//! local directory or an `http(s)://` URL.

use std::path::PathBuf;

use async_trait::async_trait;
use wanbei_map_dataset::DataFile;
use wanbei_map_region::boundary::{RegionBoundary, parse_boundaries};
use wanbei_map_region_models::{RegionDef, RegionRegistry};

use crate::FixtureError;

/// Name of the event fixture.
pub const DATA_FILE: &str = "data.json";

/// Supplies boundary fixtures.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Loads the combined file holding every top-level city.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file is missing or malformed.
    async fn load_combined(
        &self,
        registry: &RegionRegistry,
    ) -> Result<Vec<RegionBoundary>, FixtureError>;

    /// Loads a city's detail file. `Ok(None)` means the file does not
    /// exist and the combined file's sub-regions should be used.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file exists but cannot be read or
    /// parsed.
    async fn load_city(&self, def: &RegionDef)
    -> Result<Option<Vec<RegionBoundary>>, FixtureError>;
}

/// Supplies the event fixture.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Loads and parses `data.json`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file is missing or malformed.
    async fn load_data(&self) -> Result<DataFile, FixtureError>;
}

/// Fixture files under a directory or URL.
#[derive(Debug, Clone)]
pub enum FixtureSource {
    /// Local directory.
    Dir(PathBuf),
    /// Remote base URL, without a trailing slash.
    Http {
        /// Shared HTTP client.
        client: reqwest::Client,
        /// Base URL.
        base_url: String,
    },
}

impl FixtureSource {
    /// Picks the variant from the location string: `http://` and
    /// `https://` prefixes select HTTP, anything else is a directory.
    #[must_use]
    pub fn new(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http {
                client: reqwest::Client::new(),
                base_url: location.trim_end_matches('/').to_string(),
            }
        } else {
            Self::Dir(PathBuf::from(location))
        }
    }

    /// Human-readable location of `relative`.
    #[must_use]
    pub fn describe(&self, relative: &str) -> String {
        match self {
            Self::Dir(dir) => dir.join(relative).display().to_string(),
            Self::Http { base_url, .. } => format!("{base_url}/{relative}"),
        }
    }

    /// Reads a fixture, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] on I/O and HTTP failures other than "not
    /// found", and on non-success HTTP statuses.
    pub async fn read_optional(&self, relative: &str) -> Result<Option<String>, FixtureError> {
        let location = self.describe(relative);
        log::debug!("Reading fixture {location}");

        match self {
            Self::Dir(dir) => match tokio::fs::read_to_string(dir.join(relative)).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            Self::Http { client, .. } => {
                let resp = client.get(&location).send().await?;
                if resp.status() == reqwest::StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if !resp.status().is_success() {
                    return Err(FixtureError::Conversion {
                        message: format!("Request for {location} failed with status {}", resp.status()),
                    });
                }
                Ok(Some(resp.text().await?))
            }
        }
    }

    /// Reads a fixture that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Conversion`] if it does not, or any error
    /// from [`Self::read_optional`].
    pub async fn read_required(&self, relative: &str) -> Result<String, FixtureError> {
        self.read_optional(relative)
            .await?
            .ok_or_else(|| FixtureError::Conversion {
                message: format!("Fixture not found: {}", self.describe(relative)),
            })
    }
}

#[async_trait]
impl BoundarySource for FixtureSource {
    async fn load_combined(
        &self,
        registry: &RegionRegistry,
    ) -> Result<Vec<RegionBoundary>, FixtureError> {
        let text = self.read_required(&registry.combined_boundaries).await?;
        let boundaries = parse_boundaries(&text)?;
        log::info!(
            "Loaded {} boundaries from {}",
            boundaries.len(),
            registry.combined_boundaries
        );
        Ok(boundaries)
    }

    async fn load_city(
        &self,
        def: &RegionDef,
    ) -> Result<Option<Vec<RegionBoundary>>, FixtureError> {
        let file = def.boundary_file();
        let Some(text) = self.read_optional(&file).await? else {
            log::info!("No detail boundary file {file}, using combined boundaries");
            return Ok(None);
        };
        let boundaries = parse_boundaries(&text)?;
        log::info!("Loaded {} boundaries for {}", boundaries.len(), def.key);
        Ok(Some(boundaries))
    }
}

#[async_trait]
impl DatasetSource for FixtureSource {
    async fn load_data(&self) -> Result<DataFile, FixtureError> {
        let text = self.read_required(DATA_FILE).await?;
        Ok(DataFile::parse(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use wanbei_map_region::registry::default_registry;

    use super::*;

    const FUYANG_DETAIL: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "颍州区", "adcode": 341202 },
                "geometry": { "type": "Polygon", "coordinates": [[[115.0,32.0],[115.5,32.0],[115.5,33.0],[115.0,33.0],[115.0,32.0]]] }
            }
        ]
    }"#;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wanbei_map_view_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(dir.join("boundaries")).unwrap();
        dir
    }

    #[test]
    fn picks_variant_from_location() {
        assert!(matches!(FixtureSource::new("./public"), FixtureSource::Dir(_)));
        match FixtureSource::new("https://example.com/map/") {
            FixtureSource::Http { base_url, .. } => assert_eq!(base_url, "https://example.com/map"),
            FixtureSource::Dir(_) => panic!("expected an HTTP source"),
        }
        assert_eq!(
            FixtureSource::new("https://example.com/").describe(DATA_FILE),
            "https://example.com/data.json"
        );
    }

    #[tokio::test]
    async fn reads_local_fixtures() {
        let dir = fixture_dir("local");
        std::fs::write(dir.join("boundaries/阜阳市.json"), FUYANG_DETAIL).unwrap();
        std::fs::write(
            dir.join(DATA_FILE),
            r#"{"combined": {"nodes": [{"id": 1, "labels": ["事件"], "properties": {}}]}}"#,
        )
        .unwrap();

        let source = FixtureSource::new(dir.to_str().unwrap());
        let registry = default_registry();

        let fuyang = source
            .load_city(registry.find("阜阳").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fuyang.len(), 1);
        assert_eq!(fuyang[0].key, "颍州");

        let bozhou = source.load_city(registry.find("亳州").unwrap()).await.unwrap();
        assert!(bozhou.is_none());

        let data = source.load_data().await.unwrap();
        assert_eq!(data.combined().events.len(), 1);

        assert!(matches!(
            source.load_combined(&registry).await,
            Err(FixtureError::Conversion { .. })
        ));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn malformed_detail_file_is_an_error() {
        let dir = fixture_dir("malformed");
        std::fs::write(dir.join("boundaries/淮南市.json"), "{ not json").unwrap();

        let source = FixtureSource::new(dir.to_str().unwrap());
        let registry = default_registry();
        let result = source.load_city(registry.find("淮南").unwrap()).await;
        assert!(matches!(result, Err(FixtureError::Region(_))));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
