#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region registry, boundary catalog and spatial hit-testing.
//!
//! The registry names the top-level cities (embedded TOML, overridable at
//! runtime). Boundary files are standard `GeoJSON` `FeatureCollection`s;
//! [`boundary`] turns their features into [`boundary::RegionBoundary`]
//! values, [`catalog`] groups them per city, and [`index`] answers "which
//! region is under this point" for pointer interaction.

pub mod boundary;
pub mod catalog;
pub mod index;
pub mod registry;

use thiserror::Error;

/// Errors that can occur while loading regions and boundaries.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Reading a registry or boundary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Registry TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Data conversion or validation error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
