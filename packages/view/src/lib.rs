#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive map state.
//!
//! [`controller::MapController`] owns everything one map view needs: the
//! loaded events, the boundaries currently on screen, the aggregated
//! statistics and the pan/zoom state. It switches between the six-city
//! overview and a single city's district/county detail, loading boundary
//! fixtures through a [`source::BoundarySource`]. Every state change can
//! be rendered as a [`scene::Scene`].

pub mod controller;
pub mod scene;
pub mod source;

use thiserror::Error;
use wanbei_map_dataset::DatasetError;
use wanbei_map_region::RegionError;

/// Errors that can occur while loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Reading a local fixture failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote fixture failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A boundary file or registry could not be parsed.
    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    /// The data file could not be parsed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Missing fixture or unexpected response.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
