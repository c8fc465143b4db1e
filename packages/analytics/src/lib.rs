#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event-density analytics over administrative regions.
//!
//! [`aggregate`] partitions events into regions (polygon membership first,
//! region-text matching second) and [`buckets`] maps the resulting counts
//! to the fixed choropleth color scale.

pub mod aggregate;
pub mod buckets;
pub mod target;

pub use aggregate::{aggregate, aggregate_with};
pub use buckets::{classify, classify_count, legend, with_alpha};
pub use target::RegionTarget;
