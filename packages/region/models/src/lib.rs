#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region definition types.
//!
//! Regions come in two tiers: prefecture-level cities shown on the
//! overview map, and the districts/counties inside one city shown on the
//! detail map. Chinese administrative division codes (`adcode`) encode
//! the tier: `PPCC00` is a city, `PPCCxx` one of its sub-regions.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative level of a region.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegionLevel {
    /// Prefecture-level city (`市`).
    City,
    /// Urban district (`区`).
    District,
    /// County or county-level city (`县`).
    County,
}

impl RegionLevel {
    /// Classifies a six-digit administrative division code.
    ///
    /// `xxxx00` (but not `xx0000`) is a city; sub-codes `01`-`20` are
    /// districts and everything above is a county or county-level city.
    /// Province codes yield `None`.
    #[must_use]
    pub const fn from_adcode(adcode: u32) -> Option<Self> {
        if adcode % 10_000 == 0 {
            return None;
        }
        match adcode % 100 {
            0 => Some(Self::City),
            1..=20 => Some(Self::District),
            _ => Some(Self::County),
        }
    }

    /// Classifies a region by the suffix of its display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.ends_with('市') {
            Some(Self::City)
        } else if name.ends_with('区') {
            Some(Self::District)
        } else if name.ends_with('县') {
            Some(Self::County)
        } else {
            None
        }
    }

    /// Parses the loose `level`/`type`/`级别` property values found in
    /// boundary files (`"city"`, `"district"`, `"county"`, `"市"`, ...).
    #[must_use]
    pub fn from_property(value: &str) -> Option<Self> {
        match value.trim() {
            "市" => Some(Self::City),
            "区" => Some(Self::District),
            "县" => Some(Self::County),
            other => other.parse().ok(),
        }
    }

    /// Whether this is a top-level (overview) region.
    #[must_use]
    pub const fn is_top_level(self) -> bool {
        matches!(self, Self::City)
    }
}

/// The parent city code of any city or sub-region code.
#[must_use]
pub const fn parent_adcode(adcode: u32) -> u32 {
    adcode / 100 * 100
}

/// Normalizes a region name into its matching key.
///
/// The first `市`, `县` and `区` are each removed once, in that order, so
/// `"阜阳市"` becomes `"阜阳"` and `"颍州区"` becomes `"颍州"`.
#[must_use]
pub fn normalize_region_name(name: &str) -> String {
    let mut key = name.trim().to_string();
    for suffix in ['市', '县', '区'] {
        if let Some(idx) = key.find(suffix) {
            key.replace_range(idx..idx + suffix.len_utf8(), "");
        }
    }
    key
}

/// A configured top-level region, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    /// Short matching key (e.g. `"阜阳"`).
    pub key: String,
    /// Display name (e.g. `"阜阳市"`).
    pub name: String,
    /// Full display name used in labels and for name matching.
    pub full_name: String,
    /// Six-digit administrative division code, when known.
    #[serde(default)]
    pub adcode: Option<u32>,
    /// Per-city detail boundary file, relative to the boundary base.
    #[serde(default)]
    pub boundary_file: Option<String>,
}

impl RegionDef {
    /// Returns the short matching key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Detail boundary file for this city, defaulting to
    /// `boundaries/<full_name>.json`.
    #[must_use]
    pub fn boundary_file(&self) -> String {
        self.boundary_file
            .clone()
            .unwrap_or_else(|| format!("boundaries/{}.json", self.full_name))
    }

    /// Whether a free-text region field mentions this region by key or
    /// full name.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        !text.is_empty() && (text.contains(&self.key) || text.contains(&self.full_name))
    }
}

/// Top-level shape of a region registry TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRegistry {
    /// Human-readable name of the mapped area.
    pub name: String,
    /// Combined boundary file holding every top-level region.
    pub combined_boundaries: String,
    /// Ordered top-level regions. Order is the aggregation priority.
    pub regions: Vec<RegionDef>,
}

impl RegionRegistry {
    /// Looks up a region by key, display name or full name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RegionDef> {
        let name = name.trim();
        self.regions
            .iter()
            .find(|r| r.key == name || r.name == name || r.full_name == name)
    }

    /// Looks up the region owning a city or sub-region adcode.
    #[must_use]
    pub fn find_by_adcode(&self, adcode: u32) -> Option<&RegionDef> {
        let parent = parent_adcode(adcode);
        self.regions.iter().find(|r| r.adcode == Some(parent))
    }
}
