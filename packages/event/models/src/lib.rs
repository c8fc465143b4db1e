#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared event types.
//!
//! An [`EventRecord`] is the normalized form of one event node from the
//! static `data.json` fixture. Records are loaded once and never mutated;
//! filtering produces new subsets.

use serde::{Deserialize, Serialize};

/// Category selection that disables the category filter.
pub const ALL_CATEGORIES: &str = "全部事件";

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

/// A single historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Node identifier from the fixture.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Geographic position, when the fixture carries a usable one.
    pub coordinate: Option<GeoPoint>,
    /// Free-text region field (e.g. `"安徽省阜阳市颍州区"`).
    pub region: Option<String>,
    /// Event type tag.
    pub category: Option<String>,
}

impl EventRecord {
    /// Region text, or the empty string.
    #[must_use]
    pub fn region_text(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }

    /// Display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Category filter applied in region-detail mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    category: Option<String>,
}

impl EventFilter {
    /// Builds a filter from a category selection. An empty selection or
    /// [`ALL_CATEGORIES`] yields a filter that accepts everything.
    #[must_use]
    pub fn category(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() || selection == ALL_CATEGORIES {
            Self::default()
        } else {
            Self {
                category: Some(selection.to_string()),
            }
        }
    }

    /// The active category, if any.
    #[must_use]
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the event passes. Categories match by substring.
    #[must_use]
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.category.as_deref().is_none_or(|wanted| {
            event
                .category
                .as_deref()
                .is_some_and(|category| category.contains(wanted))
        })
    }

    /// Returns the matching subset, preserving order.
    #[must_use]
    pub fn apply(&self, events: &[EventRecord]) -> Vec<EventRecord> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Headline counts for a dataset section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Event nodes.
    pub events: u64,
    /// Person nodes.
    pub persons: u64,
    /// Location nodes.
    pub locations: u64,
    /// Time nodes.
    pub times: u64,
    /// All nodes.
    pub total_nodes: u64,
    /// All relationships.
    pub total_relationships: u64,
}
