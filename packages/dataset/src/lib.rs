#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for the static `data.json` fixture.
//!
//! The fixture has a required `combined` section and an optional list of
//! per-source `datasets`, each shaped like:
//!
//! ```json
//! {
//!   "dataset": "name",
//!   "summary": { "events": 1, "persons": 0, "total_nodes": 1, ... },
//!   "nodes": [{ "id": 1, "labels": ["事件"], "properties": { ... } }],
//!   "relationships": [],
//!   "events": [], "persons": [], "locations": [], "times": []
//! }
//! ```
//!
//! Typed arrays are optional. When they are absent or empty, nodes are
//! classified by their labels instead.

pub mod parsing;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use wanbei_map_event_models::{DatasetSummary, EventRecord};

/// Dataset selection meaning "the combined section".
pub const COMBINED_DATASET: &str = "全部";

const EVENT_LABEL: &str = "事件";
const PERSON_LABEL: &str = "人物";
const LOCATION_LABEL: &str = "地点";
const TIME_LABEL: &str = "时间";

/// Errors that can occur while loading the fixture.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The fixture is structurally unusable.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// One graph node as stored in the fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    /// Identifier (number or string).
    #[serde(default)]
    pub id: Value,
    /// Node labels (e.g. `["事件"]`).
    #[serde(default)]
    pub labels: Vec<String>,
    /// Free-form properties.
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

impl Node {
    /// Whether any label contains `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.contains(label))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawSummary {
    events: Option<u64>,
    persons: Option<u64>,
    locations: Option<u64>,
    times: Option<u64>,
    total_nodes: Option<u64>,
    total_relationships: Option<u64>,
}

/// A `combined` or per-source section of the fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    /// Source name; absent on the combined section.
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    summary: Option<RawSummary>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    relationships: Vec<Value>,
    #[serde(default)]
    events: Option<Vec<Node>>,
    #[serde(default)]
    persons: Option<Vec<Node>>,
    #[serde(default)]
    locations: Option<Vec<Node>>,
    #[serde(default)]
    times: Option<Vec<Node>>,
}

impl Section {
    /// Event nodes: the `events` array, or nodes labelled as events.
    fn event_nodes(&self) -> Vec<&Node> {
        match self.events.as_deref() {
            Some(events) if !events.is_empty() => events.iter().collect(),
            _ => {
                log::debug!("No events array, filtering nodes by label");
                self.labelled(EVENT_LABEL).collect()
            }
        }
    }

    fn labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes.iter().filter(move |n| n.has_label(label))
    }

    fn count(&self, array: Option<&Vec<Node>>, label: &str) -> u64 {
        let len = match array {
            Some(nodes) if !nodes.is_empty() => nodes.len(),
            _ => self.labelled(label).count(),
        };
        len as u64
    }

    /// Normalized events, in fixture order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.event_nodes()
            .into_iter()
            .enumerate()
            .map(|(position, node)| parsing::node_to_event(node, position))
            .collect()
    }

    /// Headline counts. Explicit `summary` values win; missing ones are
    /// counted from the arrays, falling back to node labels.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        let raw = self.summary.clone().unwrap_or_default();
        DatasetSummary {
            events: raw
                .events
                .unwrap_or_else(|| self.count(self.events.as_ref(), EVENT_LABEL)),
            persons: raw
                .persons
                .unwrap_or_else(|| self.count(self.persons.as_ref(), PERSON_LABEL)),
            locations: raw
                .locations
                .unwrap_or_else(|| self.count(self.locations.as_ref(), LOCATION_LABEL)),
            times: raw
                .times
                .unwrap_or_else(|| self.count(self.times.as_ref(), TIME_LABEL)),
            total_nodes: raw.total_nodes.unwrap_or(self.nodes.len() as u64),
            total_relationships: raw
                .total_relationships
                .unwrap_or(self.relationships.len() as u64),
        }
    }
}

/// A selected section, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Section name ([`COMBINED_DATASET`] for the combined section).
    pub name: String,
    /// Events in fixture order.
    pub events: Vec<EventRecord>,
    /// Headline counts.
    pub summary: DatasetSummary,
}

impl Dataset {
    fn from_section(name: &str, section: &Section) -> Self {
        Self {
            name: name.to_string(),
            events: section.events(),
            summary: section.summary(),
        }
    }
}

/// The parsed `data.json` document.
#[derive(Debug, Clone)]
pub struct DataFile {
    combined: Section,
    datasets: Vec<Section>,
}

#[derive(Deserialize)]
struct RawDataFile {
    combined: Option<Section>,
    #[serde(default)]
    datasets: Vec<Section>,
}

impl DataFile {
    /// Parses the fixture text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] on malformed JSON and
    /// [`DatasetError::Conversion`] if the `combined` section is missing.
    pub fn parse(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataFile = serde_json::from_str(json)?;
        let combined = raw.combined.ok_or_else(|| DatasetError::Conversion {
            message: "data.json has no 'combined' section".to_string(),
        })?;

        log::debug!(
            "Parsed data file: {} combined nodes, {} datasets",
            combined.nodes.len(),
            raw.datasets.len()
        );

        Ok(Self {
            combined,
            datasets: raw.datasets,
        })
    }

    /// Names of the per-source datasets, in fixture order.
    #[must_use]
    pub fn dataset_names(&self) -> Vec<&str> {
        self.datasets
            .iter()
            .filter_map(|d| d.dataset.as_deref())
            .collect()
    }

    /// The combined section.
    #[must_use]
    pub fn combined(&self) -> Dataset {
        Dataset::from_section(COMBINED_DATASET, &self.combined)
    }

    /// Selects a section by name. [`COMBINED_DATASET`] and unknown names
    /// select the combined section.
    #[must_use]
    pub fn select(&self, name: &str) -> Dataset {
        if name == COMBINED_DATASET {
            return self.combined();
        }
        self.datasets
            .iter()
            .find(|d| d.dataset.as_deref() == Some(name))
            .map_or_else(
                || {
                    log::warn!("Unknown dataset {name}, using combined data");
                    self.combined()
                },
                |section| Dataset::from_section(name, section),
            )
    }
}
