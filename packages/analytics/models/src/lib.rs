#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for region aggregation and density classification.
//!
//! [`RegionStats`] is rebuilt from scratch on every recomputation and
//! keeps every configured region present, in configured order, so that
//! renderers can iterate it without checking for gaps.

use serde::Serialize;
use strum_macros::Display;
use wanbei_map_event_models::EventRecord;
use wanbei_map_region_models::RegionLevel;

/// Which partition an aggregation produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchMode {
    /// Top-level cities (overview map).
    Cities,
    /// Districts and counties of one city (detail map).
    SubRegions {
        /// Key of the parent city.
        parent: String,
    },
}

/// Events attributed to one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStat {
    /// Normalized matching key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Full display name used in labels.
    pub full_name: String,
    /// Administrative level.
    pub level: RegionLevel,
    /// Number of matched events.
    pub count: usize,
    /// Matched events, in input order.
    pub events: Vec<EventRecord>,
}

impl RegionStat {
    /// An empty statistic.
    #[must_use]
    pub fn new(key: &str, name: &str, full_name: &str, level: RegionLevel) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            full_name: full_name.to_string(),
            level,
            count: 0,
            events: Vec::new(),
        }
    }

    /// Records a matched event.
    pub fn push(&mut self, event: EventRecord) {
        self.count += 1;
        self.events.push(event);
    }

    /// Map label text, e.g. `"阜阳市 12件"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}件", self.full_name, self.count)
    }
}

/// The output of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    /// Partition that produced these statistics.
    pub mode: MatchMode,
    /// One entry per configured region, in configured order.
    pub regions: Vec<RegionStat>,
    /// Ids of events that matched no region.
    pub unmatched: Vec<String>,
}

impl RegionStats {
    /// Looks up a region by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RegionStat> {
        self.regions.iter().find(|r| r.key == key)
    }

    /// Count for `key`, zero for unknown keys.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.get(key).map_or(0, |r| r.count)
    }

    /// Total number of matched events.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.regions.iter().map(|r| r.count).sum()
    }

    /// Iterates statistics in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionStat> {
        self.regions.iter()
    }
}

/// One density class: a half-open count range with a fill color and a
/// legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Inclusive lower bound.
    pub min: u64,
    /// Exclusive upper bound; `None` for the open-ended top bucket.
    pub max: Option<u64>,
    /// `#RRGGBB` fill color.
    pub color: &'static str,
    /// Legend label.
    pub label: &'static str,
}

impl Bucket {
    /// Whether `count` falls in `[min, max)`.
    #[must_use]
    pub fn contains(&self, count: u64) -> bool {
        count >= self.min && self.max.is_none_or(|max| count < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_label_and_push() {
        let mut stat = RegionStat::new("阜阳", "阜阳市", "阜阳市", RegionLevel::City);
        assert_eq!(stat.label(), "阜阳市 0件");

        stat.push(EventRecord {
            id: "1".to_string(),
            name: None,
            coordinate: None,
            region: None,
            category: None,
        });
        assert_eq!(stat.count, 1);
        assert_eq!(stat.label(), "阜阳市 1件");
    }

    #[test]
    fn bucket_range_is_half_open() {
        let bucket = Bucket {
            min: 30,
            max: Some(60),
            color: "#9370DB",
            label: "30-60件",
        };
        assert!(!bucket.contains(29));
        assert!(bucket.contains(30));
        assert!(bucket.contains(59));
        assert!(!bucket.contains(60));

        let top = Bucket {
            min: 150,
            max: None,
            color: "#FFD700",
            label: "150件以上",
        };
        assert!(top.contains(u64::MAX));
    }

    #[test]
    fn match_mode_display() {
        assert_eq!(MatchMode::Cities.to_string(), "cities");
        assert_eq!(
            MatchMode::SubRegions {
                parent: "阜阳".to_string()
            }
            .to_string(),
            "sub_regions"
        );
    }
}
