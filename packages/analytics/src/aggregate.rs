//! Partitioning events into regions.
//!
//! Matching runs in two tiers. An event with a coordinate is tested
//! against each target's polygons in order and the first containing target
//! wins. Events without a coordinate, or whose coordinate lies outside
//! every polygon, fall back to substring matching of their region text.
//! Each event lands in at most one region.

use geo::Coord;
use wanbei_map_analytics_models::{MatchMode, RegionStat, RegionStats};
use wanbei_map_event_models::EventRecord;
use wanbei_map_geometry::RingMode;

use crate::target::RegionTarget;

/// Aggregates with the default outer-ring-only membership test.
#[must_use]
pub fn aggregate(events: &[EventRecord], targets: &[RegionTarget], mode: &MatchMode) -> RegionStats {
    aggregate_with(events, targets, mode, RingMode::default())
}

/// Aggregates `events` into `targets`.
///
/// Every target appears in the output, in order, even with no matches.
/// Events matching no target are listed in [`RegionStats::unmatched`].
#[must_use]
pub fn aggregate_with(
    events: &[EventRecord],
    targets: &[RegionTarget],
    mode: &MatchMode,
    ring_mode: RingMode,
) -> RegionStats {
    let mut regions: Vec<RegionStat> = targets
        .iter()
        .map(|t| RegionStat::new(&t.key, &t.name, &t.full_name, t.level))
        .collect();
    let mut unmatched = Vec::new();

    for event in events {
        if let Some(idx) = match_event(event, targets, mode, ring_mode) {
            regions[idx].push(event.clone());
        } else {
            log::trace!("Event {} matched no region", event.id);
            unmatched.push(event.id.clone());
        }
    }

    log::debug!(
        "Aggregated {} events into {} regions ({mode}), {} unmatched",
        events.len(),
        regions.len(),
        unmatched.len()
    );

    RegionStats {
        mode: mode.clone(),
        regions,
        unmatched,
    }
}

fn match_event(
    event: &EventRecord,
    targets: &[RegionTarget],
    mode: &MatchMode,
    ring_mode: RingMode,
) -> Option<usize> {
    if let Some(point) = event.coordinate {
        let coord = Coord {
            x: point.lng,
            y: point.lat,
        };
        if let Some(idx) = targets.iter().position(|t| t.contains(coord, ring_mode)) {
            return Some(idx);
        }
    }

    let text = match_text(event.region_text(), mode);
    targets.iter().position(|t| t.matches_text(&text))
}

/// Region text used for tier (b). In sub-region mode the parent city's
/// key is blanked out so it cannot match a sub-region sharing its name.
fn match_text(region: &str, mode: &MatchMode) -> String {
    match mode {
        MatchMode::Cities => region.trim().to_string(),
        MatchMode::SubRegions { parent } if !parent.is_empty() => {
            region.trim().replace(parent.as_str(), " ").trim().to_string()
        }
        MatchMode::SubRegions { .. } => region.trim().to_string(),
    }
}
