//! Renderer-neutral description of one full redraw.
//!
//! Every state change produces a complete [`Scene`]; there is no partial
//! update. Coordinates are surface pixels with the origin at the top left.

use serde::Serialize;
use wanbei_map_analytics::buckets::{DETAIL_ALPHA, OVERVIEW_ALPHA};
use wanbei_map_analytics::{classify_count, legend, with_alpha};
use wanbei_map_analytics_models::{Bucket, RegionStats};
use wanbei_map_event_models::EventRecord;
use wanbei_map_geometry::vertex_centroid;
use wanbei_map_region::boundary::RegionBoundary;
use wanbei_map_region_models::RegionLevel;
use wanbei_map_viewport::{Surface, ViewState};

use crate::controller::ViewMode;

const CITY_STROKE: Stroke = Stroke {
    color: "#1e40af",
    width: 2.0,
};
const DETAIL_CITY_STROKE: Stroke = Stroke {
    color: "#1e40af",
    width: 1.5,
};
const SUB_REGION_STROKE: Stroke = Stroke {
    color: "#666",
    width: 1.0,
};

const EVENT_COLOR: &str = "#ff0000";
const EVENT_RADIUS: f64 = 4.0;

/// Outline style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    /// CSS color.
    pub color: &'static str,
    /// Line width in pixels.
    pub width: f64,
}

/// One filled, labelled region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRegion {
    /// Statistic key.
    pub key: String,
    /// Label text, e.g. `"阜阳市 12件"`.
    pub label: String,
    /// Label anchor: the projected vertex mean of the region.
    pub label_position: Option<[f64; 2]>,
    /// Event count.
    pub count: usize,
    /// Fill color with alpha (`#RRGGBBAA`).
    pub fill: String,
    /// Outline style.
    pub stroke: Stroke,
    /// Projected outer rings, one per polygon.
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// One event marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEvent {
    /// Event id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Projected position.
    pub position: [f64; 2],
    /// Marker radius in pixels.
    pub radius: f64,
    /// Marker color.
    pub color: &'static str,
}

/// Everything needed to draw the map once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Mode the scene was built in.
    pub mode: ViewMode,
    /// Surface size.
    pub surface: Surface,
    /// View used for projection.
    pub view: ViewState,
    /// Regions in draw order.
    pub regions: Vec<SceneRegion>,
    /// Event markers, drawn above regions.
    pub events: Vec<SceneEvent>,
    /// Color legend.
    pub legend: Vec<Bucket>,
}

impl Scene {
    /// Projects boundaries and events through `view`.
    #[must_use]
    pub fn build(
        mode: &ViewMode,
        boundaries: &[RegionBoundary],
        stats: &RegionStats,
        events: &[EventRecord],
        view: ViewState,
        surface: Surface,
    ) -> Self {
        let overview = matches!(mode, ViewMode::Overview);
        let project = |x: f64, y: f64| {
            let (px, py) = view.project(surface, x, y);
            [px, py]
        };

        let regions = boundaries
            .iter()
            .map(|boundary| {
                let (label, count) = stats.get(&boundary.key).map_or_else(
                    || (format!("{} 0件", boundary.name), 0),
                    |stat| (stat.label(), stat.count),
                );

                let alpha = if overview { OVERVIEW_ALPHA } else { DETAIL_ALPHA };
                let stroke = match (overview, boundary.level) {
                    (true, _) => CITY_STROKE,
                    (false, RegionLevel::City) => DETAIL_CITY_STROKE,
                    (false, RegionLevel::District | RegionLevel::County) => SUB_REGION_STROKE,
                };

                let rings = boundary
                    .geometry
                    .iter()
                    .map(|polygon| {
                        polygon
                            .exterior()
                            .coords()
                            .map(|c| project(c.x, c.y))
                            .collect()
                    })
                    .collect();

                SceneRegion {
                    key: boundary.key.clone(),
                    label,
                    label_position: vertex_centroid(&boundary.geometry).map(|c| project(c.x, c.y)),
                    count,
                    fill: with_alpha(classify_count(count).color, alpha),
                    stroke,
                    rings,
                }
            })
            .collect();

        let events = events
            .iter()
            .filter_map(|event| {
                let point = event.coordinate?;
                Some(SceneEvent {
                    id: event.id.clone(),
                    name: event.display_name().to_string(),
                    position: project(point.lng, point.lat),
                    radius: EVENT_RADIUS,
                    color: EVENT_COLOR,
                })
            })
            .collect();

        Self {
            mode: mode.clone(),
            surface,
            view,
            regions,
            events,
            legend: legend().to_vec(),
        }
    }
}
