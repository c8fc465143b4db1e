//! The overview/detail state machine.
//!
//! ```text
//!            click city / show_region_detail
//!   Overview ───────────────────────────────▶ RegionDetail { city }
//!            ◀───────────────────────────────
//!                    back_to_overview
//! ```
//!
//! Entering either mode reloads the boundary set, re-aggregates, re-fits
//! the view and invalidates the previous scene. Loads are tagged with a
//! [`LoadTicket`]; a load finishing after a newer one was started is
//! dropped instead of overwriting the newer state.

use geo::Coord;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use wanbei_map_analytics::{RegionTarget, aggregate_with};
use wanbei_map_analytics_models::{MatchMode, RegionStat, RegionStats};
use wanbei_map_dataset::COMBINED_DATASET;
use wanbei_map_event_models::{EventFilter, EventRecord};
use wanbei_map_geometry::{RingMode, merge_rects};
use wanbei_map_region::boundary::RegionBoundary;
use wanbei_map_region::catalog::BoundaryCatalog;
use wanbei_map_region::index::RegionIndex;
use wanbei_map_region_models::{RegionDef, RegionRegistry};
use wanbei_map_viewport::{Surface, ViewState};

use crate::FixtureError;
use crate::scene::Scene;
use crate::source::{BoundarySource, DatasetSource};

/// Which map is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Display, AsRefStr)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewMode {
    /// All top-level cities.
    #[default]
    Overview,
    /// Districts and counties of one city.
    RegionDetail {
        /// Registry key of the city.
        city: String,
    },
}

/// Identifies one boundary load. Only the most recently issued ticket
/// may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Generation number of this load.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Boundaries fetched for a mode switch.
#[derive(Debug, Clone)]
pub enum LoadedBoundaries {
    /// Combined file for the overview.
    Overview(Vec<RegionBoundary>),
    /// Detail of one city.
    RegionDetail {
        /// Registry key of the city.
        city: String,
        /// Combined file, when the catalog had not been loaded yet.
        combined: Option<Vec<RegionBoundary>>,
        /// Detail file, when one exists.
        detail: Option<Vec<RegionBoundary>>,
    },
}

/// Fetches what [`MapController::apply`] needs for the overview.
///
/// # Errors
///
/// Returns [`FixtureError`] if the combined boundary file cannot be loaded.
pub async fn fetch_overview<S: BoundarySource + ?Sized>(
    source: &S,
    registry: &RegionRegistry,
) -> Result<LoadedBoundaries, FixtureError> {
    Ok(LoadedBoundaries::Overview(
        source.load_combined(registry).await?,
    ))
}

/// Fetches what [`MapController::apply`] needs for one city's detail.
///
/// A missing detail file yields `detail: None`, in which case the
/// combined file's sub-regions are shown.
///
/// # Errors
///
/// Returns [`FixtureError`] if the detail file exists but cannot be
/// loaded, or if `need_combined` is set and the combined boundary file
/// cannot be loaded.
pub async fn fetch_region_detail<S: BoundarySource + ?Sized>(
    source: &S,
    registry: &RegionRegistry,
    def: &RegionDef,
    need_combined: bool,
) -> Result<LoadedBoundaries, FixtureError> {
    let combined = if need_combined {
        Some(source.load_combined(registry).await?)
    } else {
        None
    };

    let detail = source.load_city(def).await?;

    Ok(LoadedBoundaries::RegionDetail {
        city: def.key.clone(),
        combined,
        detail,
    })
}

/// Result of a click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Nothing under the cursor.
    Miss,
    /// An overview click switched to this city's detail.
    EnteredCity(String),
    /// An overview click hit this city but its detail failed to load.
    EnterFailed(String),
    /// A detail click hit this region.
    Region(RegionStat),
}

/// State owner for one interactive map.
pub struct MapController {
    registry: RegionRegistry,
    catalog: BoundaryCatalog,
    events: Vec<EventRecord>,
    filtered: Vec<EventRecord>,
    boundaries: Vec<RegionBoundary>,
    index: RegionIndex,
    stats: RegionStats,
    view: ViewState,
    surface: Surface,
    mode: ViewMode,
    filter: EventFilter,
    ring_mode: RingMode,
    generation: u64,
    hovered: Option<String>,
}

impl MapController {
    /// Creates an empty overview. Nothing is shown until boundaries are
    /// applied.
    #[must_use]
    pub fn new(registry: RegionRegistry, surface: Surface) -> Self {
        let catalog = BoundaryCatalog::build(&registry, Vec::new());
        let mut controller = Self {
            registry,
            catalog,
            events: Vec::new(),
            filtered: Vec::new(),
            boundaries: Vec::new(),
            index: RegionIndex::build(&[]),
            stats: RegionStats {
                mode: MatchMode::Cities,
                regions: Vec::new(),
                unmatched: Vec::new(),
            },
            view: ViewState::default(),
            surface,
            mode: ViewMode::Overview,
            filter: EventFilter::default(),
            ring_mode: RingMode::default(),
            generation: 0,
            hovered: None,
        };
        controller.recompute();
        controller
    }

    /// Switches the point-in-polygon rule used for aggregation and
    /// hit-testing.
    #[must_use]
    pub fn with_ring_mode(mut self, ring_mode: RingMode) -> Self {
        self.ring_mode = ring_mode;
        self.recompute();
        self
    }

    /// Region registry in use.
    #[must_use]
    pub const fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Boundaries grouped by city.
    #[must_use]
    pub const fn catalog(&self) -> &BoundaryCatalog {
        &self.catalog
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &ViewMode {
        &self.mode
    }

    /// Current center and zoom.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Drawing surface size.
    #[must_use]
    pub const fn surface(&self) -> Surface {
        self.surface
    }

    /// Statistics for the boundaries on screen.
    #[must_use]
    pub const fn stats(&self) -> &RegionStats {
        &self.stats
    }

    /// Every loaded event.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Events feeding the current statistics.
    #[must_use]
    pub fn filtered_events(&self) -> &[EventRecord] {
        &self.filtered
    }

    /// Boundaries on screen, in draw order.
    #[must_use]
    pub fn boundaries(&self) -> &[RegionBoundary] {
        &self.boundaries
    }

    /// Active category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.filter.active_category()
    }

    /// Generation of the most recently issued load.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the event set and re-aggregates.
    pub fn set_events(&mut self, events: Vec<EventRecord>) {
        log::debug!("Loaded {} events", events.len());
        self.events = events;
        self.recompute();
    }

    /// Loads a dataset section (`全部` for the combined section). Failures
    /// are logged and leave the current events in place.
    pub async fn load_dataset<S: DatasetSource + ?Sized>(&mut self, source: &S, name: &str) -> bool {
        match source.load_data().await {
            Ok(data) => {
                let dataset = if name.is_empty() {
                    data.select(COMBINED_DATASET)
                } else {
                    data.select(name)
                };
                log::info!(
                    "Loaded dataset {} with {} events",
                    dataset.name,
                    dataset.events.len()
                );
                self.set_events(dataset.events);
                true
            }
            Err(e) => {
                log::error!("Failed to load event data: {e}");
                false
            }
        }
    }

    /// Resizes the drawing surface. The view is not re-fitted.
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// Sets the category filter from a selection (`全部事件` or empty
    /// clears it). Only the detail map is filtered.
    pub fn set_category(&mut self, selection: &str) {
        self.filter = EventFilter::category(selection);
        if matches!(self.mode, ViewMode::RegionDetail { .. }) {
            self.recompute();
        }
    }

    /// Starts a new load, superseding any in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Whether `ticket` is the latest issued.
    #[must_use]
    pub const fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies fetched boundaries if `ticket` is still current.
    ///
    /// Returns `false` when the load was superseded or names an unknown
    /// city; state is untouched in both cases.
    pub fn apply(&mut self, ticket: LoadTicket, loaded: LoadedBoundaries) -> bool {
        if !self.is_current(ticket) {
            log::warn!(
                "Discarding stale boundary load (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match loaded {
            LoadedBoundaries::Overview(boundaries) => {
                self.catalog = BoundaryCatalog::build(&self.registry, boundaries);
                self.enter(ViewMode::Overview);
                true
            }
            LoadedBoundaries::RegionDetail {
                city,
                combined,
                detail,
            } => {
                if self.catalog.city(&city).is_none() {
                    log::error!("Unknown city {city}");
                    return false;
                }
                if let Some(boundaries) = combined {
                    self.catalog = BoundaryCatalog::build(&self.registry, boundaries);
                }
                if let (Some(detail), Some(set)) = (detail, self.catalog.city_mut(&city)) {
                    set.set_sub_regions(detail);
                }
                self.enter(ViewMode::RegionDetail { city });
                true
            }
        }
    }

    /// Loads and shows the six-city overview. Failures are logged and
    /// leave the current state in place.
    pub async fn show_overview<S: BoundarySource + ?Sized>(&mut self, source: &S) -> bool {
        let ticket = self.begin_load();
        match fetch_overview(source, &self.registry).await {
            Ok(loaded) => self.apply(ticket, loaded),
            Err(e) => {
                log::error!("Failed to load overview boundaries: {e}");
                false
            }
        }
    }

    /// Loads and shows one city's detail. `city` may be a key or a name.
    pub async fn show_region_detail<S: BoundarySource + ?Sized>(
        &mut self,
        source: &S,
        city: &str,
    ) -> bool {
        let Some(def) = self.registry.find(city).cloned() else {
            log::error!("Unknown city {city}");
            return false;
        };

        let ticket = self.begin_load();
        let need_combined = self.catalog.is_empty();
        match fetch_region_detail(source, &self.registry, &def, need_combined).await {
            Ok(loaded) => self.apply(ticket, loaded),
            Err(e) => {
                log::error!("Failed to load boundaries for {}: {e}", def.key);
                false
            }
        }
    }

    /// Leaves the detail map.
    pub async fn back_to_overview<S: BoundarySource + ?Sized>(&mut self, source: &S) -> bool {
        self.filter = EventFilter::default();
        self.show_overview(source).await
    }

    /// Pans by a pixel delta.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.view.pan(dx, dy);
    }

    /// Zooms around the cursor.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) {
        self.view.wheel(self.surface, delta_y, x, y);
    }

    /// The on-screen boundary under surface position `(x, y)`.
    #[must_use]
    pub fn region_at(&self, x: f64, y: f64) -> Option<&RegionBoundary> {
        let (lon, lat) = self.view.unproject(self.surface, x, y);
        self.index
            .locate(&self.boundaries, Coord { x: lon, y: lat }, self.ring_mode)
            .map(|idx| &self.boundaries[idx])
    }

    /// Updates the hovered region and returns its statistic.
    pub fn hover(&mut self, x: f64, y: f64) -> Option<&RegionStat> {
        self.hovered = self.region_at(x, y).map(|b| b.key.clone());
        self.hovered()
    }

    /// Statistic of the hovered region.
    #[must_use]
    pub fn hovered(&self) -> Option<&RegionStat> {
        self.hovered.as_deref().and_then(|key| self.stats.get(key))
    }

    /// Handles a click: in the overview, enters the clicked city; in the
    /// detail map, reports the clicked region.
    pub async fn click<S: BoundarySource + ?Sized>(
        &mut self,
        source: &S,
        x: f64,
        y: f64,
    ) -> ClickOutcome {
        let Some(key) = self.region_at(x, y).map(|b| b.key.clone()) else {
            return ClickOutcome::Miss;
        };

        if matches!(self.mode, ViewMode::RegionDetail { .. }) {
            return self
                .stats
                .get(&key)
                .cloned()
                .map_or(ClickOutcome::Miss, ClickOutcome::Region);
        }

        if self.show_region_detail(source, &key).await {
            ClickOutcome::EnteredCity(key)
        } else {
            ClickOutcome::EnterFailed(key)
        }
    }

    /// Describes a full redraw of the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.mode,
            &self.boundaries,
            &self.stats,
            &self.filtered,
            self.view,
            self.surface,
        )
    }

    fn enter(&mut self, mode: ViewMode) {
        log::info!("Entering {mode} view");
        self.mode = mode;
        self.hovered = None;

        self.boundaries = match &self.mode {
            ViewMode::Overview => self.catalog.overview_boundaries().cloned().collect(),
            ViewMode::RegionDetail { city } => self
                .catalog
                .city(city)
                .map(|set| {
                    if set.sub_regions.is_empty() {
                        log::warn!("No sub-regions for {city}, showing the city boundary");
                        set.city.iter().cloned().collect()
                    } else {
                        set.sub_regions.clone()
                    }
                })
                .unwrap_or_default(),
        };
        self.index = RegionIndex::build(&self.boundaries);

        self.recompute();
        let bounds = merge_rects(self.boundaries.iter().map(|b| b.bounds));
        if !self.view.fit_bounds(bounds, self.surface) {
            self.view = ViewState::default();
        }
    }

    /// Rebuilds the filtered event set and the statistics from scratch.
    fn recompute(&mut self) {
        let city_targets = RegionTarget::cities(&self.catalog);

        let (targets, match_mode) = match &self.mode {
            ViewMode::Overview => {
                self.filtered = self.events.clone();
                (city_targets, MatchMode::Cities)
            }
            ViewMode::RegionDetail { city } => {
                // City membership follows the same partition as the overview.
                let by_city =
                    aggregate_with(&self.events, &city_targets, &MatchMode::Cities, self.ring_mode);
                self.filtered = by_city
                    .get(city)
                    .map(|stat| self.filter.apply(&stat.events))
                    .unwrap_or_default();
                let city_target = city_targets.into_iter().find(|t| &t.key == city);

                let sub_targets = self
                    .catalog
                    .city(city)
                    .map(RegionTarget::sub_regions)
                    .unwrap_or_default();
                if sub_targets.is_empty() {
                    (city_target.into_iter().collect::<Vec<_>>(), MatchMode::Cities)
                } else {
                    (
                        sub_targets,
                        MatchMode::SubRegions {
                            parent: city.clone(),
                        },
                    )
                }
            }
        };

        self.stats = aggregate_with(&self.filtered, &targets, &match_mode, self.ring_mode);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use geo::{LineString, MultiPolygon, Polygon};
    use wanbei_map_event_models::GeoPoint;
    use wanbei_map_region::registry::default_registry;
    use wanbei_map_region_models::RegionLevel;

    use super::*;

    fn square(name: &str, adcode: u32, level: RegionLevel, x: f64, width: f64) -> RegionBoundary {
        let ring = LineString::from(vec![
            (x, 32.0),
            (x + width, 32.0),
            (x + width, 33.0),
            (x, 33.0),
        ]);
        RegionBoundary::new(
            name,
            Some(adcode),
            level,
            MultiPolygon(vec![Polygon::new(ring, vec![])]),
        )
        .unwrap()
    }

    #[derive(Default)]
    struct MemorySource {
        combined: Option<Vec<RegionBoundary>>,
        cities: BTreeMap<String, Vec<RegionBoundary>>,
        broken_cities: Vec<String>,
        combined_loads: Mutex<usize>,
    }

    impl MemorySource {
        fn wanbei() -> Self {
            let combined = vec![
                square("阜阳市", 341_200, RegionLevel::City, 115.0, 1.0),
                square("亳州市", 341_600, RegionLevel::City, 116.0, 1.0),
                square("蚌埠市", 340_300, RegionLevel::City, 117.0, 1.0),
            ];
            let mut cities = BTreeMap::new();
            cities.insert(
                "阜阳".to_string(),
                vec![
                    square("颍州区", 341_202, RegionLevel::District, 115.0, 0.5),
                    square("临泉县", 341_221, RegionLevel::County, 115.5, 0.5),
                ],
            );
            Self {
                combined: Some(combined),
                cities,
                broken_cities: Vec::new(),
                combined_loads: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl BoundarySource for MemorySource {
        async fn load_combined(
            &self,
            _registry: &RegionRegistry,
        ) -> Result<Vec<RegionBoundary>, FixtureError> {
            *self.combined_loads.lock().unwrap() += 1;
            self.combined.clone().ok_or_else(|| FixtureError::Conversion {
                message: "offline".to_string(),
            })
        }

        async fn load_city(
            &self,
            def: &RegionDef,
        ) -> Result<Option<Vec<RegionBoundary>>, FixtureError> {
            if self.broken_cities.contains(&def.key) {
                return Err(FixtureError::Conversion {
                    message: format!("malformed detail file for {}", def.key),
                });
            }
            Ok(self.cities.get(&def.key).cloned())
        }
    }

    fn event(id: &str, lng_lat: Option<(f64, f64)>, region: &str, category: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            name: None,
            coordinate: lng_lat.map(|(lng, lat)| GeoPoint { lng, lat }),
            region: (!region.is_empty()).then(|| region.to_string()),
            category: (!category.is_empty()).then(|| category.to_string()),
        }
    }

    fn events() -> Vec<EventRecord> {
        vec![
            event("1", Some((115.2, 32.5)), "", "战役"),
            event("2", Some((115.7, 32.5)), "", "起义"),
            event("3", None, "阜阳市临泉县", "战役"),
            event("4", Some((116.5, 32.5)), "", "战役"),
            event("5", None, "淮南市", ""),
            event("6", None, "", ""),
        ]
    }

    fn controller() -> MapController {
        let mut controller = MapController::new(default_registry(), Surface::new(800.0, 600.0));
        controller.set_events(events());
        controller
    }

    #[test]
    fn starts_empty_with_every_city_at_zero() {
        let controller = MapController::new(default_registry(), Surface::default());
        assert_eq!(controller.mode(), &ViewMode::Overview);
        assert_eq!(controller.stats().regions.len(), 6);
        assert_eq!(controller.stats().matched(), 0);
        assert!(controller.boundaries().is_empty());
        assert_eq!(controller.generation(), 0);
    }

    #[tokio::test]
    async fn overview_aggregates_by_city_and_fits_view() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);

        let stats = controller.stats();
        assert_eq!(stats.count("阜阳"), 3);
        assert_eq!(stats.count("亳州"), 1);
        assert_eq!(stats.count("淮南"), 1);
        assert_eq!(stats.unmatched, ["6"]);
        assert_eq!(controller.boundaries().len(), 3);

        let view = controller.view();
        assert!((view.center_lon - 116.5).abs() < 1e-9);
        assert!((view.center_lat - 32.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn detail_filters_to_city_and_aggregates_sub_regions() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);
        assert!(controller.show_region_detail(&source, "阜阳市").await);

        assert_eq!(
            controller.mode(),
            &ViewMode::RegionDetail {
                city: "阜阳".to_string()
            }
        );
        assert_eq!(controller.filtered_events().len(), 3);
        let stats = controller.stats();
        assert_eq!(stats.count("颍州"), 1);
        assert_eq!(stats.count("临泉"), 2);
        assert_eq!(
            stats.mode,
            MatchMode::SubRegions {
                parent: "阜阳".to_string()
            }
        );
        assert_eq!(*source.combined_loads.lock().unwrap(), 1);

        controller.set_category("战役");
        assert_eq!(controller.category(), Some("战役"));
        assert_eq!(controller.stats().count("颍州"), 1);
        assert_eq!(controller.stats().count("临泉"), 1);

        controller.set_category("全部事件");
        assert_eq!(controller.stats().count("临泉"), 2);
    }

    #[tokio::test]
    async fn detail_without_detail_file_uses_city_boundary() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_region_detail(&source, "亳州").await);

        assert_eq!(controller.boundaries().len(), 1);
        assert_eq!(controller.stats().count("亳州"), 1);
        assert_eq!(*source.combined_loads.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn back_to_overview_clears_category() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_region_detail(&source, "阜阳").await);
        controller.set_category("起义");
        assert!(controller.back_to_overview(&source).await);

        assert_eq!(controller.mode(), &ViewMode::Overview);
        assert_eq!(controller.category(), None);
        assert_eq!(controller.filtered_events().len(), 6);
    }

    #[test]
    fn stale_load_is_discarded() {
        let source = MemorySource::wanbei();
        let combined = source.combined.clone().unwrap();
        let mut controller = controller();

        let slow = controller.begin_load();
        let fast = controller.begin_load();
        assert_eq!(fast.generation(), slow.generation() + 1);

        assert!(controller.apply(fast, LoadedBoundaries::Overview(combined.clone())));
        let applied = controller.stats().clone();

        let stale = LoadedBoundaries::RegionDetail {
            city: "阜阳".to_string(),
            combined: Some(combined),
            detail: None,
        };
        assert!(!controller.apply(slow, stale));
        assert_eq!(controller.mode(), &ViewMode::Overview);
        assert_eq!(controller.stats(), &applied);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_state() {
        let mut controller = controller();
        let offline = MemorySource::default();
        assert!(!controller.show_overview(&offline).await);
        assert!(controller.boundaries().is_empty());

        let source = MemorySource::wanbei();
        assert!(controller.show_overview(&source).await);
        let before = controller.stats().clone();

        assert!(!controller.show_overview(&offline).await);
        assert_eq!(controller.stats(), &before);
        assert_eq!(controller.boundaries().len(), 3);
    }

    #[tokio::test]
    async fn unknown_city_is_rejected() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(!controller.show_region_detail(&source, "合肥").await);
        assert_eq!(controller.generation(), 0);
    }

    #[tokio::test]
    async fn hover_and_click() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);

        let surface = controller.surface();
        let (x, y) = controller.view().project(surface, 116.5, 32.5);
        assert_eq!(controller.hover(x, y).map(|s| s.key.as_str()), Some("亳州"));
        assert!(controller.hover(1.0, 1.0).is_none());

        let (x, y) = controller.view().project(surface, 115.5, 32.5);
        assert_eq!(
            controller.click(&source, x, y).await,
            ClickOutcome::EnteredCity("阜阳".to_string())
        );

        let (x, y) = controller.view().project(surface, 115.75, 32.5);
        match controller.click(&source, x, y).await {
            ClickOutcome::Region(stat) => {
                assert_eq!(stat.key, "临泉");
                assert_eq!(stat.count, 2);
            }
            other => panic!("unexpected click outcome {other:?}"),
        }
        assert_eq!(controller.click(&source, 1.0, 1.0).await, ClickOutcome::Miss);
    }

    #[tokio::test]
    async fn drag_and_wheel_move_the_view() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);
        let fitted = *controller.view();

        controller.drag(50.0, 0.0);
        assert!(controller.view().center_lon < fitted.center_lon);

        controller.wheel(-1.0, 400.0, 300.0);
        assert!(controller.view().zoom > fitted.zoom);
    }

    #[tokio::test]
    async fn polygon_match_decides_city_before_region_text() {
        let source = MemorySource::wanbei();
        let mut controller = MapController::new(default_registry(), Surface::default());
        controller.set_events(vec![
            event("in-bozhou", Some((116.5, 32.5)), "阜阳市", ""),
            event("off-map", Some((120.0, 30.0)), "阜阳市", ""),
        ]);
        assert!(controller.show_overview(&source).await);
        assert_eq!(controller.stats().count("阜阳"), 1);
        assert_eq!(controller.stats().count("亳州"), 1);

        assert!(controller.show_region_detail(&source, "阜阳").await);
        let ids: Vec<&str> = controller
            .filtered_events()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["off-map"]);

        assert!(controller.show_region_detail(&source, "亳州").await);
        let ids: Vec<&str> = controller
            .filtered_events()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["in-bozhou"]);
        assert_eq!(controller.stats().count("亳州"), 1);
    }

    #[tokio::test]
    async fn broken_detail_file_keeps_previous_state() {
        let mut source = MemorySource::wanbei();
        source.broken_cities.push("阜阳".to_string());
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);
        let stats = controller.stats().clone();
        let view = *controller.view();

        assert!(!controller.show_region_detail(&source, "阜阳").await);
        assert_eq!(controller.mode(), &ViewMode::Overview);
        assert_eq!(controller.boundaries().len(), 3);
        assert_eq!(controller.stats(), &stats);
        assert_eq!(controller.view(), &view);
    }

    #[tokio::test]
    async fn view_resets_when_nothing_can_be_fitted() {
        let source = MemorySource::wanbei();
        let mut controller = controller();
        assert!(controller.show_overview(&source).await);
        controller.drag(120.0, -40.0);
        controller.wheel(-1.0, 10.0, 10.0);

        assert!(controller.show_region_detail(&source, "淮南").await);
        assert!(controller.boundaries().is_empty());
        assert_eq!(controller.view(), &ViewState::default());
        assert_eq!(controller.stats().count("淮南"), 1);
    }
}
