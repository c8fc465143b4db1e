//! Groups parsed boundaries into per-city sets.
//!
//! The combined boundary file mixes city outlines with (sometimes) their
//! districts and counties. Each feature is assigned to a registry city by
//! adcode, falling back to its name. Within a city the first city-level
//! feature becomes the overview boundary; everything else is a sub-region
//! shown on the detail map.

use geo::{Polygon, Rect};
use wanbei_map_geometry::{merge_rects, outline};
use wanbei_map_region_models::{RegionDef, RegionLevel, RegionRegistry};

use crate::boundary::RegionBoundary;

/// Boundaries belonging to one top-level city.
#[derive(Debug, Clone)]
pub struct CityBoundarySet {
    /// Registry entry for this city.
    pub def: RegionDef,
    /// The city's own boundary, used on the overview map.
    pub city: Option<RegionBoundary>,
    /// Districts and counties, used on the detail map.
    pub sub_regions: Vec<RegionBoundary>,
    /// Bounding box over every feature of the city.
    pub bounds: Option<Rect<f64>>,
    /// Box-shaped stand-in for the union of all features (see
    /// [`wanbei_map_geometry::outline`]).
    pub outline: Option<Polygon<f64>>,
}

impl CityBoundarySet {
    fn new(def: RegionDef) -> Self {
        Self {
            def,
            city: None,
            sub_regions: Vec::new(),
            bounds: None,
            outline: None,
        }
    }

    /// Replaces the sub-regions, typically with the contents of a per-city
    /// detail file. City-level features in `boundaries` are ignored.
    pub fn set_sub_regions(&mut self, boundaries: Vec<RegionBoundary>) {
        self.sub_regions = boundaries
            .into_iter()
            .filter(|b| !b.level.is_top_level() && !b.is_city_boundary)
            .collect();
        self.refresh_bounds();
    }

    /// Whether the set has any geometry at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.sub_regions.is_empty()
    }

    fn all(&self) -> impl Iterator<Item = &RegionBoundary> {
        self.city.iter().chain(self.sub_regions.iter())
    }

    fn refresh_bounds(&mut self) {
        self.bounds = merge_rects(self.all().map(|b| b.bounds));
        self.outline = self.bounds.map(outline);
    }

    /// Promotes a boundary to this city's overview boundary, giving it the
    /// registry's key and name.
    fn adopt_city(&mut self, mut boundary: RegionBoundary) {
        boundary.key.clone_from(&self.def.key);
        boundary.name.clone_from(&self.def.full_name);
        boundary.level = RegionLevel::City;
        boundary.is_city_boundary = true;
        self.city = Some(boundary);
    }
}

/// All boundaries of the mapped area, in registry order.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCatalog {
    cities: Vec<CityBoundarySet>,
}

impl BoundaryCatalog {
    /// Builds a catalog from a registry and the parsed combined file.
    ///
    /// Features that cannot be attributed to any registry city are
    /// skipped with a warning. A city without an explicit city-level
    /// feature uses its first feature as the overview boundary.
    #[must_use]
    pub fn build(registry: &RegionRegistry, boundaries: Vec<RegionBoundary>) -> Self {
        let mut cities: Vec<CityBoundarySet> = registry
            .regions
            .iter()
            .cloned()
            .map(CityBoundarySet::new)
            .collect();

        for boundary in boundaries {
            let Some(idx) = owning_city(registry, &boundary) else {
                log::warn!("Unrecognized city boundary: {}", boundary.name);
                continue;
            };
            let set = &mut cities[idx];

            let is_city = set.city.is_none()
                && (boundary.is_city_boundary
                    || boundary.level.is_top_level()
                    || boundary.name == set.def.full_name);

            if is_city {
                log::debug!("City boundary for {}: {}", set.def.key, boundary.name);
                set.adopt_city(boundary);
            } else {
                set.sub_regions.push(boundary);
            }
        }

        for set in &mut cities {
            if set.city.is_none() && !set.sub_regions.is_empty() {
                let first = set.sub_regions.remove(0);
                log::warn!(
                    "No city-level boundary for {}, using first feature {}",
                    set.def.key,
                    first.name
                );
                set.adopt_city(first);
            }
            set.refresh_bounds();
            if set.is_empty() {
                log::warn!("No boundaries loaded for {}", set.def.key);
            }
        }

        Self { cities }
    }

    /// City sets in registry order.
    #[must_use]
    pub fn cities(&self) -> &[CityBoundarySet] {
        &self.cities
    }

    /// Looks up a city set by key.
    #[must_use]
    pub fn city(&self, key: &str) -> Option<&CityBoundarySet> {
        self.cities.iter().find(|c| c.def.key == key)
    }

    /// Mutable lookup by key.
    pub fn city_mut(&mut self, key: &str) -> Option<&mut CityBoundarySet> {
        self.cities.iter_mut().find(|c| c.def.key == key)
    }

    /// Overview boundaries (one per city that has geometry).
    pub fn overview_boundaries(&self) -> impl Iterator<Item = &RegionBoundary> {
        self.cities.iter().filter_map(|c| c.city.as_ref())
    }

    /// Whether no city has any geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.iter().all(CityBoundarySet::is_empty)
    }
}

fn owning_city(registry: &RegionRegistry, boundary: &RegionBoundary) -> Option<usize> {
    if let Some(def) = boundary.adcode.and_then(|a| registry.find_by_adcode(a)) {
        return registry.regions.iter().position(|r| r.key == def.key);
    }

    registry.regions.iter().position(|r| {
        boundary.name == r.full_name
            || boundary.name == r.name
            || boundary.name.starts_with(&r.full_name)
    })
}
