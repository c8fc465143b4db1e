//! Aggregation targets: the regions events are partitioned into.

use geo::{Coord, MultiPolygon};
use wanbei_map_geometry::{RingMode, multi_polygon_contains};
use wanbei_map_region::catalog::{BoundaryCatalog, CityBoundarySet};
use wanbei_map_region_models::RegionLevel;

/// A named region with zero or more polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTarget {
    /// Normalized matching key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Full display name.
    pub full_name: String,
    /// Administrative level.
    pub level: RegionLevel,
    /// Polygons tested in tier (a). Empty targets match by text only.
    pub polygons: Vec<MultiPolygon<f64>>,
}

impl RegionTarget {
    /// One target per registry city, in registry order.
    ///
    /// Each city is tested against its own boundary when one was loaded,
    /// otherwise against its box outline. Cities without geometry still
    /// get a target so that they match by text and appear in the output.
    #[must_use]
    pub fn cities(catalog: &BoundaryCatalog) -> Vec<Self> {
        catalog
            .cities()
            .iter()
            .map(|set| {
                let polygons: Vec<MultiPolygon<f64>> = set.city.as_ref().map_or_else(
                    || {
                        set.outline
                            .iter()
                            .map(|outline| MultiPolygon(vec![outline.clone()]))
                            .collect()
                    },
                    |city| vec![city.geometry.clone()],
                );
                Self {
                    key: set.def.key.clone(),
                    name: set.def.name.clone(),
                    full_name: set.def.full_name.clone(),
                    level: RegionLevel::City,
                    polygons,
                }
            })
            .collect()
    }

    /// One target per distinct sub-region key of a city, in file order.
    /// Features sharing a key are merged into one target.
    #[must_use]
    pub fn sub_regions(set: &CityBoundarySet) -> Vec<Self> {
        let mut targets: Vec<Self> = Vec::new();
        for boundary in &set.sub_regions {
            if let Some(existing) = targets.iter_mut().find(|t| t.key == boundary.key) {
                existing.polygons.push(boundary.geometry.clone());
                continue;
            }
            targets.push(Self {
                key: boundary.key.clone(),
                name: boundary.name.clone(),
                full_name: boundary.name.clone(),
                level: boundary.level,
                polygons: vec![boundary.geometry.clone()],
            });
        }
        targets
    }

    /// Tier (a): polygon membership.
    #[must_use]
    pub fn contains(&self, point: Coord<f64>, mode: RingMode) -> bool {
        self.polygons
            .iter()
            .any(|polygon| multi_polygon_contains(polygon, point, mode))
    }

    /// Tier (b): the region text mentions this target's key or full name.
    /// Empty needles never match.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        [self.key.as_str(), self.full_name.as_str()]
            .into_iter()
            .any(|needle| !needle.is_empty() && text.contains(needle))
    }
}
