//! Parses `GeoJSON` boundary files into [`RegionBoundary`] values.
//!
//! Features without a usable name or polygon geometry are skipped with a
//! warning rather than failing the whole file.

use geo::{Coord, MultiPolygon, Rect};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use wanbei_map_geometry::{RingMode, bounding_rect, multi_polygon_contains, to_multi_polygon};
use wanbei_map_region_models::{RegionLevel, normalize_region_name};

use crate::RegionError;

/// One named administrative boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    /// Normalized matching key (see [`normalize_region_name`]).
    pub key: String,
    /// Display name as found in the boundary file.
    pub name: String,
    /// Administrative division code, when present.
    pub adcode: Option<u32>,
    /// Administrative level.
    pub level: RegionLevel,
    /// Explicit city-boundary marker set by the boundary preprocessing.
    pub is_city_boundary: bool,
    /// Boundary polygons (longitude/latitude).
    pub geometry: MultiPolygon<f64>,
    /// Bounding box of [`Self::geometry`].
    pub bounds: Rect<f64>,
}

impl RegionBoundary {
    /// Builds a boundary, computing its key and bounding box.
    ///
    /// Returns `None` if the geometry has no vertices.
    #[must_use]
    pub fn new(
        name: &str,
        adcode: Option<u32>,
        level: RegionLevel,
        geometry: MultiPolygon<f64>,
    ) -> Option<Self> {
        let bounds = bounding_rect(&geometry)?;
        Some(Self {
            key: normalize_region_name(name),
            name: name.trim().to_string(),
            adcode,
            level,
            is_city_boundary: false,
            geometry,
            bounds,
        })
    }

    /// Point membership, pre-filtered by the bounding box.
    #[must_use]
    pub fn contains(&self, point: Coord<f64>, mode: RingMode) -> bool {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        if point.x < min.x || point.x > max.x || point.y < min.y || point.y > max.y {
            return false;
        }
        multi_polygon_contains(&self.geometry, point, mode)
    }
}

/// Parses a `GeoJSON` document (usually a `FeatureCollection`) into
/// boundaries. A bare `Feature` yields at most one boundary.
///
/// # Errors
///
/// Returns [`RegionError::GeoJson`] if the text is not valid `GeoJSON`,
/// or [`RegionError::Conversion`] if it is a bare geometry.
pub fn parse_boundaries(geojson_str: &str) -> Result<Vec<RegionBoundary>, RegionError> {
    let features = match geojson_str.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(FeatureCollection { features, .. }) => features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(RegionError::Conversion {
                message: "Expected a FeatureCollection, found a bare geometry".to_string(),
            });
        }
    };

    let total = features.len();
    let boundaries: Vec<RegionBoundary> =
        features.into_iter().filter_map(feature_to_boundary).collect();

    if boundaries.len() < total {
        log::warn!(
            "Skipped {} of {total} boundary features without a name or polygon geometry",
            total - boundaries.len()
        );
    }

    Ok(boundaries)
}

/// Converts a single feature. Exposed for callers building boundaries
/// from already-parsed `GeoJSON`.
#[must_use]
pub fn feature_to_boundary(feature: Feature) -> Option<RegionBoundary> {
    let Feature {
        geometry,
        properties,
        ..
    } = feature;
    let props = properties.unwrap_or_default();

    let Some(name) = string_prop(&props, &["name", "名称"]) else {
        log::warn!("Boundary feature has no name property");
        return None;
    };

    let Some(geometry) = geometry.and_then(to_multi_polygon) else {
        log::warn!("Boundary {name} has no polygon geometry");
        return None;
    };

    let adcode = adcode_prop(&props);
    let level = classify(&props, &name, adcode);

    let mut boundary = RegionBoundary::new(&name, adcode, level, geometry)?;
    boundary.is_city_boundary = props
        .get("isCityBoundary")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);
    Some(boundary)
}

/// Picks the administrative level from explicit properties, then the
/// adcode, then the name suffix. Unknown regions default to districts.
fn classify(props: &JsonObject, name: &str, adcode: Option<u32>) -> RegionLevel {
    string_prop(props, &["level", "type", "级别"])
        .and_then(|value| RegionLevel::from_property(&value))
        .or_else(|| adcode.and_then(RegionLevel::from_adcode))
        .or_else(|| RegionLevel::from_name(name))
        .unwrap_or(RegionLevel::District)
}

fn string_prop(props: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .filter_map(JsonValue::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// `adcode` appears both as a number and as a string in the wild.
fn adcode_prop(props: &JsonObject) -> Option<u32> {
    match props.get("adcode")? {
        JsonValue::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
