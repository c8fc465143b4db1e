#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planar geometry primitives for region boundaries.
//!
//! Boundaries are treated as flat longitude/latitude polygons. Membership
//! is decided with a ray-casting (even-odd) test over polygon rings, which
//! is all the regional extent of the map needs. Bounding boxes, vertex
//! centroids and box outlines are provided for view fitting and label
//! placement.

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use geo;

/// Which polygon rings take part in a membership test.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RingMode {
    /// Only the exterior ring of each polygon is tested. Holes count as
    /// part of the polygon.
    #[default]
    OuterOnly,
    /// Exterior and interior rings are all tested with the even-odd rule,
    /// so a point inside a hole is outside the polygon.
    EvenOdd,
}

/// Ray-casting test of a point against a single ring.
///
/// The ring is implicitly closed; a repeated closing vertex is harmless.
/// An edge is crossed when it straddles the point's latitude under the
/// half-open rule `(yi > y) != (yj > y)` and the crossing lies strictly to
/// the right of the point. As a consequence points lying exactly on a
/// bottom or left edge are inside, and points on a top or right edge are
/// outside.
#[must_use]
pub fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let coords = &ring.0;
    if coords.is_empty() {
        return false;
    }

    let mut inside = false;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let Coord { x: xi, y: yi } = coords[i];
        let Coord { x: xj, y: yj } = coords[j];

        if (yi > point.y) != (yj > point.y) {
            let crossing_x = (xj - xi) * (point.y - yi) / (yj - yi) + xi;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Tests a point against a polygon using the given [`RingMode`].
#[must_use]
pub fn polygon_contains(polygon: &Polygon<f64>, point: Coord<f64>, mode: RingMode) -> bool {
    match mode {
        RingMode::OuterOnly => ring_contains(polygon.exterior(), point),
        RingMode::EvenOdd => {
            let mut inside = ring_contains(polygon.exterior(), point);
            for hole in polygon.interiors() {
                if ring_contains(hole, point) {
                    inside = !inside;
                }
            }
            inside
        }
    }
}

/// Tests a point against a multipolygon: member if inside any part.
#[must_use]
pub fn multi_polygon_contains(
    multi_polygon: &MultiPolygon<f64>,
    point: Coord<f64>,
    mode: RingMode,
) -> bool {
    multi_polygon
        .0
        .iter()
        .any(|polygon| polygon_contains(polygon, point, mode))
}

/// Bounding box of a multipolygon, or `None` when it has no vertices.
#[must_use]
pub fn bounding_rect(multi_polygon: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    multi_polygon.bounding_rect()
}

/// Smallest box covering every input box.
#[must_use]
pub fn merge_rects<I>(rects: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Rect<f64>>,
{
    rects.into_iter().reduce(|acc, rect| {
        Rect::new(
            Coord {
                x: acc.min().x.min(rect.min().x),
                y: acc.min().y.min(rect.min().y),
            },
            Coord {
                x: acc.max().x.max(rect.max().x),
                y: acc.max().y.max(rect.max().y),
            },
        )
    })
}

/// Arithmetic mean of all distinct exterior-ring vertices.
///
/// This is a label anchor, not an area centroid: densely digitised edges
/// pull it towards them.
#[must_use]
pub fn vertex_centroid(multi_polygon: &MultiPolygon<f64>) -> Option<Coord<f64>> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0_u32;

    for polygon in &multi_polygon.0 {
        let ring = &polygon.exterior().0;
        // The closing vertex repeats the first one.
        let open = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if ring.len() > 1 && first == last => {
                &ring[..ring.len() - 1]
            }
            _ => &ring[..],
        };
        for coord in open {
            sum_x += coord.x;
            sum_y += coord.y;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let n = f64::from(count);
    Some(Coord {
        x: sum_x / n,
        y: sum_y / n,
    })
}

/// Closed rectangular ring around a bounding box.
///
/// Stands in for the union of several boundaries. It overstates the
/// covered area wherever the parts are not box-shaped.
#[must_use]
pub fn outline(rect: Rect<f64>) -> Polygon<f64> {
    let (min, max) = (rect.min(), rect.max());
    Polygon::new(
        LineString::from(vec![
            (min.x, min.y),
            (max.x, min.y),
            (max.x, max.y),
            (min.x, max.y),
            (min.x, min.y),
        ]),
        vec![],
    )
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
///
/// Polygons are wrapped into a single-part multipolygon. Other geometry
/// types, and polygons whose exterior ring is empty, yield `None`.
#[must_use]
pub fn to_multi_polygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geometry: geo::Geometry<f64> = match geometry.try_into() {
        Ok(geometry) => geometry,
        Err(e) => {
            log::debug!("Unconvertible GeoJSON geometry: {e}");
            return None;
        }
    };

    let multi_polygon = match geometry {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    let parts: Vec<Polygon<f64>> = multi_polygon
        .0
        .into_iter()
        .filter(|p| !p.exterior().0.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(MultiPolygon(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> LineString<f64> {
        LineString::from(vec![
            (min, min),
            (max, min),
            (max, max),
            (min, max),
            (min, min),
        ])
    }

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn strictly_inside_convex_ring() {
        let ring = square(0.0, 10.0);
        for point in [c(5.0, 5.0), c(0.1, 0.1), c(9.9, 9.9), c(1.0, 8.0)] {
            assert!(ring_contains(&ring, point), "{point:?} should be inside");
        }
    }

    #[test]
    fn strictly_outside_convex_ring() {
        let ring = square(0.0, 10.0);
        for point in [c(-1.0, 5.0), c(11.0, 5.0), c(5.0, -0.1), c(5.0, 10.1)] {
            assert!(!ring_contains(&ring, point), "{point:?} should be outside");
        }
    }

    #[test]
    fn boundary_tie_break_is_bottom_left_inclusive() {
        let ring = square(0.0, 10.0);
        assert!(ring_contains(&ring, c(0.0, 5.0)), "left edge");
        assert!(ring_contains(&ring, c(5.0, 0.0)), "bottom edge");
        assert!(!ring_contains(&ring, c(10.0, 5.0)), "right edge");
        assert!(!ring_contains(&ring, c(5.0, 10.0)), "top edge");
    }

    #[test]
    fn open_ring_is_implicitly_closed() {
        let ring = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert!(ring_contains(&ring, c(2.0, 2.0)));
    }

    #[test]
    fn empty_ring_contains_nothing() {
        let ring = LineString::<f64>::new(vec![]);
        assert!(!ring_contains(&ring, c(0.0, 0.0)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ring = LineString::from(vec![
            (116.1, 33.2),
            (116.9, 32.8),
            (117.3, 33.6),
            (116.4, 34.0),
        ]);
        let point = c(116.7, 33.3);
        let first = ring_contains(&ring, point);
        for _ in 0..100 {
            assert_eq!(ring_contains(&ring, point), first);
        }
    }

    #[test]
    fn outer_only_ignores_holes() {
        let polygon = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        let in_hole = c(5.0, 5.0);
        assert!(polygon_contains(&polygon, in_hole, RingMode::OuterOnly));
        assert!(!polygon_contains(&polygon, in_hole, RingMode::EvenOdd));
        assert!(polygon_contains(&polygon, c(2.0, 2.0), RingMode::EvenOdd));
    }

    #[test]
    fn multi_polygon_member_of_any_part() {
        let mp = MultiPolygon(vec![
            Polygon::new(square(0.0, 1.0), vec![]),
            Polygon::new(square(5.0, 6.0), vec![]),
        ]);
        assert!(multi_polygon_contains(&mp, c(5.5, 5.5), RingMode::OuterOnly));
        assert!(multi_polygon_contains(&mp, c(0.5, 0.5), RingMode::OuterOnly));
        assert!(!multi_polygon_contains(&mp, c(3.0, 3.0), RingMode::OuterOnly));
    }

    #[test]
    fn merges_bounding_boxes() {
        let a = MultiPolygon(vec![Polygon::new(square(0.0, 1.0), vec![])]);
        let b = MultiPolygon(vec![Polygon::new(square(5.0, 6.0), vec![])]);
        let merged = merge_rects([a, b].iter().filter_map(bounding_rect)).unwrap();
        assert_eq!(merged.min(), c(0.0, 0.0));
        assert_eq!(merged.max(), c(6.0, 6.0));
        assert!(merge_rects(std::iter::empty()).is_none());
    }

    #[test]
    fn outline_is_closed_box() {
        let rect = Rect::new(c(115.0, 32.0), c(118.0, 34.0));
        let poly = outline(rect);
        let ring = &poly.exterior().0;
        assert_eq!(ring.first(), ring.last());
        assert!(ring_contains(poly.exterior(), c(116.5, 33.0)));
    }

    #[test]
    fn vertex_centroid_of_square() {
        let mp = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
            vec![],
        )]);
        assert_eq!(vertex_centroid(&mp), Some(c(1.0, 1.0)));
        assert_eq!(vertex_centroid(&MultiPolygon(vec![])), None);
    }

    fn geometry(json: &str) -> geojson::Geometry {
        match json.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::Geometry(geometry) => geometry,
            other => panic!("expected a bare geometry, got {other:?}"),
        }
    }

    #[test]
    fn converts_polygon_and_multipolygon_geojson() {
        let polygon =
            geometry(r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#);
        assert_eq!(to_multi_polygon(polygon).unwrap().0.len(), 1);

        let multi = geometry(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[1,0],[1,1],[0,0]]],
                [[[5,5],[6,5],[6,6],[5,5]]]
            ]}"#,
        );
        assert_eq!(to_multi_polygon(multi).unwrap().0.len(), 2);

        let point = geometry(r#"{"type":"Point","coordinates":[0,0]}"#);
        assert!(to_multi_polygon(point).is_none());
    }

    #[test]
    fn ring_mode_parses_from_snake_case() {
        assert_eq!("even_odd".parse::<RingMode>().unwrap(), RingMode::EvenOdd);
        assert_eq!(RingMode::OuterOnly.to_string(), "outer_only");
    }
}
