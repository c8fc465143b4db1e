//! R-tree hit-testing over a set of region boundaries.
//!
//! Used for pointer interaction (hover/click) and the `locate` command.
//! Entries remember their position in the input slice so that, when
//! several boundaries contain the point, the earliest one wins. That keeps
//! hit-testing consistent with the first-match rule of aggregation.

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};
use wanbei_map_geometry::RingMode;

use crate::boundary::RegionBoundary;

/// Bounding box of one boundary plus its position in the source slice.
struct IndexEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index answering "which boundary contains this point".
///
/// The index stores positions only; callers pass the same slice to
/// [`RegionIndex::locate`] that they built it from.
pub struct RegionIndex {
    tree: RTree<IndexEntry>,
    len: usize,
}

impl RegionIndex {
    /// Bulk-loads an index over `boundaries`.
    #[must_use]
    pub fn build(boundaries: &[RegionBoundary]) -> Self {
        let entries = boundaries
            .iter()
            .enumerate()
            .map(|(position, boundary)| {
                let (min, max) = (boundary.bounds.min(), boundary.bounds.max());
                IndexEntry {
                    position,
                    envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]),
                }
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            len: boundaries.len(),
        }
    }

    /// Number of indexed boundaries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the index is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first boundary in `boundaries` containing `point`.
    ///
    /// Returns `None` when no boundary contains the point or when
    /// `boundaries` is not the slice this index was built from.
    #[must_use]
    pub fn locate(
        &self,
        boundaries: &[RegionBoundary],
        point: Coord<f64>,
        mode: RingMode,
    ) -> Option<usize> {
        if boundaries.len() != self.len {
            log::warn!(
                "Region index built over {} boundaries, queried with {}",
                self.len,
                boundaries.len()
            );
            return None;
        }

        let query = AABB::from_point([point.x, point.y]);
        self.tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.position)
            .filter(|&position| boundaries[position].contains(point, mode))
            .min()
    }
}
