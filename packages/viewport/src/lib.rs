#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View state for a flat longitude/latitude map.
//!
//! Projection is equirectangular, which is only acceptable at the small
//! regional extent this map covers:
//!
//! ```text
//! scale = zoom * min(width, height) / 2
//! x     = (lon - center_lon) * scale + width / 2
//! y     = (center_lat - lat) * scale + height / 2
//! ```
//!
//! Dragging uses a separate, fixed scale ([`DRAG_SCALE`]) that does not
//! depend on the surface size, so pan speed differs from the draw scale.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom multiplier for one wheel notch towards the user (zoom in).
pub const ZOOM_IN_STEP: f64 = 1.1;
/// Zoom multiplier for one wheel notch away from the user (zoom out).
pub const ZOOM_OUT_STEP: f64 = 0.9;
/// Pixels per degree per unit zoom when dragging.
pub const DRAG_SCALE: f64 = 1000.0;
/// Fraction of the data extent added on each side by [`ViewState::fit_bounds`].
pub const FIT_PADDING: f64 = 0.2;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Surface {
    /// Creates a surface.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Center and zoom of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Longitude at the surface center.
    pub center_lon: f64,
    /// Latitude at the surface center.
    pub center_lat: f64,
    /// Zoom factor, kept within [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub zoom: f64,
}

impl Default for ViewState {
    /// Centered on the Wanbei area at zoom 1.
    fn default() -> Self {
        Self {
            center_lon: 116.5,
            center_lat: 33.0,
            zoom: 1.0,
        }
    }
}

impl ViewState {
    /// Pixels per degree on `surface`.
    #[must_use]
    pub fn scale(&self, surface: Surface) -> f64 {
        self.zoom * surface.min_side() / 2.0
    }

    /// Geographic to surface coordinates.
    #[must_use]
    pub fn project(&self, surface: Surface, lon: f64, lat: f64) -> (f64, f64) {
        let scale = self.scale(surface);
        (
            (lon - self.center_lon).mul_add(scale, surface.width / 2.0),
            (self.center_lat - lat).mul_add(scale, surface.height / 2.0),
        )
    }

    /// [`Self::project`] for a `geo` coordinate.
    #[must_use]
    pub fn project_coord(&self, surface: Surface, coord: Coord<f64>) -> Coord<f64> {
        let (x, y) = self.project(surface, coord.x, coord.y);
        Coord { x, y }
    }

    /// Surface to geographic coordinates; the inverse of [`Self::project`].
    #[must_use]
    pub fn unproject(&self, surface: Surface, x: f64, y: f64) -> (f64, f64) {
        let scale = self.scale(surface);
        (
            (x - surface.width / 2.0) / scale + self.center_lon,
            self.center_lat - (y - surface.height / 2.0) / scale,
        )
    }

    /// Pans by a pixel delta. Dragging right moves the map right, i.e. the
    /// center moves west.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let scale = self.zoom * DRAG_SCALE;
        self.center_lon -= dx / scale;
        self.center_lat += dy / scale;
    }

    /// Handles one wheel event at surface position `(x, y)`.
    ///
    /// Positive `delta_y` (scrolling down) zooms out, negative zooms in and
    /// zero is ignored.
    pub fn wheel(&mut self, surface: Surface, delta_y: f64, x: f64, y: f64) {
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_STEP
        } else if delta_y < 0.0 {
            ZOOM_IN_STEP
        } else {
            return;
        };
        self.zoom_at(surface, factor, x, y);
    }

    /// Multiplies the zoom by `factor` (clamped) while keeping the
    /// geographic point under `(x, y)` fixed on the surface.
    pub fn zoom_at(&mut self, surface: Surface, factor: f64, x: f64, y: f64) {
        if !surface.is_drawable() || !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let (lon, lat) = self.unproject(surface, x, y);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let scale = self.scale(surface);
        self.center_lon = lon - (x - surface.width / 2.0) / scale;
        self.center_lat = lat + (y - surface.height / 2.0) / scale;
    }

    /// Centers on `bounds` and picks the largest zoom at which the padded
    /// bounds fit on `surface`, clamped to the zoom range.
    ///
    /// Empty or zero-extent bounds and undrawable surfaces leave the view
    /// unchanged and return `false`.
    pub fn fit_bounds(&mut self, bounds: Option<Rect<f64>>, surface: Surface) -> bool {
        let Some(bounds) = bounds else {
            log::warn!("No bounds to fit, keeping the current view");
            return false;
        };

        let lon_range = bounds.width();
        let lat_range = bounds.height();
        if lon_range <= 0.0 || lat_range <= 0.0 || !surface.is_drawable() {
            log::warn!(
                "Cannot fit {lon_range}x{lat_range} degrees on a {}x{} surface",
                surface.width,
                surface.height
            );
            return false;
        }

        let padded_lon = lon_range * FIT_PADDING.mul_add(2.0, 1.0);
        let padded_lat = lat_range * FIT_PADDING.mul_add(2.0, 1.0);
        let min_side = surface.min_side();

        let zoom_w = surface.width * (1.0 - FIT_PADDING) * 2.0 / (padded_lon * min_side);
        let zoom_h = surface.height * (1.0 - FIT_PADDING) * 2.0 / (padded_lat * min_side);

        let center = bounds.center();
        self.center_lon = center.x;
        self.center_lat = center.y;
        self.zoom = zoom_w.min(zoom_h).clamp(MIN_ZOOM, MAX_ZOOM);

        log::debug!(
            "Fitted view to ({:.4}, {:.4}) zoom {:.4} (width {zoom_w:.4}, height {zoom_h:.4})",
            self.center_lon,
            self.center_lat,
            self.zoom
        );
        true
    }
}
