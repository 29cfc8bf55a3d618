//! Per-camera zoom/pan state and the pan clamp.
//!
//! `pan` is stored in device pixels, scaled so that `pan / zoom` is the
//! on-screen shift of the zoomed image. The clamp bound is the container
//! overhang multiplied by `zoom` once more; the ROI converter's pan-to-center
//! formulas depend on this exact bound, so the two must change together.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::{Point, Size};

/// Live zoom level and pan offset of one camera.
///
/// Invariant: `zoom` is in `[MIN_ZOOM, MAX_ZOOM]` and `zoom <= 1` implies a zero pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: MIN_ZOOM, pan: Point::default() }
    }
}

impl Viewport {
    /// Build a viewport, normalizing `zoom` into range and clamping `pan` for `container`.
    #[must_use]
    pub fn new(zoom: f64, pan: Point, container: Size) -> Self {
        let zoom = clamp_zoom(zoom);
        Self { zoom, pan: clamp_pan(pan, zoom, container) }
    }

    /// Multiply zoom by `factor`, rescaling and reclamping the pan.
    ///
    /// No-op while the container is degenerate.
    pub fn zoom_by(&mut self, factor: f64, container: Size) {
        if container.is_degenerate() {
            tracing::debug!(factor, "zoom ignored; container not laid out");
            return;
        }
        let new_zoom = clamp_zoom(self.zoom * factor);
        if new_zoom <= MIN_ZOOM {
            self.zoom = MIN_ZOOM;
            self.pan = Point::default();
            return;
        }
        let rescaled = self.pan.scale(new_zoom / self.zoom);
        self.zoom = new_zoom;
        self.pan = clamp_pan(rescaled, new_zoom, container);
    }

    /// Shift the view by a screen-space pointer delta. No-op at zoom 1.
    pub fn drag_by(&mut self, delta: Point, container: Size) {
        if self.zoom <= MIN_ZOOM || container.is_degenerate() {
            return;
        }
        let pan = self.pan + delta.scale(self.zoom);
        self.pan = clamp_pan(pan, self.zoom, container);
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// On-screen shift of the zoomed image produced by `pan`.
    #[must_use]
    pub fn screen_shift(&self) -> Point {
        self.pan.scale(1.0 / self.zoom)
    }
}

/// Clamp a zoom value into `[MIN_ZOOM, MAX_ZOOM]`; `NaN` maps to `MIN_ZOOM`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Largest allowed `|pan|` per axis at `zoom` for `container`.
#[must_use]
pub fn pan_bound(zoom: f64, container: Size) -> Point {
    if zoom.is_nan() || zoom <= MIN_ZOOM || container.is_degenerate() {
        return Point::default();
    }
    let overhang_x = container.width * (zoom - 1.0) / 2.0;
    let overhang_y = container.height * (zoom - 1.0) / 2.0;
    Point::new(overhang_x * zoom, overhang_y * zoom)
}

/// Clamp `pan` into `[-bound, bound]` per axis; zero at `zoom <= 1`.
#[must_use]
pub fn clamp_pan(pan: Point, zoom: f64, container: Size) -> Point {
    let bound = pan_bound(zoom, container);
    Point::new(clamp_axis(pan.x, bound.x), clamp_axis(pan.y, bound.y))
}

fn clamp_axis(value: f64, bound: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-bound, bound)
}
