//! Conversion between a live viewport and a reusable ROI preset.
//!
//! Presets are authored and replayed in the pre-calibration frame: only zoom,
//! pan and the container size take part. Calibration moves the picture on
//! screen but never the stored preset.
//!
//! The pan-to-center mapping is derived from the clamp bound in
//! [`crate::viewport::pan_bound`]: a pan at the bound moves the visible window
//! center by `(1 - 1/zoom) / 2` of the image.

#[cfg(test)]
#[path = "roi_test.rs"]
mod roi_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ZOOM;
use crate::geometry::{Point, Rect, Size};
use crate::viewport::{Viewport, clamp_pan, clamp_zoom, pan_bound};

/// A zoom-to-region preset in `[0, 1]` image fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRoi {
    #[serde(default)]
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NormalizedRoi {
    /// Unlabelled preset with an empty id.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { id: String::new(), x, y, width, height, label: None }
    }

    /// Clamp into the unit square. Non-finite or non-positive sizes become the full image.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let extent = |v: f64| if v.is_finite() && v > 0.0 { v.min(1.0) } else { 1.0 };
        let offset = |v: f64, size: f64| if v.is_finite() { v.clamp(0.0, 1.0 - size) } else { 0.0 };
        let width = extent(self.width);
        let height = extent(self.height);
        Self { x: offset(self.x, width), y: offset(self.y, height), width, height, ..self.clone() }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scale to source image pixels.
    #[must_use]
    pub fn to_pixels(&self, image: Size) -> PixelRect {
        PixelRect {
            x: self.x * image.width,
            y: self.y * image.height,
            width: self.width * image.width,
            height: self.height * image.height,
        }
    }
}

/// The same preset expressed in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Divide by the image size. Degenerate images give the full-image preset.
    #[must_use]
    pub fn to_normalized(&self, image: Size) -> NormalizedRoi {
        if image.is_degenerate() {
            return NormalizedRoi::new(0.0, 0.0, 1.0, 1.0);
        }
        NormalizedRoi::new(self.x / image.width, self.y / image.height, self.width / image.width, self.height / image.height)
    }
}

impl From<Rect> for PixelRect {
    fn from(r: Rect) -> Self {
        Self { x: r.x, y: r.y, width: r.width, height: r.height }
    }
}

/// Capture the visible window of `viewport` as a normalized preset.
///
/// Zoom is uniform, so the captured box is square in image fractions. A
/// degenerate container captures the full image.
#[must_use]
pub fn capture_roi(viewport: &Viewport, container: Size) -> NormalizedRoi {
    if container.is_degenerate() {
        return NormalizedRoi::new(0.0, 0.0, 1.0, 1.0);
    }
    let zoom = clamp_zoom(viewport.zoom);
    let visible = 1.0 / zoom;
    let bound = pan_bound(zoom, container);
    let pan = clamp_pan(viewport.pan, zoom, container);

    let center_x = window_center(pan.x, bound.x, visible);
    let center_y = window_center(pan.y, bound.y, visible);

    NormalizedRoi::new(
        (center_x - visible / 2.0).clamp(0.0, 1.0 - visible),
        (center_y - visible / 2.0).clamp(0.0, 1.0 - visible),
        visible,
        visible,
    )
}

/// Viewport that frames `roi` in `container`.
///
/// Zoom is `min(1/width, 1/height)`: the looser axis fits exactly and the
/// tighter one may show more than the preset.
#[must_use]
pub fn apply_roi(roi: &NormalizedRoi, container: Size) -> Viewport {
    if container.is_degenerate() {
        return Viewport::default();
    }
    let roi = roi.clamped();
    let zoom = clamp_zoom((1.0 / roi.width).min(1.0 / roi.height));
    if zoom <= MIN_ZOOM {
        return Viewport::default();
    }
    let visible = 1.0 / zoom;
    let bound = pan_bound(zoom, container);
    let center = roi.center();
    let pan = Point::new(pan_for_center(center.x, bound.x, visible), pan_for_center(center.y, bound.y, visible));
    Viewport { zoom, pan: clamp_pan(pan, zoom, container) }
}

/// Pixel-space variant of [`capture_roi`].
#[must_use]
pub fn capture_rectangle(viewport: &Viewport, container: Size, image: Size) -> PixelRect {
    if image.is_degenerate() {
        return PixelRect::default();
    }
    capture_roi(viewport, container).to_pixels(image)
}

/// Pixel-space variant of [`apply_roi`].
#[must_use]
pub fn apply_rectangle(rect: &PixelRect, container: Size, image: Size) -> Viewport {
    if image.is_degenerate() {
        return Viewport::default();
    }
    apply_roi(&rect.to_normalized(image), container)
}

fn window_center(pan: f64, bound: f64, visible: f64) -> f64 {
    if bound <= 0.0 {
        return 0.5;
    }
    0.5 + (pan / bound) * (1.0 - visible) / 2.0
}

fn pan_for_center(center: f64, bound: f64, visible: f64) -> f64 {
    let span = 1.0 - visible;
    if span <= 0.0 {
        return 0.0;
    }
    (center - 0.5) * 2.0 / span * bound
}
