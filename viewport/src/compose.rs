//! Transform compositor: fit, zoom/pan and calibration folded into one draw geometry.
//!
//! [`DrawGeometry`] is the single source of placement truth. The renderer
//! draws from it and the hit-tester inverts it, so the two can never disagree
//! about where a pixel of the source image lands on screen.
//!
//! Composition order per frame:
//!
//! 1. **Fit** the image inside the container ("contain", centered).
//! 2. **Zoom/pan** around the container center, shifted by `pan / zoom`.
//! 3. **Calibrate** around the zoomed image's center: translate by
//!    `translate * min(Cw, Ch) / 500`, scale, then rotate and flip.
//!
//! Overlays defined in image pixels go through [`CameraFrame::place`], which
//! measures the annotation against the baseline view (zoom 1, no pan, fully
//! calibrated) and carries its offset from the image center over to the
//! current view. Calibration rotation and offset therefore track the image's
//! on-screen center rather than the container's.

#[cfg(test)]
#[path = "compose_test.rs"]
mod compose_test;

use crate::calibration::CalibrationTransform;
use crate::consts::CALIBRATION_REFERENCE_PX;
use crate::geometry::{Point, Rect, Size};
use crate::viewport::{Viewport, clamp_zoom};

/// Where and how one camera image is drawn for a given viewport and calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawGeometry {
    /// Source image dimensions in pixels.
    pub image: Size,
    /// "Contain" placement at zoom 1, before calibration.
    pub fit: Rect,
    /// Placement after zoom and pan, before calibration.
    pub zoomed: Rect,
    /// Axis-aligned placement after calibration translate/scale, before rotation and flip.
    pub frame: Rect,
    /// Calibration rotation in radians, applied around `frame`'s center.
    pub rotation: f64,
    /// Horizontal mirror, applied after rotation.
    pub flipped: bool,
    /// Draw alpha in `[0, 1]`.
    pub alpha: f64,
}

impl DrawGeometry {
    /// Compose the placement. Returns `None` when the image or container is degenerate.
    ///
    /// Zoom centers the scaled image on the fitted rect (`fit.x + (draw_w - scaled_w) / 2`),
    /// not on the container, so letterboxed images do not pick up the fit offset twice.
    #[must_use]
    pub fn compute(image: Size, container: Size, viewport: &Viewport, calibration: &CalibrationTransform) -> Option<Self> {
        if image.is_degenerate() || container.is_degenerate() {
            return None;
        }

        // 1. Fit.
        let fit_scale = (container.width / image.width).min(container.height / image.height);
        let draw_w = image.width * fit_scale;
        let draw_h = image.height * fit_scale;
        let fit = Rect::new((container.width - draw_w) / 2.0, (container.height - draw_h) / 2.0, draw_w, draw_h);

        // 2. Zoom and pan.
        let zoom = clamp_zoom(viewport.zoom);
        let scaled_w = draw_w * zoom;
        let scaled_h = draw_h * zoom;
        let shift = viewport.pan.scale(1.0 / zoom);
        let zoomed = Rect::new(
            fit.x + (draw_w - scaled_w) / 2.0 + shift.x,
            fit.y + (draw_h - scaled_h) / 2.0 + shift.y,
            scaled_w,
            scaled_h,
        );

        // 3. Calibration.
        let calibration = calibration.sanitized();
        let frame = if calibration.is_identity_placement() {
            zoomed
        } else {
            let unit = container.min_side() / CALIBRATION_REFERENCE_PX;
            let center = zoomed.center() + Point::new(calibration.translate_x, calibration.translate_y).scale(unit);
            Rect::centered(center, Size::new(scaled_w * calibration.scale, scaled_h * calibration.scale))
        };

        Some(Self {
            image,
            fit,
            zoomed,
            frame,
            rotation: calibration.rotation.to_radians(),
            flipped: calibration.flipped,
            alpha: calibration.alpha(),
        })
    }

    /// Whether drawing needs the translate/rotate/flip path.
    #[must_use]
    pub fn is_rotated_or_flipped(&self) -> bool {
        self.rotation != 0.0 || self.flipped
    }

    /// On-screen center of the calibrated image; the pivot for rotation and flip.
    #[must_use]
    pub fn center(&self) -> Point {
        self.frame.center()
    }

    /// Uniform screen pixels per source image pixel.
    #[must_use]
    pub fn pixel_scale(&self) -> f64 {
        self.frame.width / self.image.width
    }

    /// Map a source image pixel to the screen.
    #[must_use]
    pub fn image_to_screen(&self, pt: Point) -> Point {
        let sx = self.frame.width / self.image.width;
        let sy = self.frame.height / self.image.height;
        if !self.is_rotated_or_flipped() {
            return Point::new(self.frame.x + pt.x * sx, self.frame.y + pt.y * sy);
        }
        let mut local = Point::new(pt.x * sx - self.frame.width / 2.0, pt.y * sy - self.frame.height / 2.0);
        if self.flipped {
            local.x = -local.x;
        }
        self.center() + local.rotate(self.rotation)
    }

    /// Map a screen point back to source image pixels. May fall outside the image.
    #[must_use]
    pub fn screen_to_image(&self, pt: Point) -> Point {
        let sx = self.image.width / self.frame.width;
        let sy = self.image.height / self.frame.height;
        if !self.is_rotated_or_flipped() {
            return Point::new((pt.x - self.frame.x) * sx, (pt.y - self.frame.y) * sy);
        }
        let mut local = (pt - self.center()).rotate(-self.rotation);
        if self.flipped {
            local.x = -local.x;
        }
        Point::new((local.x + self.frame.width / 2.0) * sx, (local.y + self.frame.height / 2.0) * sy)
    }
}

/// Screen placement of an image-space annotation.
///
/// The rectangle is centered on `center` and rotated by `rotation`. A flip
/// mirrors the annotation's position (already folded into `center`) but leaves
/// the centered rectangle itself unchanged, so it is not carried here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    pub center: Point,
    pub size: Size,
    pub rotation: f64,
}

impl OverlayPlacement {
    /// Unrotated extent around `center`.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.center, self.size)
    }

    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    /// Whether a screen point lies inside the (possibly rotated) rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let local = (pt - self.center).rotate(-self.rotation);
        local.x.abs() <= self.size.width / 2.0 && local.y.abs() <= self.size.height / 2.0
    }
}

/// Current and baseline geometry of one camera, computed together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub current: DrawGeometry,
    pub baseline: DrawGeometry,
}

impl CameraFrame {
    /// Returns `None` when the image or container is degenerate.
    #[must_use]
    pub fn new(image: Size, container: Size, viewport: &Viewport, calibration: &CalibrationTransform) -> Option<Self> {
        let current = DrawGeometry::compute(image, container, viewport, calibration)?;
        let baseline = DrawGeometry::compute(image, container, &Viewport::default(), calibration)?;
        Some(Self { current, baseline })
    }

    /// Place an image-pixel rectangle on screen under the current view.
    #[must_use]
    pub fn place(&self, region: Rect) -> OverlayPlacement {
        let base = &self.baseline;
        let base_pos = base.image_to_screen(region.center());
        let base_size = Size::new(
            region.width * base.frame.width / base.image.width,
            region.height * base.frame.height / base.image.height,
        );

        let factor = self.current.frame.width / base.frame.width;
        let offset = (base_pos - base.center()).scale(factor);

        OverlayPlacement {
            center: self.current.center() + offset,
            size: Size::new(base_size.width * factor, base_size.height * factor),
            rotation: self.current.rotation,
        }
    }
}
