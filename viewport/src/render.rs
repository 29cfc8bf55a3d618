//! Rendering: draws one camera cell from its composed geometry.
//!
//! Drawing goes through the [`Surface`] trait so the same code paints a browser
//! canvas (`web` feature) and records a [`DrawLog`] natively. The renderer
//! receives read-only state and never mutates the engine.
//!
//! Layers, bottom first:
//!
//! 1. The camera frame at the calibrated placement with calibration opacity.
//!    Unrotated, unflipped frames are drawn straight into `frame`; otherwise
//!    the surface is translated to the frame center, rotated, mirrored, and the
//!    frame drawn centered on the origin.
//! 2. Validation region outlines, placed by [`CameraFrame::place`].
//! 3. The in-progress region preview, dashed.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::convert::Infallible;

use serde::Serialize;

use crate::calibration::CameraIndex;
use crate::compose::{CameraFrame, OverlayPlacement};
use crate::engine::EngineCore;
use crate::geometry::{Rect, Size};
use crate::task::ValidationRegion;

/// Outline width of region overlays in screen pixels.
const REGION_LINE_WIDTH_PX: f64 = 2.0;

/// Outline of a region still awaiting acknowledgement.
pub const PENDING_STROKE: StrokeStyle = StrokeStyle { color: "#FF9800", line_width: REGION_LINE_WIDTH_PX, dashed: false };

/// Outline of an acknowledged region.
pub const VALIDATED_STROKE: StrokeStyle =
    StrokeStyle { color: "#4CAF50", line_width: REGION_LINE_WIDTH_PX, dashed: false };

/// Outline of the region being drawn.
pub const DRAFT_STROKE: StrokeStyle = StrokeStyle { color: "#1E90FF", line_width: 1.0, dashed: true };

/// How a rectangle outline is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: &'static str,
    pub line_width: f64,
    pub dashed: bool,
}

/// A 2-D drawing target with a transform stack.
pub trait Surface {
    type Error;

    fn save(&mut self);
    fn restore(&mut self);
    /// # Errors
    /// Backend-specific.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    /// # Errors
    /// Backend-specific.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;
    /// # Errors
    /// Backend-specific.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn set_alpha(&mut self, alpha: f64);
    /// Draw the camera frame stretched into `rect`.
    ///
    /// # Errors
    /// Backend-specific.
    fn draw_frame(&mut self, rect: Rect) -> Result<(), Self::Error>;
    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle);
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { radians: f64 },
    Scale { x: f64, y: f64 },
    SetAlpha { alpha: f64 },
    DrawFrame { rect: Rect },
    StrokeRect { rect: Rect, style: StrokeStyle },
}

/// Surface that records calls instead of painting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawLog {
    pub ops: Vec<DrawOp>,
}

impl DrawLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rectangle passed to `draw_frame`, in call order.
    #[must_use]
    pub fn frames(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::DrawFrame { rect } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every stroked rectangle with its style, in call order.
    #[must_use]
    pub fn strokes(&self) -> Vec<(Rect, StrokeStyle)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeRect { rect, style } => Some((*rect, *style)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawLog {
    type Error = Infallible;

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Translate { x, y });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Rotate { radians });
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Scale { x, y });
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::SetAlpha { alpha });
    }

    fn draw_frame(&mut self, rect: Rect) -> Result<(), Infallible> {
        self.ops.push(DrawOp::DrawFrame { rect });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) {
        self.ops.push(DrawOp::StrokeRect { rect, style });
    }
}

/// Draw one camera cell: frame, region outlines, then the draft preview.
///
/// `preview` is in image pixels.
///
/// # Errors
///
/// Returns the surface's error if a transform or image draw fails.
pub fn draw_camera<S: Surface>(
    surface: &mut S,
    frame: &CameraFrame,
    regions: &[ValidationRegion],
    is_validated: impl Fn(&str) -> bool,
    preview: Option<Rect>,
) -> Result<(), S::Error> {
    draw_image(surface, frame)?;

    for region in regions {
        let style = if is_validated(&region.id) { VALIDATED_STROKE } else { PENDING_STROKE };
        draw_overlay(surface, frame.place(region.rect()), style)?;
    }

    if let Some(rect) = preview {
        draw_overlay(surface, frame.place(rect), DRAFT_STROKE)?;
    }
    Ok(())
}

/// Draw an engine camera slot. Slots that are not laid out draw nothing.
///
/// # Errors
///
/// Returns the surface's error if a transform or image draw fails.
pub fn draw_engine_camera<S: Surface>(surface: &mut S, core: &EngineCore, camera: CameraIndex) -> Result<(), S::Error> {
    let Some(frame) = core.frame(camera) else {
        return Ok(());
    };
    draw_camera(surface, &frame, core.regions(camera), |id| core.is_validated(id), core.draft_preview(camera))
}

fn draw_image<S: Surface>(surface: &mut S, frame: &CameraFrame) -> Result<(), S::Error> {
    let g = &frame.current;
    surface.save();
    surface.set_alpha(g.alpha);

    if g.is_rotated_or_flipped() {
        let center = g.center();
        surface.translate(center.x, center.y)?;
        if g.rotation != 0.0 {
            surface.rotate(g.rotation)?;
        }
        if g.flipped {
            surface.scale(-1.0, 1.0)?;
        }
        surface.draw_frame(origin_centered(g.frame.size()))?;
    } else {
        surface.draw_frame(g.frame)?;
    }

    surface.restore();
    Ok(())
}

fn draw_overlay<S: Surface>(surface: &mut S, placement: OverlayPlacement, style: StrokeStyle) -> Result<(), S::Error> {
    if !placement.is_rotated() {
        surface.stroke_rect(placement.rect(), style);
        return Ok(());
    }
    surface.save();
    surface.translate(placement.center.x, placement.center.y)?;
    surface.rotate(placement.rotation)?;
    surface.stroke_rect(origin_centered(placement.size), style);
    surface.restore();
    Ok(())
}

fn origin_centered(size: Size) -> Rect {
    Rect::new(-size.width / 2.0, -size.height / 2.0, size.width, size.height)
}
