//! Browser canvas backend for [`Surface`].
//!
//! This is the only module that touches `web_sys`. The host owns the canvas
//! and the decoded camera frame; a `WebSurface` borrows both for one draw.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::geometry::Rect;
use crate::render::{StrokeStyle, Surface};

/// Selection dash segment length in screen pixels.
const DASH_PX: f64 = 4.0;

/// Paints onto a 2-D canvas context, drawing `frame` as the camera image.
pub struct WebSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    frame: &'a HtmlImageElement,
}

impl<'a> WebSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, frame: &'a HtmlImageElement) -> Self {
        Self { ctx, frame }
    }

    /// Clear a cell before redrawing it.
    pub fn clear(&self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }
}

impl Surface for WebSurface<'_> {
    type Error = JsValue;

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.translate(x, y)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), JsValue> {
        self.ctx.rotate(radians)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.scale(x, y)
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn draw_frame(&mut self, rect: Rect) -> Result<(), JsValue> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(self.frame, rect.x, rect.y, rect.width, rect.height)
    }

    fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) {
        self.ctx.set_stroke_style_str(style.color);
        self.ctx.set_line_width(style.line_width);
        let dash: &[f64] = if style.dashed { &[DASH_PX, DASH_PX] } else { &[] };
        if let Err(e) = self.ctx.set_line_dash(&dash_array(dash)) {
            tracing::warn!(error = ?e, "set_line_dash failed");
        }
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }
}

fn dash_array(segments: &[f64]) -> JsValue {
    let values: Vec<JsValue> = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
    JsValue::from(values)
}
