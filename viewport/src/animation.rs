//! Viewport transitions: ease-out-cubic interpolation between two viewports.
//!
//! Time is supplied by the caller in milliseconds (e.g. the host's animation
//! frame timestamp), so sampling is deterministic and testable.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::consts::ANIMATION_DURATION_MS;
use crate::geometry::Point;
use crate::viewport::Viewport;

/// `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t).powi(3)
}

/// Linear blend of zoom and pan at eased progress `t`.
#[must_use]
pub fn lerp_viewport(from: &Viewport, to: &Viewport, t: f64) -> Viewport {
    let mix = |a: f64, b: f64| a + (b - a) * t;
    Viewport {
        zoom: mix(from.zoom, to.zoom),
        pan: Point::new(mix(from.pan.x, to.pan.x), mix(from.pan.y, to.pan.y)),
    }
}

/// One in-flight transition of a camera's viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportAnimation {
    pub from: Viewport,
    pub to: Viewport,
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl ViewportAnimation {
    /// Standard-length transition starting at `now_ms`.
    #[must_use]
    pub fn new(from: Viewport, to: Viewport, now_ms: f64) -> Self {
        Self { from, to, started_ms: now_ms, duration_ms: ANIMATION_DURATION_MS }
    }

    /// Linear progress in `[0, 1]`. Clocks running backwards read as 0.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Viewport at `now_ms`. Exactly `to` once finished.
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> Viewport {
        if self.is_finished(now_ms) {
            return self.to;
        }
        lerp_viewport(&self.from, &self.to, ease_out_cubic(self.progress(now_ms)))
    }
}
