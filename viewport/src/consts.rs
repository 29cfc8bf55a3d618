//! Shared numeric constants for the viewport crate.

// ── Cameras ─────────────────────────────────────────────────────

/// Number of simultaneous camera feeds in the inspection grid.
pub const CAMERA_SLOTS: usize = 8;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom limit; the whole image is visible.
pub const MIN_ZOOM: f64 = 1.0;

/// Upper zoom limit.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom multiplier applied per wheel notch or keyboard step.
pub const ZOOM_STEP: f64 = 1.1;

// ── Calibration ─────────────────────────────────────────────────

/// Container extent (px) at which a calibration translation unit equals one pixel.
pub const CALIBRATION_REFERENCE_PX: f64 = 500.0;

// ── Regions ─────────────────────────────────────────────────────

/// Minimum width and height, in image pixels, of a committed region.
pub const MIN_REGION_PX: f64 = 10.0;

// ── Animation ───────────────────────────────────────────────────

/// Duration of a viewport transition to a task's ROI preset.
pub const ANIMATION_DURATION_MS: f64 = 800.0;
