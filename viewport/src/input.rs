//! Input model: tools, mouse buttons, keys, and the gesture state machines.
//!
//! `Tool` captures the inspector's intent at the time of a pointer event.
//! `InputState` is the pan gesture being tracked between pointer-down and
//! pointer-up. `RegionDraft` is the two-click region-creation machine:
//!
//! ```text
//! Inactive --click--> Armed(start) --move--> Armed(preview) --click--> commit --> Inactive
//! ```
//!
//! Draft corners are in source image pixels.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::calibration::CameraIndex;
use crate::consts::MIN_REGION_PX;
use crate::geometry::{Point, Rect, Size};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pan, zoom and acknowledge regions (default).
    #[default]
    Inspect,
    /// Draw a new validation region with two clicks.
    CreateRegion,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Escape"`, `"+"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The inspector is dragging a zoomed camera image.
    Panning {
        /// Camera whose viewport is being dragged.
        camera: CameraIndex,
        /// Screen-space position of the previous pointer event, used to compute the delta.
        last_screen: Point,
    },
}

/// Result of feeding an event to a [`RegionDraft`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftOutcome {
    /// First corner placed.
    Armed,
    /// Second corner placed; the normalized, image-clamped rectangle.
    Committed(Rect),
    /// Second corner placed but the rectangle was below the minimum size.
    Discarded(Rect),
    /// The draft was abandoned before the second click.
    Cancelled,
    /// The event had no effect.
    Ignored,
}

/// Two-click region creation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegionDraft {
    #[default]
    Inactive,
    Armed {
        start: Point,
        current: Point,
    },
}

impl RegionDraft {
    /// Place a corner. The second click commits or discards and returns to `Inactive`.
    pub fn click(&mut self, image_pt: Point, image: Size) -> DraftOutcome {
        match *self {
            Self::Inactive => {
                *self = Self::Armed { start: image_pt, current: image_pt };
                DraftOutcome::Armed
            }
            Self::Armed { start, .. } => {
                *self = Self::Inactive;
                let rect = Rect::from_corners(start, image_pt).clamp_to(image);
                if rect.width < MIN_REGION_PX || rect.height < MIN_REGION_PX {
                    tracing::debug!(width = rect.width, height = rect.height, "region below minimum size; discarded");
                    DraftOutcome::Discarded(rect)
                } else {
                    DraftOutcome::Committed(rect)
                }
            }
        }
    }

    /// Track the pointer while armed. Returns whether the preview changed.
    pub fn pointer_move(&mut self, image_pt: Point) -> bool {
        match self {
            Self::Inactive => false,
            Self::Armed { current, .. } => {
                let changed = *current != image_pt;
                *current = image_pt;
                changed
            }
        }
    }

    pub fn cancel(&mut self) -> DraftOutcome {
        match *self {
            Self::Inactive => DraftOutcome::Ignored,
            Self::Armed { .. } => {
                *self = Self::Inactive;
                tracing::debug!("region creation cancelled");
                DraftOutcome::Cancelled
            }
        }
    }

    /// In-progress rectangle for drawing, in image pixels.
    #[must_use]
    pub fn preview(&self) -> Option<Rect> {
        match *self {
            Self::Inactive => None,
            Self::Armed { start, current } => Some(Rect::from_corners(start, current)),
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }
}
