//! Per-camera viewport records with subscriptions and cancellable transitions.
//!
//! ARCHITECTURE
//! ============
//! The store is the single owner of every camera's [`Viewport`]. Writers are
//! the pointer handlers (drag, wheel, keys) and the per-frame [`ViewportStore::tick`]
//! that advances transitions. Both write the same record; there is no double
//! buffer. Ordering rules, per camera:
//!
//! - A new transition target replaces the in-flight one and starts from the
//!   viewport currently on screen (last intent wins).
//! - Any manual interaction cancels the in-flight transition before it writes,
//!   so transition and drag writes never interleave within a frame.
//!
//! Subscribers are notified synchronously after every write.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::animation::ViewportAnimation;
use crate::calibration::CameraIndex;
use crate::consts::CAMERA_SLOTS;
use crate::geometry::{Point, Size};
use crate::roi::{NormalizedRoi, apply_roi, capture_roi};
use crate::viewport::{Viewport, clamp_pan};

/// Handle returned by [`ViewportStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(CameraIndex, &Viewport)>;

#[derive(Debug, Clone, Copy, Default)]
struct CameraSlot {
    viewport: Viewport,
    container: Size,
    animation: Option<ViewportAnimation>,
}

/// Viewports of all camera slots.
pub struct ViewportStore {
    slots: Vec<CameraSlot>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Default for ViewportStore {
    fn default() -> Self {
        Self::new(CAMERA_SLOTS)
    }
}

impl ViewportStore {
    #[must_use]
    pub fn new(cameras: usize) -> Self {
        Self { slots: vec![CameraSlot::default(); cameras], listeners: Vec::new(), next_subscription: 1 }
    }

    /// Number of camera slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // --- Reads ---

    /// Current viewport; the default for unknown cameras.
    #[must_use]
    pub fn get(&self, camera: CameraIndex) -> Viewport {
        self.slots.get(camera).map(|s| s.viewport).unwrap_or_default()
    }

    /// Last laid-out container size; zero until the host reports one.
    #[must_use]
    pub fn container(&self, camera: CameraIndex) -> Size {
        self.slots.get(camera).map(|s| s.container).unwrap_or_default()
    }

    #[must_use]
    pub fn is_animating(&self, camera: CameraIndex) -> bool {
        self.slots.get(camera).is_some_and(|s| s.animation.is_some())
    }

    /// Capture the camera's current view as a preset.
    #[must_use]
    pub fn capture_roi(&self, camera: CameraIndex) -> NormalizedRoi {
        capture_roi(&self.get(camera), self.container(camera))
    }

    // --- Subscriptions ---

    /// Register a listener called after every viewport write.
    pub fn subscribe(&mut self, listener: impl FnMut(CameraIndex, &Viewport) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // --- Writes ---

    /// Record a new container size and reclamp the pan for it.
    pub fn set_container(&mut self, camera: CameraIndex, container: Size) {
        let Some(slot) = self.slots.get_mut(camera) else {
            return;
        };
        slot.container = container;
        let pan = clamp_pan(slot.viewport.pan, slot.viewport.zoom, container);
        if pan != slot.viewport.pan && !container.is_degenerate() {
            slot.viewport.pan = pan;
            self.notify(camera);
        }
    }

    /// Replace a viewport outright, cancelling any transition.
    pub fn set(&mut self, camera: CameraIndex, viewport: Viewport) {
        self.manual(camera, |v, container| *v = Viewport::new(viewport.zoom, viewport.pan, container));
    }

    /// Zoom by `factor`, cancelling any transition.
    pub fn zoom_by(&mut self, camera: CameraIndex, factor: f64) {
        self.manual(camera, |v, container| v.zoom_by(factor, container));
    }

    /// Pan by a screen delta, cancelling any transition. No-op at zoom 1.
    pub fn drag(&mut self, camera: CameraIndex, delta: Point) {
        self.manual(camera, |v, container| v.drag_by(delta, container));
    }

    /// Back to the default view, cancelling any transition.
    pub fn reset(&mut self, camera: CameraIndex) {
        self.manual(camera, |v, _| v.reset());
    }

    /// Frame a preset on this camera, immediately or as an 800 ms transition.
    pub fn apply_roi(&mut self, camera: CameraIndex, roi: &NormalizedRoi, animate_from_ms: Option<f64>) {
        let target = apply_roi(roi, self.container(camera));
        match animate_from_ms {
            Some(now_ms) => self.animate_to(camera, target, now_ms),
            None => self.set(camera, target),
        }
    }

    /// Start a transition to `target`, superseding any in-flight one.
    pub fn animate_to(&mut self, camera: CameraIndex, target: Viewport, now_ms: f64) {
        let Some(slot) = self.slots.get_mut(camera) else {
            return;
        };
        if slot.animation.is_some() {
            tracing::debug!(camera, "viewport transition superseded");
        }
        let target = Viewport::new(target.zoom, target.pan, slot.container);
        slot.animation = Some(ViewportAnimation::new(slot.viewport, target, now_ms));
    }

    /// Stop a camera's transition where it is.
    pub fn cancel_animation(&mut self, camera: CameraIndex) {
        if let Some(slot) = self.slots.get_mut(camera) {
            slot.animation = None;
        }
    }

    /// Advance every transition to `now_ms`, writing and notifying each animated camera.
    ///
    /// Each sample is reclamped for the slot's container; `|pan|` never exceeds
    /// `pan_bound(zoom)` mid-transition.
    ///
    /// Returns true while any transition is still running; the host keeps
    /// scheduling frames until it returns false.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut written = Vec::new();
        for (camera, slot) in self.slots.iter_mut().enumerate() {
            let Some(animation) = slot.animation else {
                continue;
            };
            let sample = animation.sample(now_ms);
            slot.viewport = Viewport::new(sample.zoom, sample.pan, slot.container);
            if animation.is_finished(now_ms) {
                slot.animation = None;
            }
            written.push(camera);
        }
        for camera in written {
            self.notify(camera);
        }
        self.slots.iter().any(|s| s.animation.is_some())
    }

    fn manual(&mut self, camera: CameraIndex, write: impl FnOnce(&mut Viewport, Size)) {
        let Some(slot) = self.slots.get_mut(camera) else {
            return;
        };
        slot.animation = None;
        let before = slot.viewport;
        write(&mut slot.viewport, slot.container);
        if slot.viewport != before {
            self.notify(camera);
        }
    }

    fn notify(&mut self, camera: CameraIndex) {
        let viewport = self.get(camera);
        for (_, listener) in &mut self.listeners {
            listener(camera, &viewport);
        }
    }
}
