//! Inspector engine: routes pointer and keyboard input across the camera grid.
//!
//! `EngineCore` owns every piece of mutable inspection state: the viewport
//! store, the calibration registry for the current hangar, the task catalog
//! and per-task progress, and the gesture state machines. It never touches a
//! browser object, so the whole interaction model is testable natively. Input
//! handlers return [`Action`]s for the host to persist or react to.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use crate::calibration::{CalibrationRegistry, CalibrationTransform, CameraIndex, HangarId};
use crate::compose::CameraFrame;
use crate::consts::{CAMERA_SLOTS, ZOOM_STEP};
use crate::geometry::{Point, Rect, Size};
use crate::hit::hit_test;
use crate::input::{Button, DraftOutcome, InputState, Key, RegionDraft, Tool, WheelDelta};
use crate::store::ViewportStore;
use crate::task::{RegionId, TaskCatalog, TaskProgress, ValidationRegion};
use crate::viewport::Viewport;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    /// A new region was drawn and added to the selected task.
    RegionCommitted { camera: CameraIndex, task: String, region: ValidationRegion },
    /// The second click produced a rectangle below the minimum size.
    RegionDiscarded { camera: CameraIndex, rect: Rect },
    /// Region creation was abandoned before the second click.
    CreationCancelled,
    /// An existing region's validated state flipped.
    RegionToggled { task: String, id: RegionId, validated: bool },
    RenderNeeded,
}

/// A camera feed occupying one grid slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraSource {
    /// Name used to key task annotations (e.g. `"north-east"`).
    pub name: String,
    /// Native resolution of the feed in pixels.
    pub image: Size,
}

/// Core engine state: all logic that doesn't depend on a canvas element.
pub struct EngineCore {
    pub store: ViewportStore,
    pub calibration: CalibrationRegistry,
    pub hangar: HangarId,
    pub tasks: TaskCatalog,
    pub tool: Tool,
    pub input: InputState,
    cameras: Vec<CameraSource>,
    selected_task: Option<String>,
    progress: HashMap<String, TaskProgress>,
    draft: RegionDraft,
    draft_camera: Option<CameraIndex>,
    focused: CameraIndex,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: ViewportStore::default(),
            calibration: CalibrationRegistry::new(),
            hangar: HangarId::new(),
            tasks: TaskCatalog::new(),
            tool: Tool::default(),
            input: InputState::default(),
            cameras: vec![CameraSource::default(); CAMERA_SLOTS],
            selected_task: None,
            progress: HashMap::new(),
            draft: RegionDraft::default(),
            draft_camera: None,
            focused: 0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Bind a feed to a grid slot. Out-of-range slots are ignored.
    pub fn set_camera(&mut self, camera: CameraIndex, name: &str, image: Size) {
        if let Some(slot) = self.cameras.get_mut(camera) {
            *slot = CameraSource { name: name.to_owned(), image };
        }
    }

    /// Report a slot's laid-out container size.
    pub fn set_container(&mut self, camera: CameraIndex, container: Size) {
        self.store.set_container(camera, container);
    }

    /// Replace the task catalog. Progress for tasks that no longer exist is dropped.
    pub fn load_tasks(&mut self, tasks: TaskCatalog) {
        self.progress.retain(|id, _| tasks.get(id).is_some());
        if self.selected_task.as_deref().is_some_and(|id| tasks.get(id).is_none()) {
            self.selected_task = None;
        }
        self.tasks = tasks;
    }

    /// Switch the calibration set used for drawing and hit-testing.
    pub fn set_hangar(&mut self, hangar: &str) {
        hangar.clone_into(&mut self.hangar);
    }

    /// Set the active tool. Leaving region creation abandons any draft.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tool = tool;
        if tool != Tool::CreateRegion {
            return self.cancel_draft();
        }
        Vec::new()
    }

    /// Make `task_id` the current task and transition every bound camera to
    /// its first ROI preset, or back to the default view when it has none.
    ///
    /// Returns false (and changes nothing) for an unknown task.
    pub fn select_task(&mut self, task_id: &str, now_ms: f64) -> bool {
        let Some(task) = self.tasks.get(task_id) else {
            tracing::warn!(task_id, "select_task: unknown task");
            return false;
        };
        self.progress
            .entry(task.id.clone())
            .or_insert_with(|| TaskProgress::from_task(task));

        for (camera, source) in self.cameras.iter().enumerate() {
            if source.name.is_empty() {
                continue;
            }
            match task.first_roi(&source.name) {
                Some(roi) => self.store.apply_roi(camera, roi, Some(now_ms)),
                None => self.store.animate_to(camera, Viewport::default(), now_ms),
            }
        }
        tracing::info!(task_id, "task selected");
        self.selected_task = Some(task.id.clone());
        self.draft = RegionDraft::Inactive;
        self.draft_camera = None;
        true
    }

    /// Advance viewport transitions. Returns true while any is running.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.store.tick(now_ms)
    }

    // --- Queries ---

    #[must_use]
    pub fn selected_task(&self) -> Option<&str> {
        self.selected_task.as_deref()
    }

    #[must_use]
    pub fn camera(&self, camera: CameraIndex) -> Option<&CameraSource> {
        self.cameras.get(camera)
    }

    /// Camera slot that last received pointer input; keyboard zoom targets it.
    #[must_use]
    pub fn focused(&self) -> CameraIndex {
        self.focused
    }

    #[must_use]
    pub fn viewport(&self, camera: CameraIndex) -> Viewport {
        self.store.get(camera)
    }

    /// Calibration for a slot under the current hangar.
    #[must_use]
    pub fn calibration_for(&self, camera: CameraIndex) -> CalibrationTransform {
        self.calibration.get(&self.hangar, camera)
    }

    /// Current and baseline geometry of a slot; `None` until laid out.
    #[must_use]
    pub fn frame(&self, camera: CameraIndex) -> Option<CameraFrame> {
        let source = self.cameras.get(camera)?;
        CameraFrame::new(
            source.image,
            self.store.container(camera),
            &self.store.get(camera),
            &self.calibration_for(camera),
        )
    }

    /// Regions of the selected task on a slot.
    #[must_use]
    pub fn regions(&self, camera: CameraIndex) -> &[ValidationRegion] {
        let (Some(task_id), Some(source)) = (self.selected_task.as_deref(), self.cameras.get(camera)) else {
            return &[];
        };
        self.tasks.get(task_id).map(|t| t.regions(&source.name)).unwrap_or_default()
    }

    #[must_use]
    pub fn progress(&self, task_id: &str) -> Option<&TaskProgress> {
        self.progress.get(task_id)
    }

    /// Whether a region of the selected task has been acknowledged.
    #[must_use]
    pub fn is_validated(&self, region_id: &str) -> bool {
        self.selected_task
            .as_deref()
            .and_then(|t| self.progress.get(t))
            .is_some_and(|p| p.is_validated(region_id))
    }

    /// In-progress region rectangle on `camera`, in image pixels.
    #[must_use]
    pub fn draft_preview(&self, camera: CameraIndex) -> Option<Rect> {
        if self.draft_camera != Some(camera) {
            return None;
        }
        self.draft.preview()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, camera: CameraIndex, screen_pt: Point, button: Button) -> Vec<Action> {
        if camera >= self.cameras.len() {
            return Vec::new();
        }
        self.focused = camera;
        match (button, self.tool) {
            (Button::Middle, _) => self.begin_pan(camera, screen_pt),
            (Button::Primary, Tool::CreateRegion) => self.place_corner(camera, screen_pt),
            (Button::Primary, Tool::Inspect) => match self.toggle_at(camera, screen_pt) {
                Some(actions) => actions,
                None => self.begin_pan(camera, screen_pt),
            },
            (Button::Secondary, _) => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, camera: CameraIndex, screen_pt: Point) -> Vec<Action> {
        if let InputState::Panning { camera: panned, last_screen } = self.input {
            let before = self.store.get(panned);
            self.store.drag(panned, screen_pt - last_screen);
            self.input = InputState::Panning { camera: panned, last_screen: screen_pt };
            return if self.store.get(panned) == before { Vec::new() } else { vec![Action::RenderNeeded] };
        }

        if self.draft_camera == Some(camera)
            && let Some(frame) = self.frame(camera)
            && self.draft.pointer_move(frame.current.screen_to_image(screen_pt))
        {
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    pub fn on_pointer_up(&mut self, _camera: CameraIndex, _screen_pt: Point, _button: Button) -> Vec<Action> {
        self.input = InputState::Idle;
        Vec::new()
    }

    /// Scroll up zooms in by one step; scroll down zooms out.
    pub fn on_wheel(&mut self, camera: CameraIndex, _screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        if camera >= self.cameras.len() {
            return Vec::new();
        }
        self.focused = camera;
        let factor = if delta.dy < 0.0 {
            ZOOM_STEP
        } else if delta.dy > 0.0 {
            1.0 / ZOOM_STEP
        } else {
            return Vec::new();
        };
        self.zoom_camera(camera, factor)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let camera = self.focused;
        match key.0.as_str() {
            "Escape" => self.cancel_draft(),
            "+" | "=" => self.zoom_camera(camera, ZOOM_STEP),
            "-" => self.zoom_camera(camera, 1.0 / ZOOM_STEP),
            "0" => {
                let before = self.store.get(camera);
                self.store.reset(camera);
                if self.store.get(camera) == before { Vec::new() } else { vec![Action::RenderNeeded] }
            }
            _ => Vec::new(),
        }
    }

    // --- Internals ---

    fn zoom_camera(&mut self, camera: CameraIndex, factor: f64) -> Vec<Action> {
        let before = self.store.get(camera);
        self.store.zoom_by(camera, factor);
        if self.store.get(camera) == before { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    fn begin_pan(&mut self, camera: CameraIndex, screen_pt: Point) -> Vec<Action> {
        if self.store.get(camera).zoom <= 1.0 {
            return Vec::new();
        }
        self.store.cancel_animation(camera);
        self.input = InputState::Panning { camera, last_screen: screen_pt };
        Vec::new()
    }

    /// Toggle the first region under the pointer. `None` on a miss.
    fn toggle_at(&mut self, camera: CameraIndex, screen_pt: Point) -> Option<Vec<Action>> {
        let frame = self.frame(camera)?;
        let task_id = self.selected_task.clone()?;
        let region_id = hit_test(screen_pt, self.regions(camera), &frame)?.region.id.clone();

        let progress = self.progress.entry(task_id.clone()).or_default();
        let validated = progress.toggle(&region_id);
        tracing::debug!(task = %task_id, region = %region_id, validated, "region toggled");
        Some(vec![Action::RegionToggled { task: task_id, id: region_id, validated }, Action::RenderNeeded])
    }

    fn place_corner(&mut self, camera: CameraIndex, screen_pt: Point) -> Vec<Action> {
        let Some(task_id) = self.selected_task.clone() else {
            tracing::debug!("region creation ignored; no task selected");
            return Vec::new();
        };
        let Some(frame) = self.frame(camera) else {
            return Vec::new();
        };
        if self.draft_camera.is_some_and(|c| c != camera) {
            self.draft.cancel();
        }
        self.draft_camera = Some(camera);

        let image_pt = frame.current.screen_to_image(screen_pt);
        match self.draft.click(image_pt, frame.current.image) {
            DraftOutcome::Armed => vec![Action::RenderNeeded],
            DraftOutcome::Committed(rect) => {
                self.draft_camera = None;
                let region = ValidationRegion::new(rect);
                let name = self.cameras.get(camera).map(|c| c.name.clone()).unwrap_or_default();
                if !self.tasks.add_region(&task_id, &name, region.clone()) {
                    tracing::warn!(task = %task_id, camera, "region dropped; task no longer loaded");
                    self.selected_task = None;
                    return vec![Action::RegionDiscarded { camera, rect: region.rect() }, Action::RenderNeeded];
                }
                tracing::info!(task = %task_id, camera, region = %region.id, "region created");
                vec![Action::RegionCommitted { camera, task: task_id, region }, Action::RenderNeeded]
            }
            DraftOutcome::Discarded(rect) => {
                self.draft_camera = None;
                vec![Action::RegionDiscarded { camera, rect }, Action::RenderNeeded]
            }
            DraftOutcome::Cancelled | DraftOutcome::Ignored => Vec::new(),
        }
    }

    fn cancel_draft(&mut self) -> Vec<Action> {
        self.draft_camera = None;
        match self.draft.cancel() {
            DraftOutcome::Cancelled => vec![Action::CreationCancelled, Action::RenderNeeded],
            _ => Vec::new(),
        }
    }
}
