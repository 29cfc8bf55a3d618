//! Task model: per-camera ROI presets and validation regions, plus the catalog
//! that owns them and per-task validation progress.
//!
//! Task definitions arrive as JSON from the workflow backend. They are parsed
//! once into these types; ROI presets are clamped into the unit square and
//! region rectangles are normalized to non-negative extents at load, so the
//! rest of the crate never re-validates them.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LoadError;
use crate::geometry::{Point, Rect};
use crate::roi::NormalizedRoi;

/// Identifier of a validation region.
pub type RegionId = String;

/// An area of a camera image the inspector must explicitly acknowledge.
///
/// Coordinates are source image pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRegion {
    pub id: RegionId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub validated: bool,
}

impl ValidationRegion {
    /// A fresh, unvalidated region with a random id.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label: String::new(),
            description: String::new(),
            validated: false,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Re-express with non-negative width and height.
    fn normalized(mut self) -> Self {
        let r = Rect::from_corners(Point::new(self.x, self.y), Point::new(self.x + self.width, self.y + self.height));
        self.x = r.x;
        self.y = r.y;
        self.width = r.width;
        self.height = r.height;
        self
    }
}

/// Everything a task defines for one camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraAnnotations {
    #[serde(default)]
    pub rois: Vec<NormalizedRoi>,
    #[serde(default)]
    pub regions: Vec<ValidationRegion>,
}

/// One checklist item of an inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Annotations keyed by camera name.
    #[serde(default)]
    pub cameras: BTreeMap<String, CameraAnnotations>,
}

impl Task {
    #[must_use]
    pub fn camera(&self, name: &str) -> Option<&CameraAnnotations> {
        self.cameras.get(name)
    }

    /// The preset a camera jumps to when this task is selected.
    #[must_use]
    pub fn first_roi(&self, camera: &str) -> Option<&NormalizedRoi> {
        self.camera(camera).and_then(|c| c.rois.first())
    }

    /// Regions on `camera` in hit-test order.
    #[must_use]
    pub fn regions(&self, camera: &str) -> &[ValidationRegion] {
        self.camera(camera)
            .map(|c| c.regions.as_slice())
            .unwrap_or_default()
    }

    /// Ids of every region across all cameras.
    pub fn region_ids(&self) -> impl Iterator<Item = &RegionId> {
        self.cameras.values().flat_map(|c| c.regions.iter().map(|r| &r.id))
    }
}

/// In-memory store of task definitions, in load order.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    tasks: Vec<Task>,
}

impl TaskCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of task definitions.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed payloads and
    /// [`LoadError::MissingTaskId`] when a task id is blank.
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let tasks: Vec<Task> = serde_json::from_str(raw)?;
        let mut catalog = Self::new();
        for (index, task) in tasks.into_iter().enumerate() {
            if task.id.trim().is_empty() {
                return Err(LoadError::MissingTaskId(index));
            }
            catalog.insert(task);
        }
        tracing::debug!(tasks = catalog.len(), "task catalog loaded");
        Ok(catalog)
    }

    /// Insert or replace a task by id, normalizing its annotations.
    pub fn insert(&mut self, mut task: Task) {
        for camera in task.cameras.values_mut() {
            camera.rois = camera.rois.iter().map(NormalizedRoi::clamped).collect();
            camera.regions = std::mem::take(&mut camera.regions)
                .into_iter()
                .map(ValidationRegion::normalized)
                .collect();
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a region to a task's camera, creating the camera entry if needed.
    /// Returns false if the task doesn't exist.
    pub fn add_region(&mut self, task_id: &str, camera: &str, region: ValidationRegion) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };
        task.cameras
            .entry(camera.to_owned())
            .or_default()
            .regions
            .push(region.normalized());
        true
    }

    /// Remove a region by id from any camera of a task.
    pub fn remove_region(&mut self, task_id: &str, region_id: &str) -> Option<ValidationRegion> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        for camera in task.cameras.values_mut() {
            if let Some(index) = camera.regions.iter().position(|r| r.id == region_id) {
                return Some(camera.regions.remove(index));
            }
        }
        None
    }

    /// All tasks in load order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Validation state of one task: the set of acknowledged region ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskProgress {
    validated: HashSet<RegionId>,
}

impl TaskProgress {
    /// Seed from the `validated` flags carried in the task definition.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        let validated = task
            .cameras
            .values()
            .flat_map(|c| c.regions.iter())
            .filter(|r| r.validated)
            .map(|r| r.id.clone())
            .collect();
        Self { validated }
    }

    /// Flip a region's state; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.validated.remove(id) {
            false
        } else {
            self.validated.insert(id.to_owned());
            true
        }
    }

    pub fn set(&mut self, id: &str, validated: bool) {
        if validated {
            self.validated.insert(id.to_owned());
        } else {
            self.validated.remove(id);
        }
    }

    #[must_use]
    pub fn is_validated(&self, id: &str) -> bool {
        self.validated.contains(id)
    }

    /// Every region of every camera has been acknowledged. Tasks without regions are complete.
    #[must_use]
    pub fn is_complete(&self, task: &Task) -> bool {
        task.region_ids().all(|id| self.validated.contains(id))
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.validated.len()
    }
}
