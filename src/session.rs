//! Loaded inspection state for one command invocation.
//!
//! A `Session` reads the task and calibration files once, binds camera names
//! to grid slots, lays every slot out at the configured container size, and
//! hands out the resulting [`EngineCore`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeSet;
use std::path::Path;

use viewport::calibration::{CalibrationRegistry, CameraIndex};
use viewport::consts::CAMERA_SLOTS;
use viewport::engine::EngineCore;
use viewport::geometry::Size;
use viewport::task::TaskCatalog;
use viewport::viewport::Viewport;

use crate::config::{Cli, ViewArgs};
use crate::error::CliError;

/// Layout shared by every camera slot.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub hangar: String,
    pub cameras: Vec<String>,
    pub image: Size,
    pub container: Size,
}

impl From<&Cli> for SessionConfig {
    fn from(cli: &Cli) -> Self {
        Self { hangar: cli.hangar.clone(), cameras: cli.cameras.clone(), image: cli.image, container: cli.container }
    }
}

pub struct Session {
    pub core: EngineCore,
    pub config: SessionConfig,
}

impl Session {
    /// Read the configured files and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Read`] if a file can't be read and [`CliError::Load`]
    /// if its contents are rejected.
    pub fn load(cli: &Cli) -> Result<Self, CliError> {
        let tasks = cli.tasks.as_deref().map(read).transpose()?;
        let calibration = cli.calibration.as_deref().map(read).transpose()?;
        Self::from_sources(tasks.as_deref(), calibration.as_deref(), SessionConfig::from(cli))
    }

    /// Build from in-memory payloads. Missing payloads mean no tasks or no calibration.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Load`] if a payload is rejected.
    pub fn from_sources(tasks: Option<&str>, calibration: Option<&str>, config: SessionConfig) -> Result<Self, CliError> {
        let tasks = tasks.map(TaskCatalog::from_json).transpose()?.unwrap_or_default();
        let calibration = calibration.map(CalibrationRegistry::from_json).transpose()?.unwrap_or_default();

        let names = if config.cameras.is_empty() { camera_names(&tasks) } else { config.cameras.clone() };
        if names.len() > CAMERA_SLOTS {
            tracing::warn!(cameras = names.len(), slots = CAMERA_SLOTS, "more cameras than grid slots; extra cameras ignored");
        }

        let mut core = EngineCore::new();
        for (camera, name) in names.iter().take(CAMERA_SLOTS).enumerate() {
            core.set_camera(camera, name, config.image);
            core.set_container(camera, config.container);
        }
        core.load_tasks(tasks);
        core.calibration = calibration;
        core.set_hangar(&config.hangar);

        tracing::debug!(hangar = %config.hangar, cameras = names.len().min(CAMERA_SLOTS), "session ready");
        Ok(Self { core, config })
    }

    /// Check a slot index against the grid.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownCamera`] past the last slot.
    pub fn camera(&self, camera: CameraIndex) -> Result<CameraIndex, CliError> {
        if camera < CAMERA_SLOTS { Ok(camera) } else { Err(CliError::UnknownCamera(camera)) }
    }

    /// Select a task without animating: every camera jumps to its preset.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownTask`] if the catalog has no such task.
    pub fn select_task(&mut self, task: &str) -> Result<(), CliError> {
        if !self.core.select_task(task, 0.0) {
            return Err(CliError::UnknownTask(task.to_owned()));
        }
        // Sampling past the transition lands every camera exactly on its target.
        self.core.tick(f64::MAX);
        Ok(())
    }

    /// Put a camera at the requested zoom and pan. Returns the normalized viewport.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownCamera`] past the last slot.
    pub fn view(&mut self, args: &ViewArgs) -> Result<Viewport, CliError> {
        let camera = self.camera(args.camera)?;
        self.core.store.set(camera, Viewport { zoom: args.zoom, pan: args.pan });
        Ok(self.core.viewport(camera))
    }
}

/// Every camera name referenced by the catalog, sorted.
#[must_use]
pub fn camera_names(tasks: &TaskCatalog) -> Vec<String> {
    let names: BTreeSet<&String> = tasks.tasks().iter().flat_map(|t| t.cameras.keys()).collect();
    names.into_iter().cloned().collect()
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}
