//! Subcommand handlers. Each returns the JSON document it prints.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::time::Duration;

use serde_json::{Value, json};
use viewport::calibration::CameraIndex;
use viewport::consts::{ANIMATION_DURATION_MS, CAMERA_SLOTS};
use viewport::geometry::{Point, Rect};
use viewport::hit::hit_test;
use viewport::render::{DrawLog, draw_engine_camera};
use viewport::roi::{NormalizedRoi, PixelRect, apply_rectangle, apply_roi};

use crate::config::ViewArgs;
use crate::error::CliError;
use crate::session::Session;

/// Capture a view as a preset, in fractions and in image pixels.
///
/// # Errors
///
/// Returns [`CliError::UnknownCamera`] for an out-of-range slot.
pub fn capture(session: &mut Session, view: &ViewArgs) -> Result<Value, CliError> {
    let viewport = session.view(view)?;
    let roi = session.core.store.capture_roi(view.camera);
    let pixels = roi.to_pixels(session.config.image);
    Ok(json!({ "camera": view.camera, "viewport": viewport, "roi": roi, "pixels": pixels }))
}

/// The viewport that frames `rect`.
#[must_use]
pub fn apply(session: &Session, rect: Rect, pixels: bool) -> Value {
    let container = session.config.container;
    let viewport = if pixels {
        apply_rectangle(&PixelRect::from(rect), container, session.config.image)
    } else {
        apply_roi(&NormalizedRoi::new(rect.x, rect.y, rect.width, rect.height), container)
    };
    json!({ "viewport": viewport })
}

/// Draw calls for one camera cell, optionally with a task's regions.
///
/// # Errors
///
/// Returns [`CliError::UnknownTask`] or [`CliError::UnknownCamera`].
pub fn render(session: &mut Session, view: &ViewArgs, task: Option<&str>) -> Result<Value, CliError> {
    if let Some(task) = task {
        session.select_task(task)?;
    }
    session.view(view)?;
    let mut log = DrawLog::new();
    let Ok(()) = draw_engine_camera(&mut log, &session.core, view.camera);
    Ok(serde_json::to_value(&log)?)
}

/// Hit-test `at` against the task's regions on the camera.
///
/// # Errors
///
/// Returns [`CliError::UnknownTask`] or [`CliError::UnknownCamera`].
pub fn hit(session: &mut Session, view: &ViewArgs, task: &str, at: Point) -> Result<Value, CliError> {
    session.select_task(task)?;
    session.view(view)?;
    let core = &session.core;
    let Some(frame) = core.frame(view.camera) else {
        return Ok(json!({ "hit": Value::Null, "imagePoint": Value::Null }));
    };
    let region = hit_test(at, core.regions(view.camera), &frame).map(|h| h.region);
    Ok(json!({ "hit": region, "imagePoint": frame.current.screen_to_image(at) }))
}

/// Calibration in effect for every slot under the session's hangar.
///
/// # Errors
///
/// Returns [`CliError::Json`] if the registry can't be serialized.
pub fn calibration(session: &Session) -> Result<Value, CliError> {
    let core = &session.core;
    let cameras: Vec<Value> = (0..CAMERA_SLOTS)
        .map(|camera| {
            let transform = core.calibration_for(camera);
            let name = core.camera(camera).map(|c| c.name.as_str()).unwrap_or_default();
            json!({ "camera": camera, "name": name, "transform": transform, "alpha": transform.alpha() })
        })
        .collect();
    let registry: Value = serde_json::from_str(&core.calibration.to_json()?)?;
    Ok(json!({ "hangar": core.hangar, "cameras": cameras, "registry": registry }))
}

/// Advance the session's transitions to `now_ms` and describe the frame.
///
/// Returns the frame and whether any transition is still running.
pub fn animation_frame(session: &mut Session, now_ms: f64) -> (Value, bool) {
    let running = session.core.tick(now_ms);
    let viewports: Vec<Value> = (0..CAMERA_SLOTS)
        .filter(|&camera| session.core.camera(camera).is_some_and(|c| !c.name.is_empty()))
        .map(|camera: CameraIndex| json!({ "camera": camera, "viewport": session.core.viewport(camera) }))
        .collect();
    (json!({ "t": now_ms, "viewports": viewports }), running)
}

/// Select a task and stream its transition at `fps`, one JSON line per frame.
///
/// Frames are timestamped on a virtual clock starting at zero, so output is
/// reproducible; the interval only paces printing.
///
/// # Errors
///
/// Returns [`CliError::UnknownTask`] or [`CliError::Json`].
pub async fn animate(session: &mut Session, task: &str, fps: u32) -> Result<(), CliError> {
    if !session.core.select_task(task, 0.0) {
        return Err(CliError::UnknownTask(task.to_owned()));
    }
    let step_ms = 1000.0 / f64::from(fps.max(1));
    let mut interval = tokio::time::interval(Duration::from_secs_f64(step_ms / 1000.0));
    tracing::info!(task, fps, duration_ms = ANIMATION_DURATION_MS, "animating");

    let mut now_ms = 0.0;
    loop {
        interval.tick().await;
        let (frame, running) = animation_frame(session, now_ms);
        println!("{}", serde_json::to_string(&frame)?);
        if !running {
            return Ok(());
        }
        now_ms += step_ms;
    }
}

pub fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
