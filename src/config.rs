//! Command-line and environment configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use viewport::calibration::CameraIndex;
use viewport::geometry::{Point, Rect, Size};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "hangarview", about = "Camera viewport, ROI and calibration tool for hangar inspections")]
pub struct Cli {
    /// Task definitions (JSON array).
    #[arg(long, env = "HANGARVIEW_TASKS")]
    pub tasks: Option<PathBuf>,

    /// Calibration settings (hangar -> camera index -> transform).
    #[arg(long, env = "HANGARVIEW_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    #[arg(long, env = "HANGARVIEW_HANGAR", default_value = "baseline")]
    pub hangar: String,

    /// Camera names by slot, comma-separated. Defaults to the names used by the tasks.
    #[arg(long, env = "HANGARVIEW_CAMERAS", value_delimiter = ',')]
    pub cameras: Vec<String>,

    /// Grid cell size in pixels, `WIDTHxHEIGHT`.
    #[arg(long, default_value = "800x450", value_parser = parse_size)]
    pub container: Size,

    /// Native camera resolution, `WIDTHxHEIGHT`.
    #[arg(long, default_value = "3840x2160", value_parser = parse_size)]
    pub image: Size,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture a viewport as a normalized ROI preset.
    Capture(ViewArgs),
    /// Print the viewport that frames a preset.
    Apply {
        /// `x,y,width,height`; fractions unless `--pixels`.
        #[arg(value_parser = parse_rect, allow_hyphen_values = true)]
        roi: Rect,
        /// Interpret the rectangle in source image pixels.
        #[arg(long)]
        pixels: bool,
    },
    /// Record the draw calls for one camera cell.
    Render {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        task: Option<String>,
    },
    /// Hit-test a screen point against a task's regions.
    Hit {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        task: String,
        /// Screen point `x,y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,
    },
    /// Play the transition to a task's presets, one JSON line per frame.
    Animate {
        #[arg(long)]
        task: String,
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Print the calibration in effect for every camera slot.
    Calibration,
}

/// Camera slot and live view state.
#[derive(Args, Debug, Clone, Copy)]
pub struct ViewArgs {
    #[arg(long, default_value_t = 0)]
    pub camera: CameraIndex,
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,
    /// Pan offset `x,y`.
    #[arg(long, default_value = "0,0", value_parser = parse_point, allow_hyphen_values = true)]
    pub pan: Point,
}

/// Parse `WIDTHxHEIGHT`.
///
/// # Errors
///
/// Returns [`CliError::BadArgument`] unless both sides are positive numbers.
pub fn parse_size(raw: &str) -> Result<Size, CliError> {
    let bad = || CliError::BadArgument { what: "size", value: raw.to_owned(), expected: "WIDTHxHEIGHT" };
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(bad)?;
    let size = Size::new(number(w).ok_or_else(bad)?, number(h).ok_or_else(bad)?);
    if size.is_degenerate() {
        return Err(bad());
    }
    Ok(size)
}

/// Parse `x,y`.
///
/// # Errors
///
/// Returns [`CliError::BadArgument`] for anything but two numbers.
pub fn parse_point(raw: &str) -> Result<Point, CliError> {
    let bad = || CliError::BadArgument { what: "point", value: raw.to_owned(), expected: "x,y" };
    match numbers(raw).as_deref() {
        Some(&[x, y]) => Ok(Point::new(x, y)),
        _ => Err(bad()),
    }
}

/// Parse `x,y,width,height`.
///
/// # Errors
///
/// Returns [`CliError::BadArgument`] for anything but four numbers.
pub fn parse_rect(raw: &str) -> Result<Rect, CliError> {
    let bad = || CliError::BadArgument { what: "rectangle", value: raw.to_owned(), expected: "x,y,width,height" };
    match numbers(raw).as_deref() {
        Some(&[x, y, w, h]) => Ok(Rect::new(x, y, w, h)),
        _ => Err(bad()),
    }
}

fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn numbers(raw: &str) -> Option<Vec<f64>> {
    raw.split(',').map(number).collect()
}
