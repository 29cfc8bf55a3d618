//! Hit-testing pointer positions against validation regions.
//!
//! Every test recomputes each region's screen placement from the current
//! [`CameraFrame`], so a result is never carried over from an earlier zoom or
//! pan. Regions are tested in list order and the first hit wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::calibration::CalibrationTransform;
use crate::compose::CameraFrame;
use crate::geometry::{Point, Size};
use crate::task::ValidationRegion;
use crate::viewport::Viewport;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    /// Position of the region in the tested slice.
    pub index: usize,
    pub region: &'a ValidationRegion,
}

/// Test which region (if any) is under `screen_pt`.
#[must_use]
pub fn hit_test<'a>(screen_pt: Point, regions: &'a [ValidationRegion], frame: &CameraFrame) -> Option<Hit<'a>> {
    regions
        .iter()
        .enumerate()
        .find(|(_, region)| frame.place(region.rect()).contains(screen_pt))
        .map(|(index, region)| Hit { index, region })
}

/// [`hit_test`] for raw camera state. Degenerate geometry never hits.
#[must_use]
pub fn hit_test_camera<'a>(
    screen_pt: Point,
    regions: &'a [ValidationRegion],
    image: Size,
    container: Size,
    viewport: &Viewport,
    calibration: &CalibrationTransform,
) -> Option<Hit<'a>> {
    let frame = CameraFrame::new(image, container, viewport, calibration)?;
    hit_test(screen_pt, regions, &frame)
}
