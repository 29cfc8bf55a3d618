#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn rect_approx_eq(a: Rect, b: Rect) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

fn uhd() -> Size {
    Size::new(3840.0, 2160.0)
}

fn container() -> Size {
    Size::new(800.0, 450.0)
}

fn identity() -> CalibrationTransform {
    CalibrationTransform::IDENTITY
}

fn view(zoom: f64, x: f64, y: f64) -> Viewport {
    Viewport { zoom, pan: Point::new(x, y) }
}

// =============================================================
// Fit
// =============================================================

#[test]
fn fit_same_aspect_fills_container() {
    let g = DrawGeometry::compute(uhd(), container(), &Viewport::default(), &identity()).unwrap();
    assert!(rect_approx_eq(g.fit, Rect::new(0.0, 0.0, 800.0, 450.0)));
}

#[test]
fn fit_square_image_is_pillarboxed() {
    let g = DrawGeometry::compute(Size::new(1000.0, 1000.0), container(), &Viewport::default(), &identity()).unwrap();
    assert!(rect_approx_eq(g.fit, Rect::new(175.0, 0.0, 450.0, 450.0)));
}

#[test]
fn fit_wide_image_is_letterboxed() {
    let g = DrawGeometry::compute(Size::new(1600.0, 400.0), container(), &Viewport::default(), &identity()).unwrap();
    assert!(rect_approx_eq(g.fit, Rect::new(0.0, 125.0, 800.0, 200.0)));
}

// =============================================================
// Zoom / pan
// =============================================================

#[test]
fn zoom_two_centers_scaled_image() {
    let g = DrawGeometry::compute(uhd(), container(), &view(2.0, 0.0, 0.0), &identity()).unwrap();
    assert!(rect_approx_eq(g.zoomed, Rect::new(-400.0, -225.0, 1600.0, 900.0)));
}

#[test]
fn pan_shifts_by_pan_over_zoom() {
    let g = DrawGeometry::compute(uhd(), container(), &view(2.0, 200.0, -100.0), &identity()).unwrap();
    assert!(approx_eq(g.zoomed.x, -300.0));
    assert!(approx_eq(g.zoomed.y, -275.0));
}

#[test]
fn zoom_on_pillarboxed_image_stays_centered() {
    let g = DrawGeometry::compute(Size::new(1000.0, 1000.0), container(), &view(2.0, 0.0, 0.0), &identity()).unwrap();
    assert!(point_approx_eq(g.zoomed.center(), Point::new(400.0, 225.0)));
    assert!(approx_eq(g.zoomed.width, 900.0));
}

#[test]
fn zoom_on_letterboxed_image_centers_on_fit() {
    let g = DrawGeometry::compute(Size::new(1600.0, 400.0), container(), &view(2.0, 0.0, 0.0), &identity()).unwrap();
    // Fit is (0, 125, 800, 200); the letterbox offset is applied once.
    assert!(rect_approx_eq(g.zoomed, Rect::new(-400.0, 25.0, 1600.0, 400.0)));
    assert!(point_approx_eq(g.zoomed.center(), Point::new(400.0, 225.0)));
}

#[test]
fn degenerate_inputs_yield_none() {
    assert!(DrawGeometry::compute(uhd(), Size::new(0.0, 450.0), &Viewport::default(), &identity()).is_none());
    assert!(DrawGeometry::compute(Size::new(0.0, 0.0), container(), &Viewport::default(), &identity()).is_none());
    assert!(CameraFrame::new(uhd(), Size::new(800.0, 0.0), &Viewport::default(), &identity()).is_none());
}

// =============================================================
// Calibration
// =============================================================

#[test]
fn identity_calibration_is_pixel_identical_to_uncalibrated() {
    for v in [view(1.0, 0.0, 0.0), view(2.0, 150.0, -75.0), view(7.3, -999.0, 321.0), view(10.0, 1.0, 1.0)] {
        let g = DrawGeometry::compute(uhd(), container(), &v, &identity()).unwrap();
        assert_eq!(g.frame, g.zoomed);
        assert!(!g.is_rotated_or_flipped());
        assert_eq!(g.alpha, 1.0);
    }
}

#[test]
fn translation_scales_with_container_min_side() {
    let cal = CalibrationTransform { translate_x: 50.0, translate_y: -100.0, ..identity() };
    let g = DrawGeometry::compute(uhd(), container(), &Viewport::default(), &cal).unwrap();
    // unit = 450 / 500 = 0.9
    assert!(point_approx_eq(g.center(), Point::new(400.0 + 45.0, 225.0 - 90.0)));
    assert!(approx_eq(g.frame.width, 800.0));
}

#[test]
fn calibration_anchors_at_zoomed_center() {
    let cal = CalibrationTransform { translate_x: 10.0, scale: 1.5, ..identity() };
    let v = view(2.0, 200.0, 0.0);
    let g = DrawGeometry::compute(uhd(), container(), &v, &cal).unwrap();
    let expected_center = g.zoomed.center() + Point::new(9.0, 0.0);
    assert!(point_approx_eq(g.center(), expected_center));
    assert!(approx_eq(g.frame.width, 1600.0 * 1.5));
    assert!(approx_eq(g.frame.height, 900.0 * 1.5));
}

#[test]
fn rotation_and_flip_are_carried() {
    let cal = CalibrationTransform { rotation: 90.0, flipped: true, opacity: 50.0, ..identity() };
    let g = DrawGeometry::compute(uhd(), container(), &Viewport::default(), &cal).unwrap();
    assert!(approx_eq(g.rotation, std::f64::consts::FRAC_PI_2));
    assert!(g.flipped);
    assert!(g.is_rotated_or_flipped());
    assert!(approx_eq(g.alpha, 0.5));
}

// =============================================================
// Point mapping
// =============================================================

#[test]
fn image_to_screen_identity_zoom_one() {
    let g = DrawGeometry::compute(uhd(), container(), &Viewport::default(), &identity()).unwrap();
    assert!(point_approx_eq(g.image_to_screen(Point::new(1920.0, 1080.0)), Point::new(400.0, 225.0)));
    assert!(point_approx_eq(g.image_to_screen(Point::new(0.0, 0.0)), Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_image_matches_uncalibrated_formula() {
    let v = view(3.0, 120.0, -60.0);
    let g = DrawGeometry::compute(uhd(), container(), &v, &identity()).unwrap();
    let mouse = Point::new(310.0, 97.0);
    let expected_x = (mouse.x - g.zoomed.x) * 3840.0 / g.zoomed.width;
    let expected_y = (mouse.y - g.zoomed.y) * 2160.0 / g.zoomed.height;
    assert!(point_approx_eq(g.screen_to_image(mouse), Point::new(expected_x, expected_y)));
}

#[test]
fn rotated_flipped_mapping_round_trips() {
    let cal = CalibrationTransform { translate_x: 12.0, translate_y: -8.0, scale: 1.1, rotation: 17.0, flipped: true, opacity: 100.0 };
    let g = DrawGeometry::compute(uhd(), container(), &view(2.5, 90.0, 40.0), &cal).unwrap();
    for pt in [Point::new(0.0, 0.0), Point::new(1234.0, 567.0), Point::new(3840.0, 2160.0)] {
        let back = g.screen_to_image(g.image_to_screen(pt));
        assert!((back.x - pt.x).abs() < 1e-6 && (back.y - pt.y).abs() < 1e-6);
    }
}

#[test]
fn quarter_turn_rotates_around_image_center() {
    let cal = CalibrationTransform { rotation: 90.0, ..identity() };
    let image = Size::new(800.0, 450.0);
    let g = DrawGeometry::compute(image, container(), &Viewport::default(), &cal).unwrap();
    // (600, 225) is 200 px right of center; a clockwise quarter turn puts it 200 px below.
    assert!(point_approx_eq(g.image_to_screen(Point::new(600.0, 225.0)), Point::new(400.0, 425.0)));
}

#[test]
fn flip_mirrors_horizontally() {
    let cal = CalibrationTransform { flipped: true, ..identity() };
    let image = Size::new(800.0, 450.0);
    let g = DrawGeometry::compute(image, container(), &Viewport::default(), &cal).unwrap();
    assert!(point_approx_eq(g.image_to_screen(Point::new(100.0, 50.0)), Point::new(700.0, 50.0)));
}

// =============================================================
// Overlay placement
// =============================================================

#[test]
fn overlay_identity_zoom_one_matches_region() {
    let image = Size::new(800.0, 450.0);
    let frame = CameraFrame::new(image, container(), &Viewport::default(), &identity()).unwrap();
    let placed = frame.place(Rect::new(100.0, 100.0, 200.0, 150.0));
    assert!(rect_approx_eq(placed.rect(), Rect::new(100.0, 100.0, 200.0, 150.0)));
    assert!(!placed.is_rotated());
}

#[test]
fn overlay_scales_with_zoom() {
    let image = Size::new(800.0, 450.0);
    let frame = CameraFrame::new(image, container(), &view(2.0, 0.0, 0.0), &identity()).unwrap();
    let placed = frame.place(Rect::new(100.0, 100.0, 200.0, 150.0));
    assert!(rect_approx_eq(placed.rect(), Rect::new(-200.0, -25.0, 400.0, 300.0)));
}

#[test]
fn overlay_tracks_image_center_under_calibration() {
    let cal = CalibrationTransform { translate_x: 40.0, translate_y: 25.0, scale: 0.9, rotation: 12.0, flipped: true, opacity: 70.0 };
    let v = view(3.0, -240.0, 180.0);
    let frame = CameraFrame::new(uhd(), container(), &v, &cal).unwrap();
    let region = Rect::new(500.0, 300.0, 400.0, 220.0);
    let placed = frame.place(region);

    let expected_center = frame.current.image_to_screen(region.center());
    assert!((placed.center.x - expected_center.x).abs() < 1e-6);
    assert!((placed.center.y - expected_center.y).abs() < 1e-6);
    assert!(approx_eq(placed.size.width, 400.0 * frame.current.pixel_scale()));
    assert!(approx_eq(placed.rotation, 12f64.to_radians()));
}

#[test]
fn overlay_differs_from_rotation_about_container_center() {
    let cal = CalibrationTransform { translate_x: 100.0, rotation: 30.0, ..identity() };
    let v = view(2.0, 400.0, 0.0);
    let frame = CameraFrame::new(uhd(), container(), &v, &cal).unwrap();
    let region = Rect::new(1000.0, 500.0, 200.0, 200.0);
    let placed = frame.place(region);

    let container_center = Point::new(400.0, 225.0);
    let unrotated = frame.current.frame;
    let naive_local = Point::new(
        unrotated.x + region.center().x * frame.current.pixel_scale(),
        unrotated.y + region.center().y * frame.current.pixel_scale(),
    ) - container_center;
    let naive = container_center + naive_local.rotate(frame.current.rotation);
    assert!((placed.center.x - naive.x).abs() > 1.0 || (placed.center.y - naive.y).abs() > 1.0);
}

#[test]
fn overlay_contains_respects_rotation() {
    let placement = OverlayPlacement {
        center: Point::new(100.0, 100.0),
        size: Size::new(200.0, 20.0),
        rotation: std::f64::consts::FRAC_PI_2,
    };
    // After a quarter turn the long side runs vertically.
    assert!(placement.contains(Point::new(100.0, 190.0)));
    assert!(!placement.contains(Point::new(190.0, 100.0)));
}
