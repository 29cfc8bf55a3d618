#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn container() -> Size {
    Size::new(800.0, 450.0)
}

fn store() -> ViewportStore {
    let mut store = ViewportStore::default();
    for camera in 0..store.len() {
        store.set_container(camera, container());
    }
    store
}

fn zoomed() -> Viewport {
    Viewport { zoom: 2.0, pan: Point::new(200.0, -100.0) }
}

// =============================================================
// Reads
// =============================================================

#[test]
fn default_has_eight_default_slots() {
    let store = ViewportStore::default();
    assert_eq!(store.len(), 8);
    assert!(!store.is_empty());
    for camera in 0..8 {
        assert_eq!(store.get(camera), Viewport::default());
        assert!(!store.is_animating(camera));
    }
}

#[test]
fn unknown_camera_reads_default() {
    let store = store();
    assert_eq!(store.get(42), Viewport::default());
    assert_eq!(store.container(42), Size::default());
}

#[test]
fn cameras_are_independent() {
    let mut store = store();
    store.set(3, zoomed());
    assert_eq!(store.get(3), zoomed());
    assert_eq!(store.get(2), Viewport::default());
}

// =============================================================
// Writes
// =============================================================

#[test]
fn set_normalizes_out_of_range_values() {
    let mut store = store();
    store.set(0, Viewport { zoom: 50.0, pan: Point::new(1e9, -1e9) });
    let v = store.get(0);
    assert_eq!(v.zoom, 10.0);
    let bound = crate::viewport::pan_bound(10.0, container());
    assert_eq!(v.pan, Point::new(bound.x, -bound.y));
}

#[test]
fn out_of_range_camera_write_is_noop() {
    let mut store = store();
    store.set(99, zoomed());
    store.zoom_by(99, 2.0);
    store.drag(99, Point::new(5.0, 5.0));
    store.animate_to(99, zoomed(), 0.0);
    assert!(!store.tick(100.0));
}

#[test]
fn zoom_by_multiplies_and_resets_at_one() {
    let mut store = store();
    store.zoom_by(0, 2.0);
    assert_eq!(store.get(0).zoom, 2.0);
    store.zoom_by(0, 0.25);
    assert_eq!(store.get(0), Viewport::default());
}

#[test]
fn drag_moves_pan_when_zoomed() {
    let mut store = store();
    store.set(0, Viewport { zoom: 2.0, pan: Point::default() });
    store.drag(0, Point::new(10.0, -5.0));
    assert_eq!(store.get(0).pan, Point::new(20.0, -10.0));
}

#[test]
fn drag_at_zoom_one_is_noop() {
    let mut store = store();
    store.drag(0, Point::new(10.0, 10.0));
    assert_eq!(store.get(0), Viewport::default());
}

#[test]
fn reset_restores_default() {
    let mut store = store();
    store.set(1, zoomed());
    store.reset(1);
    assert_eq!(store.get(1), Viewport::default());
}

#[test]
fn shrinking_container_reclamps_pan() {
    let mut store = store();
    store.set(0, Viewport { zoom: 2.0, pan: Point::new(800.0, 450.0) });
    store.set_container(0, Size::new(400.0, 225.0));
    assert_eq!(store.get(0).pan, Point::new(400.0, 225.0));
    assert_eq!(store.container(0), Size::new(400.0, 225.0));
}

#[test]
fn degenerate_container_keeps_viewport() {
    let mut store = store();
    store.set(0, zoomed());
    store.set_container(0, Size::default());
    assert_eq!(store.get(0), zoomed());
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn subscribers_see_every_write() {
    let mut store = store();
    let seen: Rc<RefCell<Vec<(CameraIndex, Viewport)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    store.subscribe(move |camera, v| sink.borrow_mut().push((camera, *v)));

    store.set(2, zoomed());
    store.reset(2);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], (2, zoomed()));
    assert_eq!(seen[1], (2, Viewport::default()));
}

#[test]
fn unchanged_write_does_not_notify() {
    let mut store = store();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    store.subscribe(move |_, _| *sink.borrow_mut() += 1);
    store.reset(0);
    store.drag(0, Point::new(3.0, 3.0));
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut store = store();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);
    store.set(0, zoomed());
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.reset(0);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn subscription_ids_are_distinct() {
    let mut store = store();
    let a = store.subscribe(|_, _| {});
    let b = store.subscribe(|_, _| {});
    assert_ne!(a, b);
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn animation_reaches_target_exactly() {
    let mut store = store();
    store.animate_to(0, zoomed(), 1000.0);
    assert!(store.is_animating(0));
    assert!(store.tick(1400.0));
    let mid = store.get(0);
    assert!(mid.zoom > 1.0 && mid.zoom < 2.0);
    assert!(!store.tick(1800.0));
    assert_eq!(store.get(0), zoomed());
    assert!(!store.is_animating(0));
}

#[test]
fn animation_notifies_each_tick() {
    let mut store = store();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    store.subscribe(move |_, _| *sink.borrow_mut() += 1);
    store.animate_to(0, zoomed(), 0.0);
    store.tick(100.0);
    store.tick(200.0);
    store.tick(900.0);
    store.tick(1000.0);
    assert_eq!(*count.borrow(), 3);
}

#[test]
fn new_target_supersedes_from_current_position() {
    let mut store = store();
    store.animate_to(0, zoomed(), 0.0);
    store.tick(400.0);
    let midway = store.get(0);

    let second = Viewport { zoom: 4.0, pan: Point::default() };
    store.animate_to(0, second, 400.0);
    // Restarted: at its own start the new transition sits where the old one was.
    store.tick(400.0);
    assert_eq!(store.get(0), midway);
    store.tick(1200.0);
    assert_eq!(store.get(0), second);
}

#[test]
fn drag_cancels_animation() {
    let mut store = store();
    store.set(0, Viewport { zoom: 2.0, pan: Point::default() });
    store.animate_to(0, Viewport { zoom: 4.0, pan: Point::default() }, 0.0);
    store.tick(400.0);
    let before_drag = store.get(0);

    store.drag(0, Point::new(5.0, 0.0));
    assert!(!store.is_animating(0));
    assert!(!store.tick(800.0));
    let after = store.get(0);
    assert_eq!(after.zoom, before_drag.zoom);
    assert!(approx_eq(after.pan.x, before_drag.zoom * 5.0));
}

#[test]
fn zoom_and_reset_cancel_animation() {
    let mut store = store();
    store.animate_to(0, zoomed(), 0.0);
    store.zoom_by(0, 1.1);
    assert!(!store.is_animating(0));

    store.animate_to(1, zoomed(), 0.0);
    store.reset(1);
    assert!(!store.is_animating(1));
    assert_eq!(store.get(1), Viewport::default());
}

#[test]
fn transition_to_corner_stays_within_pan_bound() {
    let mut store = store();
    let target = Viewport::new(3.0, Point::new(1e9, 1e9), container());
    store.animate_to(0, target, 0.0);
    for step in 0..=80 {
        store.tick(f64::from(step) * 10.0);
        let v = store.get(0);
        let bound = crate::viewport::pan_bound(v.zoom, container());
        assert!(v.pan.x.abs() <= bound.x + EPSILON, "t={} pan.x={} bound.x={}", step * 10, v.pan.x, bound.x);
        assert!(v.pan.y.abs() <= bound.y + EPSILON, "t={} pan.y={} bound.y={}", step * 10, v.pan.y, bound.y);
    }
    assert_eq!(store.get(0), target);
}

#[test]
fn drag_after_cancelled_transition_does_not_jump() {
    let mut store = store();
    store.animate_to(0, Viewport::new(3.0, Point::new(1e9, 1e9), container()), 0.0);
    store.tick(200.0);
    let mid = store.get(0);
    store.drag(0, Point::new(-1.0, 0.0));
    let after = store.get(0);
    assert!(!store.is_animating(0));
    assert!(approx_eq(after.pan.x, mid.pan.x - mid.zoom));
    assert!(approx_eq(after.pan.y, mid.pan.y));
}

#[test]
fn cancel_animation_freezes_in_place() {
    let mut store = store();
    store.animate_to(0, zoomed(), 0.0);
    store.tick(200.0);
    let frozen = store.get(0);
    store.cancel_animation(0);
    store.tick(900.0);
    assert_eq!(store.get(0), frozen);
}

#[test]
fn tick_reports_any_running_camera() {
    let mut store = store();
    store.animate_to(0, zoomed(), 0.0);
    store.animate_to(5, zoomed(), 500.0);
    assert!(store.tick(800.0));
    assert!(!store.is_animating(0));
    assert!(store.is_animating(5));
    assert!(!store.tick(1300.0));
}

// =============================================================
// ROI presets
// =============================================================

#[test]
fn apply_roi_immediate_sets_viewport() {
    let mut store = store();
    let roi = NormalizedRoi::new(0.25, 0.25, 0.5, 0.5);
    store.apply_roi(0, &roi, None);
    let v = store.get(0);
    assert_eq!(v.zoom, 2.0);
    assert!(approx_eq(v.pan.x, 0.0));
    assert!(approx_eq(v.pan.y, 0.0));
}

#[test]
fn apply_roi_animated_then_capture_round_trips() {
    let mut store = store();
    let roi = NormalizedRoi::new(0.5, 0.5, 0.5, 0.5);
    store.apply_roi(0, &roi, Some(0.0));
    assert!(store.is_animating(0));
    store.tick(800.0);
    let captured = store.capture_roi(0);
    assert!(approx_eq(captured.x, 0.5));
    assert!(approx_eq(captured.y, 0.5));
    assert!(approx_eq(captured.width, 0.5));
    assert!(approx_eq(captured.height, 0.5));
}
