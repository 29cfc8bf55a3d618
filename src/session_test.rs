#![allow(clippy::float_cmp)]

use viewport::geometry::Point;

use super::*;

const TASKS: &str = r#"[
    { "id": "t1", "cameras": { "south": {}, "north": { "rois": [{ "x": 0.25, "y": 0.25, "width": 0.5, "height": 0.5 }] } } },
    { "id": "t2", "cameras": { "north": {}, "east": {} } }
]"#;

const CALIBRATION: &str = r#"{ "hangar-7": { "1": { "translateX": 12, "opacity": 80 } } }"#;

fn config(cameras: &[&str]) -> SessionConfig {
    SessionConfig {
        hangar: "hangar-7".into(),
        cameras: cameras.iter().map(|&c| c.to_owned()).collect(),
        image: Size::new(3840.0, 2160.0),
        container: Size::new(800.0, 450.0),
    }
}

fn session() -> Session {
    Session::from_sources(Some(TASKS), Some(CALIBRATION), config(&[])).unwrap()
}

#[test]
fn camera_names_are_sorted_and_unique() {
    let tasks = TaskCatalog::from_json(TASKS).unwrap();
    assert_eq!(camera_names(&tasks), vec!["east", "north", "south"]);
}

#[test]
fn slots_follow_task_cameras_by_default() {
    let s = session();
    assert_eq!(s.core.camera(0).map(|c| c.name.as_str()), Some("east"));
    assert_eq!(s.core.camera(1).map(|c| c.name.as_str()), Some("north"));
    assert!(s.core.frame(1).is_some());
    assert!(s.core.frame(3).is_none());
}

#[test]
fn explicit_cameras_override_task_names() {
    let s = Session::from_sources(Some(TASKS), None, config(&["north"])).unwrap();
    assert_eq!(s.core.camera(0).map(|c| c.name.as_str()), Some("north"));
    assert!(s.core.frame(1).is_none());
}

#[test]
fn calibration_is_scoped_to_hangar() {
    let s = session();
    assert_eq!(s.core.calibration_for(1).translate_x, 12.0);
    assert_eq!(s.core.calibration_for(1).alpha(), 0.8);
    assert_eq!(s.core.calibration_for(0).translate_x, 0.0);
}

#[test]
fn missing_sources_give_an_empty_session() {
    let s = Session::from_sources(None, None, config(&[])).unwrap();
    assert!(s.core.tasks.is_empty());
    assert!(s.core.calibration.is_empty());
}

#[test]
fn bad_payload_is_a_load_error() {
    let result = Session::from_sources(Some("{"), None, config(&[]));
    assert!(matches!(result, Err(CliError::Load(_))));
    let result = Session::from_sources(None, Some(r#"{ "h": { "first": {} } }"#), config(&[]));
    assert!(matches!(result, Err(CliError::Load(_))));
}

#[test]
fn select_task_lands_on_preset() {
    let mut s = session();
    s.select_task("t1").unwrap();
    assert_eq!(s.core.viewport(1).zoom, 2.0);
    assert!(!s.core.store.is_animating(1));
    assert!(matches!(s.select_task("missing"), Err(CliError::UnknownTask(_))));
}

#[test]
fn view_normalizes_and_checks_slot() {
    let mut s = session();
    let v = s.view(&ViewArgs { camera: 2, zoom: 0.5, pan: Point::new(100.0, 100.0) }).unwrap();
    assert_eq!(v, Viewport::default());
    assert!(matches!(
        s.view(&ViewArgs { camera: 8, zoom: 1.0, pan: Point::default() }),
        Err(CliError::UnknownCamera(8))
    ));
}
