//! Per-camera viewport and calibration transform engine for hangar inspection.
//!
//! An inspector watches up to eight fixed camera feeds of a drone in a hangar.
//! Each feed is fitted into its grid cell, optionally zoomed and panned, and
//! re-aligned by a per-hangar calibration correction. This crate owns the
//! geometry that composes those three steps into one draw placement, converts
//! live zoom/pan state to and from reusable normalized ROI presets, and maps
//! pointer positions back through the same placement to create and hit-test
//! validation regions. The host UI wires DOM events to [`engine::EngineCore`]
//! and persists the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input routing across the camera grid, task selection |
//! | [`store`] | Per-camera viewport records, subscriptions, transitions |
//! | [`viewport`] | Zoom/pan state and the pan clamp |
//! | [`calibration`] | Per-(hangar, camera) alignment corrections |
//! | [`compose`] | Fit + zoom/pan + calibration composed into one placement |
//! | [`roi`] | Viewport to normalized ROI preset conversion and back |
//! | [`hit`] | Hit-testing pointer positions against validation regions |
//! | [`input`] | Tools, buttons, keys and the region-creation machine |
//! | [`task`] | Task definitions, validation regions and progress |
//! | [`animation`] | Ease-out-cubic viewport transitions |
//! | [`render`] | Drawing through the [`render::Surface`] trait |
//! | [`geometry`] | Point, size and rectangle value types |
//! | [`error`] | Load-boundary errors |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod animation;
pub mod calibration;
pub mod compose;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod roi;
pub mod store;
pub mod task;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;
