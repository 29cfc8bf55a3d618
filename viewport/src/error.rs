//! Errors raised at the load boundary.
//!
//! Geometry operations never fail: degenerate inputs normalize to identity
//! results. Only parsing collaborator payloads can be rejected.

/// Error returned when parsing task or calibration payloads.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The payload is not valid JSON or does not match the expected shape.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// A calibration map key is not an unsigned camera index.
    #[error("invalid camera index `{key}` for hangar `{hangar}`")]
    InvalidCameraIndex { hangar: String, key: String },
    /// A task definition has an empty id.
    #[error("task at position {0} has an empty id")]
    MissingTaskId(usize),
}
