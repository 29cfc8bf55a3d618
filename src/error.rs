use viewport::calibration::CameraIndex;
use viewport::error::LoadError;

/// Everything that can stop a `hangarview` command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown task `{0}`")]
    UnknownTask(String),
    #[error("camera slot {0} is out of range")]
    UnknownCamera(CameraIndex),
    #[error("invalid {what} `{value}`; expected {expected}")]
    BadArgument { what: &'static str, value: String, expected: &'static str },
}
