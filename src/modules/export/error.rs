use axum::http::StatusCode;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can go wrong between accepting an export request and
/// handing back an artifact. Pre-launch rejections (`Validation`,
/// `BucketNotFound`) never start a transcoder; the rest abort a running
/// job and tear it down.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("bucket `{0}` not found")]
    BucketNotFound(String),

    #[error("object `{0}` not found in input bucket")]
    MissingObject(String),

    #[error("failed to fetch `{key}` from storage: {reason}")]
    Fetch { key: String, reason: String },

    #[error("failed to launch transcoder: {0}")]
    ProcessStartup(std::io::Error),

    #[error("transcoder failed ({status}): {diagnostics}")]
    ProcessFailed {
        status: ExitStatus,
        diagnostics: String,
    },

    #[error("transcoder exited cleanly but produced an empty artifact: {diagnostics}")]
    EmptyArtifact { diagnostics: String },

    #[error("transcoding did not finish within {timeout_secs}s: {diagnostics}")]
    Timeout {
        timeout_secs: u64,
        diagnostics: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// HTTP status for this failure. A missing object maps to 404 on every
    /// path, same as an absent bucket; a mid-transfer failure stays 500
    /// because the object may well exist.
    pub fn status(&self) -> StatusCode {
        match self {
            ExportError::Validation(_) => StatusCode::BAD_REQUEST,
            ExportError::BucketNotFound(_) | ExportError::MissingObject(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
