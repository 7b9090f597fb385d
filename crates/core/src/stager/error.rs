use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging an image payload.
#[derive(Debug, Error)]
pub enum StageError {
    /// The payload's base64 body could not be decoded.
    #[error("Invalid image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The scratch directory does not exist and could not be created.
    #[error("Failed to create scratch directory: {path}")]
    ScratchDirFailed { path: PathBuf },

    /// I/O error while writing the staged artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
