use thiserror::Error;

use crate::stager::StageError;
use crate::worker::{ResponseError, WorkerError};

/// Caller-facing failure of one orchestration call, tagged with its stage
/// of origin. Nothing in this taxonomy is retried automatically.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The region of interest is degenerate (zero width or height).
    /// Rejected before any staging or invocation.
    #[error("Invalid region of interest: {reason}")]
    InvalidRegion { reason: String },

    /// Payload decode or scratch-write failure. No invocation attempted.
    #[error(transparent)]
    Stage(#[from] StageError),

    /// Worker configuration, launch or execution failure.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// The worker ran but its answer was a failure or unusable.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl InspectError {
    /// Stable kind discriminator for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRegion { .. } => "invalid_region",
            Self::Stage(_) => "stage_io",
            Self::Worker(e) if e.is_configuration() => "configuration",
            Self::Worker(WorkerError::LaunchFailed { .. }) => "worker_launch",
            Self::Worker(_) => "worker_execution",
            Self::Response(ResponseError::Reported { .. }) => "worker_reported",
            Self::Response(ResponseError::Malformed { .. }) => "decode",
        }
    }
}
