use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while launching or running the worker process.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The configured worker script does not exist. Raised at construction
    /// time, before any invocation or staging is attempted.
    #[error("Worker script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    /// The configured interpreter path does not exist. Only detected up
    /// front for explicit paths; bare command names resolve via PATH at
    /// spawn time.
    #[error("Worker interpreter not found: {path}")]
    InterpreterNotFound { path: PathBuf },

    /// The worker process could not be started at all. Distinct from
    /// `ExecutionFailed`: there is no child process to report on.
    #[error("Failed to launch worker process: {source}")]
    LaunchFailed { source: std::io::Error },

    /// The worker ran and exited non-zero.
    #[error("Worker execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The worker exceeded its invocation timeout and was killed.
    #[error("Worker timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while communicating with the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    /// Whether this error was detected before any process was spawned.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ScriptNotFound { .. } | Self::InterpreterNotFound { .. }
        )
    }
}

/// Errors produced while interpreting the worker's standard output.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The worker answered with a well-formed failure body.
    #[error("Worker reported failure: {message}")]
    Reported { message: String },

    /// The output was missing, unparseable, or violated an operation
    /// invariant. Carries the raw output verbatim for diagnostics; malformed
    /// values are never clamped or defaulted.
    #[error("Malformed worker output: {reason} (raw: {raw:?})")]
    Malformed { reason: String, raw: String },
}

impl ResponseError {
    pub fn malformed(reason: impl Into<String>, raw: &[u8]) -> Self {
        Self::Malformed {
            reason: reason.into(),
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}
