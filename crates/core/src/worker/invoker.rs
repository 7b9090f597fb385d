use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::error::WorkerError;
use super::protocol::Operation;
use crate::config::WorkerConfig;

/// Seam over the worker process so the inspection service can be exercised
/// against scripted stand-ins.
#[async_trait]
pub trait WorkerInvoker: Send + Sync {
    /// Runs one worker operation to completion and returns its stdout.
    ///
    /// Exit code 0 is the only success path; a non-zero exit yields
    /// `ExecutionFailed` carrying the captured stderr verbatim.
    async fn invoke(&self, op: Operation, payload: Option<&str>) -> Result<Vec<u8>, WorkerError>;
}

/// Production invoker that spawns the configured Python worker script.
#[derive(Debug)]
pub struct PythonWorker {
    config: WorkerConfig,
}

impl PythonWorker {
    /// Fails fast if the configured script (or an explicitly pathed
    /// interpreter) does not exist, before any process is spawned or any
    /// artifact staged.
    pub fn new(config: WorkerConfig) -> Result<Self, WorkerError> {
        if !config.script_path.exists() {
            return Err(WorkerError::ScriptNotFound {
                path: config.script_path.clone(),
            });
        }
        // A bare command name like "python3" resolves via PATH at spawn
        // time; only explicit paths can be checked here.
        if config.python_path.components().count() > 1 && !config.python_path.exists() {
            return Err(WorkerError::InterpreterNotFound {
                path: config.python_path.clone(),
            });
        }
        Ok(Self { config })
    }
}

#[async_trait]
impl WorkerInvoker for PythonWorker {
    async fn invoke(&self, op: Operation, payload: Option<&str>) -> Result<Vec<u8>, WorkerError> {
        let mut command = Command::new(&self.config.python_path);
        command
            .arg(&self.config.script_path)
            .arg(op.wire_name())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(payload) = payload {
            command.arg(payload);
        }

        debug!(
            "invoking worker {} {}",
            self.config.script_path.display(),
            op.wire_name()
        );

        let mut child = command
            .spawn()
            .map_err(|source| WorkerError::LaunchFailed { source })?;

        // Drain both pipes concurrently so a chatty worker can't deadlock
        // on a full pipe buffer while we wait for it to exit.
        let mut stdout_pipe = child.stdout.take().expect("stdout should be captured");
        let mut stderr_pipe = child.stderr.take().expect("stderr should be captured");
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
        });

        let timeout_secs = self.config.timeout_secs;
        let status = match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!(
                    "worker {} timed out after {}s, killing",
                    op.wire_name(),
                    timeout_secs
                );
                child.kill().await.ok();
                child.wait().await?;
                return Err(WorkerError::Timeout { timeout_secs });
            }
        };

        let stdout = stdout_task
            .await
            .map_err(|_| WorkerError::Io(std::io::Error::other("stdout reader task panicked")))??;
        let stderr = stderr_task
            .await
            .map_err(|_| WorkerError::Io(std::io::Error::other("stderr reader task panicked")))??;

        if !status.success() {
            return Err(WorkerError::ExecutionFailed {
                exit_code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        if !stderr.is_empty() {
            debug!(
                "worker {} stderr: {}",
                op.wire_name(),
                String::from_utf8_lossy(&stderr).trim()
            );
        }

        Ok(stdout)
    }
}
