//! Invocation of the external classifier worker.
//!
//! The worker is a Python process that owns the persistent labeled dataset
//! and the trained model. Each call spawns it with three positional
//! arguments (script location, operation name, one serialized command
//! payload), captures stdout/stderr to completion and maps the exit status
//! to a structured outcome. No retry happens at this layer.

mod error;
mod invoker;
pub mod protocol;

pub use error::{ResponseError, WorkerError};
pub use invoker::{PythonWorker, WorkerInvoker};
