//! Orchestration facade for the defect-inspection use cases.
//!
//! Composes the artifact stager, the command protocol and the worker
//! invoker into three caller-facing operations (add sample, train, predict)
//! plus a dataset count probe. Each call is atomic from the caller's view:
//! any failed step short-circuits to an error and staged artifacts are
//! always released before the call returns.

mod error;
mod service;

pub use error::InspectError;
pub use service::InspectionService;
