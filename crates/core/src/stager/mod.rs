//! Artifact staging for inbound image payloads.
//!
//! The classifier worker reads images from disk, so every orchestration call
//! stages its payload as a uniquely named file in a scratch directory and
//! releases it once the invocation has finished, whatever the outcome.

mod error;
mod fs_stager;
mod types;

pub use error::StageError;
pub use fs_stager::ArtifactStager;
pub use types::{ImagePayload, StagedArtifact};
