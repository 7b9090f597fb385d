use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::error::StageError;
use super::types::{ImagePayload, StagedArtifact};
use crate::config::StagingConfig;

/// Writes image payloads into the scratch directory.
///
/// File names carry a random discriminator so concurrent calls can stage
/// independently. The scratch directory is created lazily on first use and
/// needs no teardown since artifacts self-clean.
#[derive(Debug, Clone)]
pub struct ArtifactStager {
    scratch_dir: PathBuf,
}

impl ArtifactStager {
    pub fn new(config: StagingConfig) -> Self {
        Self {
            scratch_dir: config.scratch_dir,
        }
    }

    /// Creates a stager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(StagingConfig::default())
    }

    pub fn scratch_dir(&self) -> &std::path::Path {
        &self.scratch_dir
    }

    /// Decodes the payload and writes it to a fresh scratch location.
    pub async fn stage(&self, payload: &ImagePayload) -> Result<StagedArtifact, StageError> {
        let bytes = payload.decode()?;

        fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|_| StageError::ScratchDirFailed {
                path: self.scratch_dir.clone(),
            })?;

        let path = self
            .scratch_dir
            .join(format!("sample_{}.jpg", Uuid::new_v4()));
        fs::write(&path, &bytes).await?;
        debug!("staged {} byte image at {}", bytes.len(), path.display());

        Ok(StagedArtifact::new(path))
    }
}
