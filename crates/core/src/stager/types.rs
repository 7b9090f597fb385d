use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::error::StageError;

/// An encoded still image handed in by a caller.
///
/// The body is base64, optionally wrapped in a browser-style
/// `data:image/<fmt>;base64,` transport prefix which is stripped before
/// decoding. The payload only lives for the duration of one orchestration
/// call.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    data: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Decodes the payload to raw image bytes, stripping the data-URL
    /// prefix if present.
    pub fn decode(&self) -> Result<Vec<u8>, StageError> {
        let body = match self.data.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.data.as_str(),
        };
        Ok(BASE64.decode(body.trim())?)
    }
}

impl From<String> for ImagePayload {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

/// A staged image file owned by a single orchestration call.
///
/// Dropping the handle removes the file as a fallback, but callers should
/// `release` explicitly once the worker invocation has completed so the
/// file is never deleted while the worker may still be reading it.
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    released: bool,
}

impl StagedArtifact {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the staged file. Deletion failures are logged and swallowed:
    /// cleanup must never mask the outcome of the call that staged the
    /// artifact. Deleting an already-removed file is not an error.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "failed to remove staged artifact {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let payload = ImagePayload::new("aGVsbG8=");
        assert_eq!(payload.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_decode_strips_data_url_prefix() {
        let payload = ImagePayload::new("data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(payload.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_malformed_base64() {
        let payload = ImagePayload::new("data:image/png;base64,not*base64*");
        assert!(payload.decode().is_err());
    }
}
