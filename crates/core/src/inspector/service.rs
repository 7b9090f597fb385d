use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::error::InspectError;
use crate::stager::{ArtifactStager, ImagePayload};
use crate::worker::protocol::{
    self, Command, Label, Prediction, Roi, SampleCounts, SampleReceipt, TrainingReport,
};
use crate::worker::WorkerInvoker;

/// The orchestration facade exposed to callers.
///
/// Holds no dataset state of its own; the worker process owns the dataset
/// and the model. Dataset mutation (add sample, train) is serialized
/// through the write half of a process-wide gate so concurrent mutations
/// cannot race the worker's on-disk state, while predictions share the
/// read half and run in parallel with each other.
pub struct InspectionService {
    invoker: Arc<dyn WorkerInvoker>,
    stager: ArtifactStager,
    dataset_gate: RwLock<()>,
}

impl InspectionService {
    pub fn new(invoker: Arc<dyn WorkerInvoker>, stager: ArtifactStager) -> Self {
        Self {
            invoker,
            stager,
            dataset_gate: RwLock::new(()),
        }
    }

    /// Stages the image, submits it to the worker's dataset under the given
    /// label, and releases the staged file on every exit path.
    pub async fn add_sample(
        &self,
        payload: &ImagePayload,
        label: Label,
        roi: Roi,
    ) -> Result<SampleReceipt, InspectError> {
        validate_roi(&roi)?;
        let _guard = self.dataset_gate.write().await;

        let artifact = self.stager.stage(payload).await?;
        let command = Command::AddSample {
            image_path: artifact.path(),
            label,
            roi,
        };
        let encoded = command.encode();
        let invoked = self
            .invoker
            .invoke(command.operation(), encoded.as_deref())
            .await;
        artifact.release().await;

        let receipt = protocol::decode_add_sample(&invoked?)?;
        info!(label = %label, "sample added");
        Ok(receipt)
    }

    /// Asks the worker to retrain from its accumulated dataset.
    ///
    /// No minimum-dataset precondition is enforced here; if the worker
    /// rejects an undersized dataset, that rejection is surfaced verbatim.
    pub async fn train(&self) -> Result<TrainingReport, InspectError> {
        let _guard = self.dataset_gate.write().await;

        let command = Command::Train;
        let encoded = command.encode();
        let stdout = self
            .invoker
            .invoke(command.operation(), encoded.as_deref())
            .await?;
        let report = protocol::decode_train(&stdout)?;
        info!(accuracy = report.accuracy, "model trained");
        Ok(report)
    }

    /// Stages the image and asks the worker to classify the region of
    /// interest. Read-only with respect to the dataset.
    pub async fn predict(
        &self,
        payload: &ImagePayload,
        roi: Roi,
    ) -> Result<Prediction, InspectError> {
        validate_roi(&roi)?;
        let _guard = self.dataset_gate.read().await;

        let artifact = self.stager.stage(payload).await?;
        let command = Command::Predict {
            image_path: artifact.path(),
            roi,
        };
        let encoded = command.encode();
        let invoked = self
            .invoker
            .invoke(command.operation(), encoded.as_deref())
            .await;
        artifact.release().await;

        Ok(protocol::decode_predict(&invoked?)?)
    }

    /// Reports the worker's per-label dataset sizes.
    pub async fn sample_counts(&self) -> Result<SampleCounts, InspectError> {
        let _guard = self.dataset_gate.read().await;

        let stdout = self.invoker.invoke(Command::GetCounts.operation(), None).await?;
        Ok(protocol::decode_counts(&stdout)?)
    }
}

fn validate_roi(roi: &Roi) -> Result<(), InspectError> {
    if roi.width == 0 || roi.height == 0 {
        return Err(InspectError::InvalidRegion {
            reason: format!("width and height must be positive, got {}x{}", roi.width, roi.height),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    use crate::config::StagingConfig;
    use crate::worker::protocol::Operation;
    use crate::worker::WorkerError;

    /// Invoker double that replays a fixed outcome and counts calls.
    struct ScriptedInvoker {
        stdout: Option<Vec<u8>>,
        error_stderr: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedInvoker {
        fn succeeding(stdout: &str) -> Self {
            Self {
                stdout: Some(stdout.as_bytes().to_vec()),
                error_stderr: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(stderr: &str) -> Self {
            Self {
                stdout: None,
                error_stderr: Some(stderr.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WorkerInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            _op: Operation,
            _payload: Option<&str>,
        ) -> Result<Vec<u8>, WorkerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (&self.stdout, &self.error_stderr) {
                (Some(stdout), _) => Ok(stdout.clone()),
                (None, Some(stderr)) => Err(WorkerError::ExecutionFailed {
                    exit_code: Some(1),
                    stderr: stderr.clone(),
                }),
                _ => unreachable!(),
            }
        }
    }

    fn service_with(
        dir: &TempDir,
        invoker: Arc<ScriptedInvoker>,
    ) -> InspectionService {
        let stager = ArtifactStager::new(StagingConfig {
            scratch_dir: dir.path().to_path_buf(),
        });
        InspectionService::new(invoker, stager)
    }

    fn jpeg_payload() -> ImagePayload {
        ImagePayload::new("data:image/jpeg;base64,aGVsbG8=")
    }

    fn roi() -> Roi {
        Roi {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        }
    }

    fn scratch_is_empty(dir: &TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_add_sample_success_releases_artifact() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(r#"{"status":"success"}"#));
        let service = service_with(&dir, Arc::clone(&invoker));

        let receipt = service
            .add_sample(&jpeg_payload(), Label::Good, roi())
            .await
            .unwrap();
        assert_eq!(receipt.sample_count, None);
        assert_eq!(invoker.calls(), 1);
        assert!(scratch_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_add_sample_releases_artifact_on_worker_failure() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::failing("worker exploded"));
        let service = service_with(&dir, Arc::clone(&invoker));

        let err = service
            .add_sample(&jpeg_payload(), Label::Defective, roi())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "worker_execution");
        assert!(scratch_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_predict_releases_artifact_on_decode_failure() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding("not json at all"));
        let service = service_with(&dir, Arc::clone(&invoker));

        let err = service.predict(&jpeg_payload(), roi()).await.unwrap_err();
        assert_eq!(err.kind(), "decode");
        assert!(scratch_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_invalid_roi_rejected_before_staging_or_invocation() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(r#"{"status":"success"}"#));
        let service = service_with(&dir, Arc::clone(&invoker));

        let bad_roi = Roi {
            x: 0,
            y: 0,
            width: 0,
            height: 50,
        };
        let err = service
            .add_sample(&jpeg_payload(), Label::Good, bad_roi)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_region");
        assert_eq!(invoker.calls(), 0);
        assert!(scratch_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_stage_failure_skips_invocation() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(r#"{"status":"success"}"#));
        let service = service_with(&dir, Arc::clone(&invoker));

        let err = service
            .predict(&ImagePayload::new("%%%garbage%%%"), roi())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "stage_io");
        assert_eq!(invoker.calls(), 0);
    }

    #[tokio::test]
    async fn test_train_surfaces_worker_rejection_verbatim() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(
            r#"{"status":"error","message":"Need samples from both classes."}"#,
        ));
        let service = service_with(&dir, Arc::clone(&invoker));

        let err = service.train().await.unwrap_err();
        assert_eq!(err.kind(), "worker_reported");
        assert!(err.to_string().contains("Need samples from both classes."));
    }

    #[tokio::test]
    async fn test_predict_is_stateless_across_calls() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(
            r#"{"status":"success","prediction":"good","confidence":0.75}"#,
        ));
        let service = service_with(&dir, Arc::clone(&invoker));

        let first = service.predict(&jpeg_payload(), roi()).await.unwrap();
        let second = service.predict(&jpeg_payload(), roi()).await.unwrap();
        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
        assert!(scratch_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_sample_counts_decodes_worker_report() {
        let dir = TempDir::new().unwrap();
        let invoker = Arc::new(ScriptedInvoker::succeeding(
            r#"{"status":"success","counts":{"good":4,"defective":1}}"#,
        ));
        let service = service_with(&dir, Arc::clone(&invoker));

        let counts = service.sample_counts().await.unwrap();
        assert_eq!(counts.good, 4);
        assert_eq!(counts.defective, 1);
    }
}
