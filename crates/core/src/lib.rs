pub mod config;
pub mod inspector;
pub mod stager;
pub mod worker;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    StagingConfig, WorkerConfig,
};
pub use inspector::{InspectError, InspectionService};
pub use stager::{ArtifactStager, ImagePayload, StageError, StagedArtifact};
pub use worker::protocol::{
    Label, Operation, Prediction, Roi, SampleCounts, SampleReceipt, TrainingReport,
};
pub use worker::{PythonWorker, ResponseError, WorkerError, WorkerInvoker};
