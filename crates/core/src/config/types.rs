use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub staging: StagingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// External classifier worker configuration.
///
/// The worker is an external Python process that owns the labeled dataset
/// and the trained model. Both locations are configurable; nothing is
/// inferred from the environment at invocation time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Python interpreter used to run the worker script.
    #[serde(default = "default_python_path")]
    pub python_path: PathBuf,

    /// Location of the worker script.
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Maximum wall-clock time for a single worker invocation, in seconds.
    /// On expiry the child process is killed and the call fails.
    #[serde(default = "default_worker_timeout")]
    pub timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            python_path: default_python_path(),
            script_path: default_script_path(),
            timeout_secs: default_worker_timeout(),
        }
    }
}

fn default_python_path() -> PathBuf {
    PathBuf::from("python3")
}

fn default_script_path() -> PathBuf {
    PathBuf::from("lib/defect_detector.py")
}

fn default_worker_timeout() -> u64 {
    120
}

/// Staging configuration for transient image artifacts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StagingConfig {
    /// Scratch directory where inbound images are written before a worker
    /// invocation. Created lazily on first use; artifacts self-clean.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
        }
    }
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("opticheck-staging")
}
