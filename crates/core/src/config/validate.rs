use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Worker paths are non-empty
/// - Worker timeout is not 0
///
/// Existence of the worker script on disk is checked when the worker
/// invoker is constructed, so a missing script fails at startup rather
/// than mid-request.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.worker.python_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "worker.python_path cannot be empty".to_string(),
        ));
    }

    if config.worker.script_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "worker.script_path cannot be empty".to_string(),
        ));
    }

    if config.worker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "worker.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.staging.scratch_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "staging.scratch_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, WorkerConfig};
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_validate_empty_script_path_fails() {
        let config = Config {
            worker: WorkerConfig {
                script_path: PathBuf::new(),
                ..WorkerConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let config = Config {
            worker: WorkerConfig {
                timeout_secs: 0,
                ..WorkerConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
