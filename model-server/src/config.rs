//! Server configuration read from environment variables.

use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Artifact filename looked up in the model directory when no explicit path
/// is configured.
pub const DEFAULT_MODEL_FILENAME: &str = "gesture_detection.bin";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Explicit artifact path (`MODEL_PATH`).
    pub model_path: Option<PathBuf>,
    /// Directory holding the default artifact (`MODEL_DIR`).
    pub model_dir: PathBuf,
    pub json_logs: bool,
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            model_path: None,
            model_dir: default_model_dir(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("MODEL_SERVER_BIND_ADDR").unwrap_or(defaults.bind_addr),
            model_path: std::env::var_os("MODEL_PATH").map(PathBuf::from),
            model_dir: std::env::var_os("MODEL_DIR")
                .map_or(defaults.model_dir, PathBuf::from),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.json_logs),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_enabled),
        }
    }

    /// Path the loader starts from: `MODEL_PATH` if set, otherwise the default
    /// filename inside the model directory.
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.model_dir.join(DEFAULT_MODEL_FILENAME))
    }
}

/// Directory containing the running executable, or `.` when it is unknown.
fn default_model_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_uses_model_dir() {
        let config = ServerConfig {
            model_dir: PathBuf::from("/srv/models"),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.resolved_model_path(),
            PathBuf::from("/srv/models/gesture_detection.bin")
        );
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = ServerConfig {
            model_path: Some(PathBuf::from("/tmp/custom.json")),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.resolved_model_path(),
            PathBuf::from("/tmp/custom.json")
        );
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.metrics_enabled);
        assert!(!config.json_logs);
    }
}
