//! Application configuration.

use crate::error::{AppError, AppResult};
use pgate_detector::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Path used when neither `--config` nor `PGATE_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_ENV_VAR: &str = "PGATE_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Resolve the config path: explicit > `PGATE_CONFIG` > default.
    ///
    /// An explicit path must exist. Otherwise a missing file yields defaults.
    pub fn load(explicit: Option<&str>) -> AppResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let config_path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.detector.validate()?;
        Ok(())
    }
}
