//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid bars: {0}")]
    Bars(#[from] pgate_core::CoreError),

    #[error("Detector error: {0}")]
    Detector(#[from] pgate_detector::DetectorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] pgate_telemetry::TelemetryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
