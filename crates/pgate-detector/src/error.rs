//! Detector error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Insufficient data for {detector}: need {required} bars, have {available}")]
    InsufficientData {
        detector: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Numerical failure in {detector}: {reason}")]
    Numerical {
        detector: &'static str,
        reason: String,
    },
}

pub type DetectorResult<T> = Result<T, DetectorError>;
