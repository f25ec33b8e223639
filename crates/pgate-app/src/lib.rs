//! Batch runner for the prediction anomaly gate.
//!
//! Reads daily bars as JSON, runs `AnomalyDetector`, and prints the
//! resulting anomaly status.

pub mod app;
pub mod config;
pub mod error;
pub mod input;

pub use app::Application;
pub use config::{AppConfig, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use input::BarInput;
