//! Prometheus metrics and structured logging for the anomaly gate.
//!
//! The detection engine itself never touches metrics; the application
//! records each finished `DetectionResult` here.

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
