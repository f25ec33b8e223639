//! Market anomaly detection and prediction gating.
//!
//! Analyses a stock's (or the market's) recent daily bars and decides
//! whether downstream price predictions should proceed, proceed with a
//! warning, be suspended, or be blocked.
//!
//! Pipeline per call:
//! - `BaselineCalculator`: rolling baselines over the trailing lookback
//! - six detectors (`DetectorKind`): volatility spike, price gap, volume
//!   spike, abnormal price movement, trend reversal, market structure
//! - `Aggregator`: signals to `OverallLevel`
//! - `GateDecider`: level and signal types to `GateAction`
//! - `ResultAssembler`: current metrics and the final `DetectionResult`
//!
//! Everything is synchronous and pure; no state survives a call.

pub mod aggregate;
pub mod assemble;
pub mod baseline;
pub mod config;
pub mod detector;
pub mod error;
pub mod gate;
pub mod hurst;
pub mod movement;
pub mod trend;
pub mod zscore;

#[cfg(test)]
mod testutil;

pub use aggregate::Aggregator;
pub use assemble::ResultAssembler;
pub use baseline::{BaselineCalculator, BaselineStats};
pub use config::DetectorConfig;
pub use detector::{AnomalyDetector, DetectionRequest, DetectorKind};
pub use error::{DetectorError, DetectorResult};
pub use gate::GateDecider;
pub use hurst::hurst_exponent;
pub use zscore::ZScoreRule;
