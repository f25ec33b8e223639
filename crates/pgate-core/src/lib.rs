//! Core domain types for the prediction anomaly gate.
//!
//! This crate provides the value types shared by the engine and its callers:
//! - `PriceBar`, `BarSeries`: validated daily OHLCV input
//! - `AnomalySignal`, `AnomalyType`, `SignalLevel`: per-detector output
//! - `OverallLevel`, `GateAction`: aggregated severity and gating policy
//! - `DetectionResult`, `AnomalyStatus`: the final decision and its wire view
//! - `stats`: small numeric helpers (mean, sample std, moments, OLS slope)

pub mod bar;
pub mod decision;
pub mod error;
pub mod result;
pub mod signal;
pub mod stats;

pub use bar::{BarSeries, PriceBar};
pub use decision::{GateAction, OverallLevel};
pub use error::{CoreError, Result};
pub use result::{AnomalyStatus, CurrentMetrics, DetectionResult};
pub use signal::{AnomalySignal, AnomalyType, SignalLevel};
