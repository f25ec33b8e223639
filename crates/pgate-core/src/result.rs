//! Detection result and its external wire view.

use crate::decision::{GateAction, OverallLevel};
use crate::signal::{AnomalySignal, AnomalyType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of the latest bars, reported whether or not anything fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    pub current_price: f64,
    pub current_volume: f64,
    /// Annualised std of the returns inside the last five bars.
    #[serde(rename = "5d_volatility")]
    pub volatility_5d: f64,
    /// Close-to-close return across the last five bars.
    #[serde(rename = "5d_return")]
    pub return_5d: f64,
    /// `current_price / baseline.price_mean`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_vs_baseline: Option<f64>,
    /// `current_volume / baseline.volume_mean`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,
    /// `5d_volatility / baseline.volatility_mean`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility_ratio: Option<f64>,
}

/// Outcome of one `detect_anomalies` call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Caller-supplied as-of date, else the date of the last bar.
    pub detection_date: Option<NaiveDate>,
    pub stock_code: Option<String>,
    pub signals: Vec<AnomalySignal>,
    pub overall_level: OverallLevel,
    pub gate_action: GateAction,
    pub current_metrics: Option<CurrentMetrics>,
}

impl DetectionResult {
    pub fn has_anomalies(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn has_signal(&self, anomaly_type: AnomalyType) -> bool {
        self.signals.iter().any(|s| s.anomaly_type == anomaly_type)
    }

    pub fn signal(&self, anomaly_type: AnomalyType) -> Option<&AnomalySignal> {
        self.signals.iter().find(|s| s.anomaly_type == anomaly_type)
    }

    /// The view embedded as `anomaly_status` by the prediction-serving layer.
    pub fn anomaly_status(&self) -> AnomalyStatus {
        AnomalyStatus {
            overall_anomaly_level: self.overall_level,
            prediction_gate_action: self.gate_action,
            anomalies_detected: self.signals.clone(),
            metrics: self.current_metrics.clone(),
        }
    }
}

/// External representation consumed by prediction services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyStatus {
    pub overall_anomaly_level: OverallLevel,
    pub prediction_gate_action: GateAction,
    pub anomalies_detected: Vec<AnomalySignal>,
    pub metrics: Option<CurrentMetrics>,
}
