//! Prometheus metrics for detections.
//!
//! # Panics
//!
//! Registration uses `unwrap()`: a failure means duplicate metric names,
//! a programming error that should surface on first use.

use once_cell::sync::Lazy;
use pgate_core::DetectionResult;
use prometheus::{
    register_counter_vec, register_histogram, CounterVec, Encoder, Histogram, TextEncoder,
};

use crate::error::TelemetryResult;

/// Detections by resulting gate action.
pub static DETECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pgate_detections_total",
        "Total anomaly detections by gate action",
        &["gate_action"]
    )
    .unwrap()
});

/// Detections by overall anomaly level.
pub static OVERALL_LEVEL_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pgate_overall_level_total",
        "Total detections by overall anomaly level",
        &["level"]
    )
    .unwrap()
});

/// Fired signals by type and level.
pub static SIGNALS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pgate_signals_total",
        "Total anomaly signals fired",
        &["type", "level"]
    )
    .unwrap()
});

/// Bars supplied per detection.
pub static BARS_PER_DETECTION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "pgate_bars_per_detection",
        "Number of bars supplied to each detection",
        vec![10.0, 30.0, 60.0, 120.0, 250.0, 500.0, 1000.0]
    )
    .unwrap()
});

/// Metric recording facade.
pub struct Metrics;

impl Metrics {
    /// Record one finished detection.
    pub fn record_detection(result: &DetectionResult) {
        DETECTIONS_TOTAL
            .with_label_values(&[result.gate_action.as_str()])
            .inc();
        OVERALL_LEVEL_TOTAL
            .with_label_values(&[result.overall_level.as_str()])
            .inc();
        for signal in &result.signals {
            SIGNALS_TOTAL
                .with_label_values(&[signal.anomaly_type.as_str(), signal.level.as_str()])
                .inc();
        }
    }

    pub fn bars_analyzed(count: usize) {
        BARS_PER_DETECTION.observe(count as f64);
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgate_core::{AnomalySignal, AnomalyType, GateAction, OverallLevel, SignalLevel};

    #[test]
    fn test_record_detection_counts_signals() {
        let result = DetectionResult {
            detection_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 6),
            stock_code: Some("TEST".to_string()),
            signals: vec![AnomalySignal::new(
                AnomalyType::TrendReversal,
                SignalLevel::High,
                String::new(),
            )],
            overall_level: OverallLevel::High,
            gate_action: GateAction::Suspend,
            current_metrics: None,
        };

        let before = SIGNALS_TOTAL
            .with_label_values(&["trend_reversal", "high"])
            .get();
        Metrics::record_detection(&result);
        Metrics::bars_analyzed(60);
        let after = SIGNALS_TOTAL
            .with_label_values(&["trend_reversal", "high"])
            .get();
        assert_eq!(after - before, 1.0);

        let text = Metrics::render().unwrap();
        assert!(text.contains("pgate_detections_total"));
        assert!(text.contains("gate_action=\"suspend\""));
        assert!(text.contains("pgate_bars_per_detection"));
    }
}
