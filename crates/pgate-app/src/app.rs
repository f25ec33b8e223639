//! Application wiring: detector construction, metrics, rendering.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::input::BarInput;
use chrono::NaiveDate;
use pgate_core::DetectionResult;
use pgate_detector::{AnomalyDetector, DetectionRequest};
use pgate_telemetry::Metrics;
use tracing::info;

pub struct Application {
    config: AppConfig,
    detector: AnomalyDetector,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let detector = AnomalyDetector::new(config.detector.clone())?;
        info!(
            lookback_days = config.detector.lookback_days,
            volatility_threshold = config.detector.volatility_threshold,
            metrics_enabled = config.telemetry.metrics_enabled,
            "Application initialized"
        );
        Ok(Self { config, detector })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build a request from parsed input. `stock_code` overrides the file's.
    pub fn request(
        input: BarInput,
        stock_code: Option<String>,
        as_of: Option<NaiveDate>,
    ) -> DetectionRequest {
        let mut request = DetectionRequest::new(input.bars);
        if let Some(code) = stock_code.or(input.stock_code) {
            request = request.with_stock_code(code);
        }
        if let Some(date) = as_of {
            request = request.with_as_of(date);
        }
        request
    }

    /// Run one detection and record metrics when enabled.
    pub fn run(&self, request: &DetectionRequest) -> DetectionResult {
        let result = self.detector.detect_anomalies(request);
        if self.config.telemetry.metrics_enabled {
            Metrics::record_detection(&result);
            Metrics::bars_analyzed(request.bars.len());
        }
        result
    }

    /// Serialize the consumer-facing anomaly status.
    pub fn render(result: &DetectionResult, pretty: bool) -> AppResult<String> {
        let status = result.anomaly_status();
        let json = if pretty {
            serde_json::to_string_pretty(&status)?
        } else {
            serde_json::to_string(&status)?
        };
        Ok(json)
    }

    /// Prometheus text when metrics are enabled.
    pub fn metrics_snapshot(&self) -> AppResult<Option<String>> {
        if !self.config.telemetry.metrics_enabled {
            return Ok(None);
        }
        Ok(Some(Metrics::render()?))
    }
}
