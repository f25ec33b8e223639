//! The anomaly detection engine.
//!
//! One call runs the whole pipeline: baseline, every applicable detector,
//! aggregation, gate decision, result assembly. The baseline is a local
//! value passed to each detector, so an `AnomalyDetector` holds no per-call
//! state and can be shared across threads analysing different stocks.

use chrono::NaiveDate;
use pgate_core::{AnomalySignal, BarSeries, DetectionResult};
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::assemble::ResultAssembler;
use crate::baseline::{BaselineCalculator, BaselineStats};
use crate::config::DetectorConfig;
use crate::error::{DetectorError, DetectorResult};
use crate::gate::GateDecider;
use crate::zscore::ZScoreRule;
use crate::{hurst, movement, trend};

/// Input to one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    /// `None` means market-wide data (an index rather than one stock).
    pub stock_code: Option<String>,
    pub bars: BarSeries,
    /// Label for the result; defaults to the last bar's date.
    pub as_of: Option<NaiveDate>,
}

impl DetectionRequest {
    pub fn new(bars: BarSeries) -> Self {
        Self {
            stock_code: None,
            bars,
            as_of: None,
        }
    }

    pub fn with_stock_code(mut self, code: impl Into<String>) -> Self {
        self.stock_code = Some(code.into());
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn is_market_wide(&self) -> bool {
        self.stock_code.is_none()
    }

    fn detection_date(&self) -> Option<NaiveDate> {
        self.as_of.or_else(|| self.bars.last().map(|b| b.date))
    }
}

/// The closed set of detector kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorKind {
    /// Volatility spike, price gap, volume spike.
    ZScore(ZScoreRule),
    /// Count of large recent returns.
    MovementCount,
    TrendReversal,
    /// Hurst exponent regime; market-wide requests only.
    MarketStructure,
}

impl DetectorKind {
    /// All six detectors in evaluation order.
    pub fn standard_set(config: &DetectorConfig) -> Vec<Self> {
        let mut kinds: Vec<Self> = ZScoreRule::table(config)
            .into_iter()
            .map(Self::ZScore)
            .collect();
        kinds.push(Self::MovementCount);
        kinds.push(Self::TrendReversal);
        kinds.push(Self::MarketStructure);
        kinds
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ZScore(rule) => rule.name,
            Self::MovementCount => movement::NAME,
            Self::TrendReversal => trend::NAME,
            Self::MarketStructure => hurst::NAME,
        }
    }

    fn applies_to(&self, request: &DetectionRequest) -> bool {
        match self {
            Self::MarketStructure => request.is_market_wide(),
            _ => true,
        }
    }

    pub fn evaluate(
        &self,
        series: &BarSeries,
        baseline: &BaselineStats,
    ) -> DetectorResult<Option<AnomalySignal>> {
        match self {
            Self::ZScore(rule) => rule.evaluate(series, baseline),
            Self::MovementCount => movement::detect(series, baseline),
            Self::TrendReversal => trend::detect(series, baseline),
            Self::MarketStructure => hurst::detect(series, baseline),
        }
    }
}

/// Anomaly detector and prediction gate.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    baseline: BaselineCalculator,
    kinds: Vec<DetectorKind>,
}

impl AnomalyDetector {
    /// Create a detector, rejecting invalid configuration.
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: DetectorConfig) -> Self {
        Self {
            baseline: BaselineCalculator::new(config.lookback_days),
            kinds: DetectorKind::standard_set(&config),
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn kinds(&self) -> &[DetectorKind] {
        &self.kinds
    }

    /// Compute the baseline for a series under this detector's lookback.
    pub fn baseline(&self, series: &BarSeries) -> Option<BaselineStats> {
        self.baseline.calculate(series)
    }

    /// Shorthand for a request without an as-of override.
    pub fn detect(&self, stock_code: Option<&str>, bars: BarSeries) -> DetectionResult {
        let request = DetectionRequest {
            stock_code: stock_code.map(str::to_string),
            bars,
            as_of: None,
        };
        self.detect_anomalies(&request)
    }

    /// Run the full pipeline. Never fails: a detector that cannot run
    /// abstains, and with no baseline every detector abstains.
    pub fn detect_anomalies(&self, request: &DetectionRequest) -> DetectionResult {
        let stock = request.stock_code.as_deref().unwrap_or("market");
        let baseline = self.baseline.calculate(&request.bars);

        let signals = match &baseline {
            Some(stats) => self.run_detectors(request, stats),
            None => {
                debug!(
                    stock_code = stock,
                    bars = request.bars.len(),
                    lookback_days = self.config.lookback_days,
                    "No baseline, all detectors abstain"
                );
                Vec::new()
            }
        };

        let overall_level = Aggregator::aggregate(&signals);
        let gate_action = GateDecider::decide(overall_level, &signals);
        let current_metrics = ResultAssembler::current_metrics(&request.bars, baseline.as_ref());

        info!(
            stock_code = stock,
            signals = signals.len(),
            overall_level = %overall_level,
            gate_action = %gate_action,
            "Anomaly detection complete"
        );

        ResultAssembler::assemble(
            request.detection_date(),
            request.stock_code.clone(),
            signals,
            overall_level,
            gate_action,
            current_metrics,
        )
    }

    fn run_detectors(
        &self,
        request: &DetectionRequest,
        baseline: &BaselineStats,
    ) -> Vec<AnomalySignal> {
        let mut signals = Vec::new();

        for kind in self.kinds.iter().filter(|k| k.applies_to(request)) {
            match kind.evaluate(&request.bars, baseline) {
                Ok(Some(signal)) => {
                    debug!(
                        detector = kind.name(),
                        anomaly_type = %signal.anomaly_type,
                        level = %signal.level,
                        "Anomaly signal fired"
                    );
                    signals.push(signal);
                }
                Ok(None) => {}
                Err(e @ DetectorError::InsufficientData { .. }) => {
                    debug!(detector = kind.name(), reason = %e, "Detector abstained");
                }
                Err(e) => {
                    warn!(detector = kind.name(), error = %e, "Detector failed, treating as no signal");
                }
            }
        }

        signals
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::from_config(DetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{alternating, from_closes, from_returns, series};
    use pgate_core::{AnomalyType, GateAction, OverallLevel};

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = DetectorConfig {
            lookback_days: 5,
            ..Default::default()
        };
        assert!(matches!(
            AnomalyDetector::new(config),
            Err(DetectorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_default_matches_validated_default_config() {
        let validated = AnomalyDetector::new(DetectorConfig::default()).unwrap();
        let default = AnomalyDetector::default();
        assert_eq!(default.config(), validated.config());
        assert_eq!(default.kinds(), validated.kinds());
        assert_eq!(
            default.baseline.lookback_days(),
            validated.baseline.lookback_days()
        );
    }

    #[test]
    fn test_standard_set_has_six_detectors() {
        let detector = AnomalyDetector::default();
        let names: Vec<&str> = detector.kinds().iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "volatility_spike",
                "price_gap",
                "volume_spike",
                "abnormal_price_movement",
                "trend_reversal",
                "market_structure",
            ]
        );
    }

    #[test]
    fn test_market_structure_skipped_for_single_stock() {
        let closes: Vec<f64> = (0..80).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        let detector = AnomalyDetector::default();

        let market = detector.detect(None, from_closes(&closes));
        assert!(market.has_signal(AnomalyType::MarketStructureMeanReverting));

        let stock = detector.detect(Some("000001"), from_closes(&closes));
        assert!(!stock.has_signal(AnomalyType::MarketStructureMeanReverting));
    }

    #[test]
    fn test_detection_date_defaults_to_last_bar() {
        let bars = from_closes(&[100.0; 10]);
        let last = bars.last().unwrap().date;
        let detector = AnomalyDetector::default();

        let result = detector.detect_anomalies(&DetectionRequest::new(bars.clone()));
        assert_eq!(result.detection_date, Some(last));

        let as_of = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let result = detector.detect_anomalies(&DetectionRequest::new(bars).with_as_of(as_of));
        assert_eq!(result.detection_date, Some(as_of));
    }

    #[test]
    fn test_empty_series() {
        let result = AnomalyDetector::default().detect(Some("X"), BarSeries::default());
        assert!(result.signals.is_empty());
        assert_eq!(result.overall_level, OverallLevel::Normal);
        assert_eq!(result.gate_action, GateAction::Allow);
        assert!(result.detection_date.is_none());
        assert!(result.current_metrics.is_none());
    }

    #[test]
    fn test_high_volatility_suspends() {
        let mut rets = alternating(77, 0.005);
        rets.extend(alternating(3, 0.05));
        let result = AnomalyDetector::default().detect(Some("X"), from_returns(&rets));
        assert!(result.has_signal(AnomalyType::VolatilitySpike));
        assert!(result.overall_level >= OverallLevel::High);
        assert!(result.gate_action.is_blocking());
    }

    #[test]
    fn test_numerical_failure_is_no_signal() {
        // Volume sums overflow to infinity, leaving a NaN volume z-score
        let points: Vec<(f64, f64, f64)> = (0..70).map(|_| (100.0, 100.0, 1e308)).collect();
        let bars = series(&points);
        let detector = AnomalyDetector::default();

        let baseline = detector.baseline(&bars).unwrap();
        let err = ZScoreRule::volume_spike()
            .evaluate(&bars, &baseline)
            .unwrap_err();
        assert!(matches!(
            err,
            DetectorError::Numerical {
                detector: "volume_spike",
                ..
            }
        ));

        let result = detector.detect(Some("X"), bars);
        assert!(result.signals.is_empty());
        assert_eq!(result.overall_level, OverallLevel::Normal);
        assert_eq!(result.gate_action, GateAction::Allow);
    }
}
