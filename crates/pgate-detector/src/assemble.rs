//! Current-metrics snapshot and final result assembly.

use chrono::NaiveDate;

use crate::baseline::BaselineStats;
use crate::config::{RECENT_WINDOW, TRADING_DAYS_PER_YEAR};
use pgate_core::bar::returns;
use pgate_core::stats::sample_std;
use pgate_core::{
    AnomalySignal, BarSeries, CurrentMetrics, DetectionResult, GateAction, OverallLevel,
};

pub struct ResultAssembler;

impl ResultAssembler {
    /// Snapshot of the last five bars, with baseline ratios when a baseline
    /// exists. `None` for an empty series.
    pub fn current_metrics(
        series: &BarSeries,
        baseline: Option<&BaselineStats>,
    ) -> Option<CurrentMetrics> {
        let recent = series.tail(RECENT_WINDOW);
        let (first, last) = (recent.first()?, recent.last()?);

        let volatility_5d = sample_std(&returns(recent)) * TRADING_DAYS_PER_YEAR.sqrt();
        let return_5d = if first.close != 0.0 {
            last.close / first.close - 1.0
        } else {
            0.0
        };

        let ratio = |value: f64, base: f64| (base != 0.0).then(|| value / base);

        Some(CurrentMetrics {
            current_price: last.close,
            current_volume: last.volume,
            volatility_5d,
            return_5d,
            price_vs_baseline: baseline.and_then(|b| ratio(last.close, b.price_mean)),
            volume_ratio: baseline.and_then(|b| ratio(last.volume, b.volume_mean)),
            volatility_ratio: baseline.and_then(|b| ratio(volatility_5d, b.volatility_mean)),
        })
    }

    pub fn assemble(
        detection_date: Option<NaiveDate>,
        stock_code: Option<String>,
        signals: Vec<AnomalySignal>,
        overall_level: OverallLevel,
        gate_action: GateAction,
        current_metrics: Option<CurrentMetrics>,
    ) -> DetectionResult {
        DetectionResult {
            detection_date,
            stock_code,
            signals,
            overall_level,
            gate_action,
            current_metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineCalculator;
    use crate::testutil::from_closes;

    #[test]
    fn test_empty_series_has_no_metrics() {
        assert!(ResultAssembler::current_metrics(&BarSeries::default(), None).is_none());
    }

    #[test]
    fn test_metrics_without_baseline() {
        let bars = from_closes(&[100.0, 100.0, 100.0, 100.0, 110.0]);
        let metrics = ResultAssembler::current_metrics(&bars, None).unwrap();
        assert_eq!(metrics.current_price, 110.0);
        assert_eq!(metrics.current_volume, 1000.0);
        assert!((metrics.return_5d - 0.10).abs() < 1e-12);
        assert!(metrics.volatility_5d > 0.0);
        assert!(metrics.price_vs_baseline.is_none());
    }

    #[test]
    fn test_ratios_against_baseline() {
        let mut closes = vec![100.0; 60];
        closes.push(120.0);
        let bars = from_closes(&closes);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();
        let metrics = ResultAssembler::current_metrics(&bars, Some(&baseline)).unwrap();

        let expected = 120.0 / baseline.price_mean;
        assert!((metrics.price_vs_baseline.unwrap() - expected).abs() < 1e-12);
        assert_eq!(metrics.volume_ratio, Some(1.0));
        assert!(metrics.volatility_ratio.is_some());
    }

    #[test]
    fn test_zero_baseline_mean_omits_ratio() {
        let bars = from_closes(&[100.0; 60]);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();
        let metrics = ResultAssembler::current_metrics(&bars, Some(&baseline)).unwrap();
        // Flat prices: baseline volatility mean is zero
        assert!(metrics.volatility_ratio.is_none());
        assert_eq!(metrics.price_vs_baseline, Some(1.0));
    }
}
