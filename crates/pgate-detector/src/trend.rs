//! Trend reversal: the short-horizon slope turns against the long one.

use crate::baseline::BaselineStats;
use crate::config::{
    EPSILON, REVERSAL_HIGH_STRENGTH, REVERSAL_RATIO, TREND_LONG_WINDOW, TREND_SHORT_WINDOW,
};
use crate::error::{DetectorError, DetectorResult};
use pgate_core::bar::tail;
use pgate_core::stats::index_slope;
use pgate_core::{AnomalySignal, AnomalyType, BarSeries, SignalLevel};

pub const NAME: &str = "trend_reversal";

fn slope(closes: &[f64], window: usize) -> DetectorResult<f64> {
    index_slope(tail(closes, window)).ok_or_else(|| DetectorError::Numerical {
        detector: NAME,
        reason: format!("regression over {window} bars failed"),
    })
}

/// Compare least-squares close slopes over the last 20 and last 5 bars.
///
/// Fires when the slopes have opposite signs and the 5-bar slope is more
/// than 1.5x steeper.
pub fn detect(
    series: &BarSeries,
    _baseline: &BaselineStats,
) -> DetectorResult<Option<AnomalySignal>> {
    if series.len() < TREND_LONG_WINDOW {
        return Err(DetectorError::InsufficientData {
            detector: NAME,
            required: TREND_LONG_WINDOW,
            available: series.len(),
        });
    }

    let closes = series.closes();
    let trend_long = slope(&closes, TREND_LONG_WINDOW)?;
    let trend_short = slope(&closes, TREND_SHORT_WINDOW)?;

    let opposite = trend_long * trend_short < 0.0;
    if !opposite || trend_short.abs() <= REVERSAL_RATIO * trend_long.abs() {
        return Ok(None);
    }

    let strength = trend_short.abs() / (trend_long.abs() + EPSILON);
    let level = if strength > REVERSAL_HIGH_STRENGTH {
        SignalLevel::High
    } else {
        SignalLevel::Medium
    };

    let description = format!(
        "Trend reversal: {}-bar slope {:+.4} against {}-bar slope {:+.4} (strength {:.2})",
        TREND_SHORT_WINDOW, trend_short, TREND_LONG_WINDOW, trend_long, strength
    );

    Ok(Some(
        AnomalySignal::new(AnomalyType::TrendReversal, level, description)
            .with_metric("trend_20d", trend_long)
            .with_metric("trend_5d", trend_short)
            .with_metric("reversal_strength", strength),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineCalculator;
    use crate::testutil::from_closes;

    fn run(closes: &[f64]) -> Option<AnomalySignal> {
        let bars = from_closes(closes);
        let baseline = BaselineCalculator::new(closes.len()).calculate(&bars).unwrap();
        detect(&bars, &baseline).unwrap()
    }

    #[test]
    fn test_steady_uptrend_no_reversal() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert!(run(&closes).is_none());
    }

    #[test]
    fn test_flat_series_no_reversal() {
        assert!(run(&[100.0; 30]).is_none());
    }

    fn climb_then_drop(drop_per_bar: f64) -> Vec<f64> {
        let mut closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let top = *closes.last().unwrap();
        closes.extend((1..=5).map(|i| top - drop_per_bar * i as f64));
        closes
    }

    #[test]
    fn test_sharp_drop_after_uptrend_is_high() {
        let signal = run(&climb_then_drop(2.0)).unwrap();
        assert_eq!(signal.anomaly_type, AnomalyType::TrendReversal);
        assert!(signal.metric("trend_5d").unwrap() < 0.0);
        assert!(signal.metric("trend_20d").unwrap() > 0.0);
        assert_eq!(signal.level, SignalLevel::High);
    }

    #[test]
    fn test_moderate_drop_is_medium() {
        let signal = run(&climb_then_drop(1.5)).unwrap();
        let strength = signal.metric("reversal_strength").unwrap();
        assert!(strength > REVERSAL_RATIO && strength <= REVERSAL_HIGH_STRENGTH);
        assert_eq!(signal.level, SignalLevel::Medium);
    }

    #[test]
    fn test_too_few_bars() {
        let bars = from_closes(&[100.0; 10]);
        let baseline = BaselineCalculator::new(10).calculate(&bars).unwrap();
        assert!(matches!(
            detect(&bars, &baseline),
            Err(DetectorError::InsufficientData { required: 20, .. })
        ));
    }
}
