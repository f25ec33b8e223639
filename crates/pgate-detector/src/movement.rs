//! Abnormal price movement: a cluster of large returns in the recent window.

use crate::baseline::BaselineStats;
use crate::config::{
    LARGE_MOVE_COUNT, LARGE_MOVE_COUNT_HIGH, LARGE_MOVE_STD_MULTIPLE, MOVE_Z_HIGH,
    MOVE_Z_THRESHOLD, RECENT_WINDOW,
};
use crate::error::{DetectorError, DetectorResult};
use pgate_core::bar::{returns, tail};
use pgate_core::{AnomalySignal, AnomalyType, BarSeries, SignalLevel};

pub const NAME: &str = "abnormal_price_movement";

/// Count how many of the last five returns exceed twice the baseline
/// return std, and the largest |z| among them.
///
/// Fires when the count reaches 3 or the largest |z| exceeds 3. The count is
/// over the window, not a consecutive run.
pub fn detect(
    series: &BarSeries,
    baseline: &BaselineStats,
) -> DetectorResult<Option<AnomalySignal>> {
    if series.len() < RECENT_WINDOW {
        return Err(DetectorError::InsufficientData {
            detector: NAME,
            required: RECENT_WINDOW,
            available: series.len(),
        });
    }
    if baseline.return_std == 0.0 {
        return Ok(None);
    }

    let rets = returns(series.bars());
    let recent = tail(&rets, RECENT_WINDOW);
    if recent.is_empty() {
        return Ok(None);
    }

    let cutoff = LARGE_MOVE_STD_MULTIPLE * baseline.return_std;
    let large_moves = recent.iter().filter(|r| r.abs() > cutoff).count();
    let max_abs_return = recent.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()));
    let max_z = recent
        .iter()
        .map(|r| ((r - baseline.return_mean) / baseline.return_std).abs())
        .fold(0.0_f64, f64::max);

    if !max_z.is_finite() {
        return Err(DetectorError::Numerical {
            detector: NAME,
            reason: "non-finite return z-score".to_string(),
        });
    }

    if large_moves < LARGE_MOVE_COUNT && max_z <= MOVE_Z_THRESHOLD {
        return Ok(None);
    }

    let level = if large_moves >= LARGE_MOVE_COUNT_HIGH || max_z > MOVE_Z_HIGH {
        SignalLevel::High
    } else {
        SignalLevel::Medium
    };

    let description = format!(
        "Abnormal price movement: {} of last {} returns beyond {:.1} std, max |return| {:.2}% (z-score {:.2})",
        large_moves,
        recent.len(),
        LARGE_MOVE_STD_MULTIPLE,
        max_abs_return * 100.0,
        max_z
    );

    Ok(Some(
        AnomalySignal::new(AnomalyType::AbnormalPriceMovement, level, description)
            .with_metric("large_move_count", large_moves as f64)
            .with_metric("max_abs_return", max_abs_return)
            .with_metric("max_return_zscore", max_z)
            .with_metric("baseline_return_std", baseline.return_std)
            .with_metric("baseline_log_return_std", baseline.log_return_std),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineCalculator;
    use crate::testutil::{alternating, from_closes, from_returns};

    #[test]
    fn test_flat_series_abstains() {
        let bars = from_closes(&[50.0; 70]);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();
        assert!(detect(&bars, &baseline).unwrap().is_none());
    }

    #[test]
    fn test_quiet_series_does_not_fire() {
        let bars = from_returns(&alternating(79, 0.01));
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();
        assert!(detect(&bars, &baseline).unwrap().is_none());
    }

    #[test]
    fn test_cluster_of_large_moves_is_high() {
        let mut rets = alternating(75, 0.01);
        rets.extend(alternating(5, 0.04));
        let bars = from_returns(&rets);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();

        let signal = detect(&bars, &baseline).unwrap().unwrap();
        assert_eq!(signal.anomaly_type, AnomalyType::AbnormalPriceMovement);
        assert_eq!(signal.level, SignalLevel::High);
        assert_eq!(signal.metric("large_move_count"), Some(5.0));
    }

    #[test]
    fn test_single_extreme_move_fires_on_z() {
        let mut rets = alternating(79, 0.01);
        rets.push(-0.10);
        let bars = from_returns(&rets);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();

        let signal = detect(&bars, &baseline).unwrap().unwrap();
        assert_eq!(signal.metric("large_move_count"), Some(1.0));
        assert!(signal.metric("max_return_zscore").unwrap() > MOVE_Z_HIGH);
        assert_eq!(signal.level, SignalLevel::High);
    }

    #[test]
    fn test_three_moderate_moves_are_medium() {
        let mut rets = alternating(75, 0.01);
        rets.extend([0.025, -0.025, 0.025, 0.0, 0.0]);
        let bars = from_returns(&rets);
        let baseline = BaselineCalculator::new(60).calculate(&bars).unwrap();

        let signal = detect(&bars, &baseline).unwrap().unwrap();
        assert_eq!(signal.level, SignalLevel::Medium);
        assert_eq!(signal.metric("large_move_count"), Some(3.0));
        let z = signal.metric("max_return_zscore").unwrap();
        assert!(z > 2.0 && z <= MOVE_Z_THRESHOLD, "z = {z}");

        let simple = signal.metric("baseline_return_std").unwrap();
        let log = signal.metric("baseline_log_return_std").unwrap();
        assert!(log > 0.0);
        assert!((log - simple).abs() < 1e-3);
    }
}
