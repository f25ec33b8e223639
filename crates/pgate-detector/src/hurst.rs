//! Market structure via the Hurst exponent.
//!
//! The exponent is estimated with classical rescaled-range (R/S) analysis:
//! for each lag `L`, the returns are cut into non-overlapping windows of
//! length `L`; each window contributes `R / S`, where `R` is the range of
//! its mean-adjusted cumulative sum and `S` its (population) std. The slope
//! of `ln(mean R/S)` on `ln(L)` is the exponent.
//!
//! H near 0.5 is a random walk, above 0.5 persistent, below 0.5 mean-reverting.

use crate::baseline::BaselineStats;
use crate::config::{
    HURST_MAX_LAG, HURST_MEAN_REVERTING, HURST_MIN_BARS, HURST_MIN_POINTS, HURST_OBSERVATIONS,
    HURST_RANDOM_WALK, HURST_TRENDING,
};
use crate::error::{DetectorError, DetectorResult};
use pgate_core::bar::{returns, tail};
use pgate_core::stats::{mean, ols_slope, population_std};
use pgate_core::{AnomalySignal, AnomalyType, BarSeries, SignalLevel};
use tracing::warn;

pub const NAME: &str = "market_structure";

/// Mean R/S across the complete windows of one lag, `None` if every window
/// had zero spread.
fn mean_rescaled_range(series: &[f64], lag: usize) -> Option<f64> {
    let ratios: Vec<f64> = series
        .chunks_exact(lag)
        .filter_map(|window| {
            let s = population_std(window);
            if s == 0.0 {
                return None;
            }
            let m = mean(window);
            let mut cumulative = 0.0;
            let mut high = f64::MIN;
            let mut low = f64::MAX;
            for x in window {
                cumulative += x - m;
                high = high.max(cumulative);
                low = low.min(cumulative);
            }
            Some((high - low) / s)
        })
        .collect();

    if ratios.is_empty() {
        None
    } else {
        Some(mean(&ratios))
    }
}

/// Estimate the Hurst exponent, clamped to `[0, 1]`.
///
/// Fewer than three usable lags gives the random-walk value 0.5. A failed
/// or non-finite regression is an error.
pub fn try_hurst_exponent(series: &[f64]) -> DetectorResult<f64> {
    let max_lag = HURST_MAX_LAG.min(series.len() / 2);

    let mut log_lags = Vec::new();
    let mut log_rs = Vec::new();
    for lag in 2..max_lag {
        if let Some(rs) = mean_rescaled_range(series, lag) {
            if rs > 0.0 {
                log_lags.push((lag as f64).ln());
                log_rs.push(rs.ln());
            }
        }
    }

    if log_lags.len() < HURST_MIN_POINTS {
        return Ok(HURST_RANDOM_WALK);
    }

    let slope = ols_slope(&log_lags, &log_rs).ok_or_else(|| DetectorError::Numerical {
        detector: NAME,
        reason: "R/S regression failed".to_string(),
    })?;
    if !slope.is_finite() {
        return Err(DetectorError::Numerical {
            detector: NAME,
            reason: format!("non-finite Hurst slope {slope}"),
        });
    }

    Ok(slope.clamp(0.0, 1.0))
}

/// [`try_hurst_exponent`] with the random-walk fallback on failure.
pub fn hurst_exponent(series: &[f64]) -> f64 {
    try_hurst_exponent(series).unwrap_or_else(|e| {
        warn!(error = %e, "Hurst estimation failed, assuming random walk");
        HURST_RANDOM_WALK
    })
}

/// Flag a strongly trending or mean-reverting regime.
///
/// Callers only run this for market-wide series, not individual stocks.
pub fn detect(
    series: &BarSeries,
    _baseline: &BaselineStats,
) -> DetectorResult<Option<AnomalySignal>> {
    if series.len() < HURST_MIN_BARS {
        return Err(DetectorError::InsufficientData {
            detector: NAME,
            required: HURST_MIN_BARS,
            available: series.len(),
        });
    }

    let rets = returns(series.bars());
    let recent = tail(&rets, HURST_OBSERVATIONS);
    let h = hurst_exponent(recent);

    let (anomaly_type, regime) = if h < HURST_MEAN_REVERTING {
        (AnomalyType::MarketStructureMeanReverting, "mean-reverting")
    } else if h > HURST_TRENDING {
        (AnomalyType::MarketStructureTrending, "trending")
    } else {
        return Ok(None);
    };

    let description = format!(
        "Market structure {regime}: Hurst exponent {h:.3} over {} returns",
        recent.len()
    );

    Ok(Some(
        AnomalySignal::new(anomaly_type, SignalLevel::Medium, description)
            .with_metric("hurst_exponent", h)
            .with_metric("observations", recent.len() as f64),
    ))
}
