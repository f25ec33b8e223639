//! Rolling statistical baselines.
//!
//! A baseline summarises the trailing `lookback_days` bars and is the
//! reference distribution every z-score test compares against. It is
//! computed per call and handed to detectors by reference; nothing is
//! cached between calls.

use crate::config::{TRADING_DAYS_PER_YEAR, VOLATILITY_WINDOW};
use pgate_core::bar::{closes, gaps, log_returns, returns, volumes};
use pgate_core::stats::{excess_kurtosis, mean, rolling_sample_std, sample_std, skewness};
use pgate_core::BarSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Immutable snapshot of the lookback window's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub price_mean: f64,
    pub price_std: f64,
    pub return_mean: f64,
    pub return_std: f64,
    pub return_skewness: f64,
    pub return_kurtosis: f64,
    pub log_return_std: f64,
    /// Mean of the annualised rolling volatility series.
    pub volatility_mean: f64,
    pub volatility_std: f64,
    pub volume_mean: f64,
    pub volume_std: f64,
    pub gap_mean: f64,
    pub gap_std: f64,
    /// Bars the baseline was computed from.
    pub sample_size: usize,
}

/// Computes [`BaselineStats`] from the tail of a series.
#[derive(Debug, Clone, Copy)]
pub struct BaselineCalculator {
    lookback_days: usize,
}

impl BaselineCalculator {
    pub fn new(lookback_days: usize) -> Self {
        Self { lookback_days }
    }

    pub fn lookback_days(&self) -> usize {
        self.lookback_days
    }

    /// Compute the baseline, or `None` when fewer than `lookback_days` bars exist.
    pub fn calculate(&self, series: &BarSeries) -> Option<BaselineStats> {
        if series.len() < self.lookback_days {
            debug!(
                available = series.len(),
                required = self.lookback_days,
                "Insufficient bars for baseline"
            );
            return None;
        }

        let window = series.tail(self.lookback_days);
        let prices = closes(window);
        let rets = returns(window);
        let volume = volumes(window);
        let overnight = gaps(window);

        let annualise = TRADING_DAYS_PER_YEAR.sqrt();
        let volatility: Vec<f64> = rolling_sample_std(&rets, VOLATILITY_WINDOW)
            .into_iter()
            .map(|v| v * annualise)
            .collect();

        Some(BaselineStats {
            price_mean: mean(&prices),
            price_std: sample_std(&prices),
            return_mean: mean(&rets),
            return_std: sample_std(&rets),
            return_skewness: skewness(&rets),
            return_kurtosis: excess_kurtosis(&rets),
            log_return_std: sample_std(&log_returns(window)),
            volatility_mean: mean(&volatility),
            volatility_std: sample_std(&volatility),
            volume_mean: mean(&volume),
            volume_std: sample_std(&volume),
            gap_mean: mean(&overnight),
            gap_std: sample_std(&overnight),
            sample_size: window.len(),
        })
    }
}
