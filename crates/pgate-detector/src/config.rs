//! Detector configuration and thresholds.
//!
//! Only the lookback window and the volatility z-score threshold are
//! caller-tunable. The remaining cutoffs are empirical constants.

use crate::error::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};

/// Trading days used to annualise daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Returns per rolling volatility window.
pub const VOLATILITY_WINDOW: usize = 20;
/// Added to a zero-able denominator where the rule guards with epsilon.
pub const EPSILON: f64 = 1e-8;

/// Bars in the "recent" window used by gap, volume and movement checks.
pub const RECENT_WINDOW: usize = 5;
/// |z| above which a z-score signal is `high`.
pub const HIGH_Z_THRESHOLD: f64 = 3.0;
pub const GAP_Z_THRESHOLD: f64 = 2.0;
pub const VOLUME_Z_THRESHOLD: f64 = 2.0;

/// A return counts as a large move beyond this many baseline stds.
pub const LARGE_MOVE_STD_MULTIPLE: f64 = 2.0;
pub const LARGE_MOVE_COUNT: usize = 3;
pub const LARGE_MOVE_COUNT_HIGH: usize = 4;
pub const MOVE_Z_THRESHOLD: f64 = 3.0;
pub const MOVE_Z_HIGH: f64 = 4.0;

pub const TREND_LONG_WINDOW: usize = 20;
pub const TREND_SHORT_WINDOW: usize = 5;
/// Short slope must exceed the long slope by this factor to count as a reversal.
pub const REVERSAL_RATIO: f64 = 1.5;
pub const REVERSAL_HIGH_STRENGTH: f64 = 3.0;

pub const HURST_MIN_BARS: usize = 30;
/// Most recent returns fed to R/S analysis.
pub const HURST_OBSERVATIONS: usize = 30;
/// Exclusive upper bound on R/S lag.
pub const HURST_MAX_LAG: usize = 10;
pub const HURST_MIN_POINTS: usize = 3;
pub const HURST_RANDOM_WALK: f64 = 0.5;
pub const HURST_MEAN_REVERTING: f64 = 0.3;
pub const HURST_TRENDING: f64 = 0.7;

pub const DEFAULT_LOOKBACK_DAYS: usize = 60;
pub const DEFAULT_VOLATILITY_THRESHOLD: f64 = 2.0;
/// Smallest lookback that still yields two rolling volatility samples.
pub const MIN_LOOKBACK_DAYS: usize = VOLATILITY_WINDOW + 2;

/// Configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Trailing bars used for the baseline. Fewer bars means no baseline.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,
    /// |z| on annualised volatility that counts as a spike.
    #[serde(default = "default_volatility_threshold")]
    pub volatility_threshold: f64,
}

fn default_lookback_days() -> usize {
    DEFAULT_LOOKBACK_DAYS
}

fn default_volatility_threshold() -> f64 {
    DEFAULT_VOLATILITY_THRESHOLD
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            volatility_threshold: default_volatility_threshold(),
        }
    }
}

impl DetectorConfig {
    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - lookback_days < MIN_LOOKBACK_DAYS
    /// - volatility_threshold is not a positive finite number
    pub fn validate(&self) -> DetectorResult<()> {
        if self.lookback_days < MIN_LOOKBACK_DAYS {
            return Err(DetectorError::ConfigError(format!(
                "lookback_days ({}) must be at least {}",
                self.lookback_days, MIN_LOOKBACK_DAYS
            )));
        }

        if !self.volatility_threshold.is_finite() || self.volatility_threshold <= 0.0 {
            return Err(DetectorError::ConfigError(format!(
                "volatility_threshold ({}) must be positive",
                self.volatility_threshold
            )));
        }

        Ok(())
    }
}
