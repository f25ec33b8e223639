//! Table-driven z-score detectors.
//!
//! Volatility spike, price gap and volume spike differ only in what they
//! observe, which baseline moments they compare against, and how they treat
//! direction and a zero baseline spread. Each is one [`ZScoreRule`] row
//! evaluated by [`ZScoreRule::evaluate`].

use crate::baseline::BaselineStats;
use crate::config::{
    DetectorConfig, EPSILON, GAP_Z_THRESHOLD, HIGH_Z_THRESHOLD, RECENT_WINDOW,
    TRADING_DAYS_PER_YEAR, VOLATILITY_WINDOW, VOLUME_Z_THRESHOLD,
};
use crate::error::{DetectorError, DetectorResult};
use pgate_core::bar::{returns, tail, volumes};
use pgate_core::stats::{mean, sample_std};
use pgate_core::{AnomalySignal, AnomalyType, BarSeries, SignalLevel};

/// The recent quantity a rule measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Annualised sample std of the last `window` returns.
    RecentVolatility { window: usize },
    /// Overnight gap into the latest bar.
    LastGap,
    /// Mean volume of the last `window` bars.
    MeanVolume { window: usize },
}

impl Observation {
    fn metric_name(&self) -> &'static str {
        match self {
            Self::RecentVolatility { .. } => "recent_volatility",
            Self::LastGap => "gap",
            Self::MeanVolume { .. } => "recent_volume_avg",
        }
    }

    fn observe(&self, series: &BarSeries) -> Option<f64> {
        match *self {
            Self::RecentVolatility { window } => {
                let rets = returns(series.bars());
                let recent = tail(&rets, window);
                if recent.len() < 2 {
                    return None;
                }
                Some(sample_std(recent) * TRADING_DAYS_PER_YEAR.sqrt())
            }
            Self::LastGap => {
                let last_two = series.tail(2);
                if last_two.len() < 2 || last_two[0].close == 0.0 {
                    return None;
                }
                Some((last_two[1].open - last_two[0].close) / last_two[0].close)
            }
            Self::MeanVolume { window } => {
                let recent = series.tail(window);
                if recent.is_empty() {
                    return None;
                }
                Some(mean(&volumes(recent)))
            }
        }
    }
}

/// Baseline moments a rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineField {
    Volatility,
    Gap,
    Volume,
}

impl BaselineField {
    fn metric_name(&self) -> &'static str {
        match self {
            Self::Volatility => "baseline_volatility",
            Self::Gap => "baseline_gap_mean",
            Self::Volume => "baseline_volume",
        }
    }

    /// `(mean, std)` of this field.
    fn moments(&self, baseline: &BaselineStats) -> (f64, f64) {
        match self {
            Self::Volatility => (baseline.volatility_mean, baseline.volatility_std),
            Self::Gap => (baseline.gap_mean, baseline.gap_std),
            Self::Volume => (baseline.volume_mean, baseline.volume_std),
        }
    }
}

/// Which deviations count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `|z|` is tested.
    TwoSided,
    /// Only positive `z` is tested.
    UpOnly,
}

impl Direction {
    /// Deviation magnitude relevant to this direction, or `None` if the
    /// sign is excluded.
    fn magnitude(&self, z: f64) -> Option<f64> {
        match self {
            Self::TwoSided => Some(z.abs()),
            Self::UpOnly if z > 0.0 => Some(z),
            Self::UpOnly => None,
        }
    }
}

/// How a zero baseline std is handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroSpread {
    /// Add epsilon to the denominator.
    Epsilon(f64),
    /// Abstain.
    Skip,
}

/// How the fired signal is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    Fixed(AnomalyType),
    /// By the sign of the observation.
    BySign { up: AnomalyType, down: AnomalyType },
}

impl Naming {
    fn resolve(&self, observed: f64) -> AnomalyType {
        match *self {
            Self::Fixed(t) => t,
            Self::BySign { up, down } => {
                if observed >= 0.0 {
                    up
                } else {
                    down
                }
            }
        }
    }
}

/// One row of the z-score detector table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreRule {
    pub name: &'static str,
    pub label: &'static str,
    pub min_bars: usize,
    pub observation: Observation,
    pub baseline_field: BaselineField,
    /// Magnitude above which the rule fires.
    pub threshold: f64,
    /// Magnitude above which the signal is `high`.
    pub high_threshold: f64,
    pub direction: Direction,
    pub zero_spread: ZeroSpread,
    pub naming: Naming,
}

impl ZScoreRule {
    pub fn volatility_spike(config: &DetectorConfig) -> Self {
        Self {
            name: "volatility_spike",
            label: "Volatility spike",
            min_bars: VOLATILITY_WINDOW,
            observation: Observation::RecentVolatility {
                window: VOLATILITY_WINDOW,
            },
            baseline_field: BaselineField::Volatility,
            threshold: config.volatility_threshold,
            high_threshold: HIGH_Z_THRESHOLD,
            direction: Direction::TwoSided,
            zero_spread: ZeroSpread::Epsilon(EPSILON),
            naming: Naming::Fixed(AnomalyType::VolatilitySpike),
        }
    }

    pub fn price_gap() -> Self {
        Self {
            name: "price_gap",
            label: "Price gap",
            min_bars: RECENT_WINDOW,
            observation: Observation::LastGap,
            baseline_field: BaselineField::Gap,
            threshold: GAP_Z_THRESHOLD,
            high_threshold: HIGH_Z_THRESHOLD,
            direction: Direction::TwoSided,
            zero_spread: ZeroSpread::Skip,
            naming: Naming::BySign {
                up: AnomalyType::PriceGapUp,
                down: AnomalyType::PriceGapDown,
            },
        }
    }

    pub fn volume_spike() -> Self {
        Self {
            name: "volume_spike",
            label: "Volume spike",
            min_bars: RECENT_WINDOW,
            observation: Observation::MeanVolume {
                window: RECENT_WINDOW,
            },
            baseline_field: BaselineField::Volume,
            threshold: VOLUME_Z_THRESHOLD,
            high_threshold: HIGH_Z_THRESHOLD,
            direction: Direction::UpOnly,
            zero_spread: ZeroSpread::Skip,
            naming: Naming::Fixed(AnomalyType::VolumeSpike),
        }
    }

    /// The three standard rows.
    pub fn table(config: &DetectorConfig) -> Vec<Self> {
        vec![
            Self::volatility_spike(config),
            Self::price_gap(),
            Self::volume_spike(),
        ]
    }

    /// Evaluate this rule against a series and its baseline.
    ///
    /// `Ok(None)` means the rule abstained or did not fire.
    pub fn evaluate(
        &self,
        series: &BarSeries,
        baseline: &BaselineStats,
    ) -> DetectorResult<Option<AnomalySignal>> {
        if series.len() < self.min_bars {
            return Err(DetectorError::InsufficientData {
                detector: self.name,
                required: self.min_bars,
                available: series.len(),
            });
        }

        let Some(observed) = self.observation.observe(series) else {
            return Ok(None);
        };

        let (base_mean, base_std) = self.baseline_field.moments(baseline);
        let denominator = match self.zero_spread {
            ZeroSpread::Epsilon(eps) => base_std + eps,
            ZeroSpread::Skip if base_std == 0.0 => return Ok(None),
            ZeroSpread::Skip => base_std,
        };

        let z = (observed - base_mean) / denominator;
        if !z.is_finite() {
            return Err(DetectorError::Numerical {
                detector: self.name,
                reason: format!("non-finite z-score from observed={observed}"),
            });
        }

        let Some(magnitude) = self.direction.magnitude(z) else {
            return Ok(None);
        };
        if magnitude <= self.threshold {
            return Ok(None);
        }

        let level = if magnitude > self.high_threshold {
            SignalLevel::High
        } else {
            SignalLevel::Medium
        };
        let anomaly_type = self.naming.resolve(observed);

        let description = format!(
            "{}: {} {:.4} vs baseline {:.4} (std {:.4}), z-score {:.2}",
            self.label,
            self.observation.metric_name(),
            observed,
            base_mean,
            base_std,
            z
        );

        Ok(Some(
            AnomalySignal::new(anomaly_type, level, description)
                .with_metric(self.observation.metric_name(), observed)
                .with_metric(self.baseline_field.metric_name(), base_mean)
                .with_metric("baseline_std", base_std)
                .with_metric("z_score", z),
        ))
    }
}
