//! Bar builders shared by unit tests.

use chrono::{Duration, NaiveDate};
use pgate_core::{BarSeries, PriceBar};

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
}

/// One bar per (open, close, volume); high/low bracket open and close.
pub fn series(points: &[(f64, f64, f64)]) -> BarSeries {
    let bars = points
        .iter()
        .enumerate()
        .map(|(i, &(open, close, volume))| {
            PriceBar::new(day(i), open, open.max(close), open.min(close), close, volume)
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

/// Bars that open at the prior close, with constant volume.
pub fn from_closes(closes: &[f64]) -> BarSeries {
    let points: Vec<(f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| (if i == 0 { c } else { closes[i - 1] }, c, 1000.0))
        .collect();
    series(&points)
}

/// Closes compounding the given returns from 100.
pub fn from_returns(returns: &[f64]) -> BarSeries {
    let mut closes = vec![100.0];
    for r in returns {
        let last = *closes.last().unwrap();
        closes.push(last * (1.0 + r));
    }
    from_closes(&closes)
}

/// `n` returns alternating `+r`, `-r`.
pub fn alternating(n: usize, r: f64) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { r } else { -r }).collect()
}
