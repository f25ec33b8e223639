//! Bar builders for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use pgate_core::{BarSeries, PriceBar};

pub fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap() + Duration::days(i as i64)
}

/// One bar per (open, close, volume).
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

/// Bars opening at the prior close.
pub fn from_closes(closes: &[f64]) -> BarSeries {
    let points: Vec<(f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| (if i == 0 { c } else { closes[i - 1] }, c, 1_000.0))
        .collect();
    series(&points)
}

pub fn from_returns(returns: &[f64]) -> BarSeries {
    let mut closes = vec![100.0];
    for r in returns {
        let last = *closes.last().unwrap();
        closes.push(last * (1.0 + r));
    }
    from_closes(&closes)
}

pub fn alternating(n: usize, r: f64) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { r } else { -r }).collect()
}

/// Deterministic pseudo-noise in [-0.5, 0.5).
pub fn noise(i: usize) -> f64 {
    let v = ((i as f64) * 12.9898 + 78.233).sin() * 43_758.5453;
    v - v.floor() - 0.5
}

/// Random walk: cumulative sum of `noise` starting from 100.
pub fn random_walk(n: usize, seed_offset: usize) -> Vec<f64> {
    let mut price = 100.0;
    (1..=n)
        .map(|i| {
            price += noise(i + seed_offset);
            price
        })
        .collect()
}

/// 80 bars with alternating +/-1% overnight gaps and no intraday move,
/// followed by a final bar gapping by `last_gap`.
pub fn gapped(last_gap: f64) -> BarSeries {
    let mut points = Vec::new();
    let mut close = 100.0;
    for i in 0..80 {
        let gap = if i % 2 == 0 { 0.01 } else { -0.01 };
        let open = close * (1.0 + gap);
        points.push((open, open, 1_000.0));
        close = open;
    }
    let open = close * (1.0 + last_gap);
    points.push((open, open, 1_000.0));
    series(&points)
}
