//! Descriptive statistics over `f64` slices.
//!
//! Conventions follow the usual sample estimators: `sample_std` divides by
//! `n - 1`, skewness and kurtosis are the bias-adjusted estimators (kurtosis
//! in excess form). Degenerate inputs return `0.0` instead of NaN so callers
//! can guard on a zero spread.

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sum_sq_dev(xs: &[f64], m: f64) -> f64 {
    xs.iter().map(|x| (x - m) * (x - m)).sum()
}

/// Sample standard deviation (`n - 1` denominator); `0.0` below two points.
pub fn sample_std(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return 0.0;
    }
    (sum_sq_dev(xs, mean(xs)) / (n - 1) as f64).sqrt()
}

/// Population standard deviation (`n` denominator); `0.0` for an empty slice.
pub fn population_std(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    (sum_sq_dev(xs, mean(xs)) / xs.len() as f64).sqrt()
}

/// Adjusted Fisher-Pearson skewness. Needs three points and non-zero spread.
pub fn skewness(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() < 3 {
        return 0.0;
    }
    let m = mean(xs);
    let m2 = sum_sq_dev(xs, m) / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = xs.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n;
    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Bias-adjusted excess kurtosis. Needs four points and non-zero spread.
pub fn excess_kurtosis(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    if xs.len() < 4 {
        return 0.0;
    }
    let m = mean(xs);
    let m2 = sum_sq_dev(xs, m) / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let m4 = xs.iter().map(|x| (x - m).powi(4)).sum::<f64>() / n;
    let g2 = m4 / (m2 * m2) - 3.0;
    ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}

/// Sample std of each full trailing window of `window` points.
///
/// Produces `xs.len() - window + 1` values, or none when `xs` is shorter
/// than the window.
pub fn rolling_sample_std(xs: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || xs.len() < window {
        return Vec::new();
    }
    xs.windows(window).map(sample_std).collect()
}

/// Least-squares slope of `ys` against `xs`.
///
/// Returns `None` when the inputs differ in length, hold fewer than two
/// points, or `xs` has no spread.
pub fn ols_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let x_mean = mean(xs);
    let y_mean = mean(ys);
    let sxx = sum_sq_dev(xs, x_mean);
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    Some(sxy / sxx)
}

/// Least-squares slope of `ys` against its index `0..n`.
pub fn index_slope(ys: &[f64]) -> Option<f64> {
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    ols_slope(&xs, ys)
}
