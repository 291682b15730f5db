//! Statistical helper functions for cirrus.
//!
//! Every estimator returns `Option<f64>`: `None` marks a statistic that is
//! undefined for the given sample (too few values, zero spread). Callers turn
//! `None` into the NaN sentinel only at the output boundary.

mod bins;
mod error;

pub use bins::{BinEdges, histogram};
pub use error::StatsError;

/// Arithmetic mean of a slice. Returns `None` if empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sum: f64 = data.iter().sum();
    Some(sum / data.len() as f64)
}

/// Sample variance with N-1 denominator (numpy `var(ddof=1)`).
/// Returns `None` if fewer than 2 elements.
pub fn sample_variance(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    Some(data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0))
}

/// Mean over the finite values of a slice. Returns `None` if none is finite.
pub fn nan_mean(data: &[f64]) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Pearson correlation coefficient.
///
/// Filters to indices where both `x[i]` and `y[i]` are finite.
/// Returns `None` if fewer than 2 finite pairs or if the denominator is zero
/// (constant input).
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx: f64 = pairs.iter().map(|(xi, _)| xi).sum::<f64>() / n;
    let my: f64 = pairs.iter().map(|(_, yi)| yi).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for &(xi, yi) in &pairs {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 {
        return None;
    }

    Some(sum_xy / denom)
}

/// Converts an optional statistic into the output sentinel (NaN when undefined).
pub fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}
