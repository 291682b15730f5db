//! Non-dimensional scaling ratios derived from box statistics.
//!
//! For a Poisson cloud ensemble with exponentially distributed cloud mass
//! the variance of the box mass satisfies `var_M = 2 <M> <m>`, so
//! `R_V = 1`. `alpha` and `beta` measure the departures of the cloud count
//! and the cloud mass distributions from these assumptions.

use crate::statistics::BoxStatistics;

/// Scaling ratios of one box. `None` where an input is undefined or a
/// denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScalingRatios {
    /// `var_M / (2 <M> <m>)`.
    pub r_v: Option<f64>,
    /// `var_N / <N>`.
    pub alpha: Option<f64>,
    /// `var_m / <m>^2`.
    pub beta: Option<f64>,
    /// `var_M / ((1 + alpha) <M> <m>)`.
    pub r_v_alpha: Option<f64>,
    /// `var_M / ((1 + beta) <M> <m>)`.
    pub r_v_beta: Option<f64>,
    /// `var_M / ((alpha + beta) <M> <m>)`.
    pub r_v_alpha_beta: Option<f64>,
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

impl ScalingRatios {
    /// Derives the ratios from `stats`.
    pub fn from_statistics(stats: &BoxStatistics) -> Self {
        let mm = match (stats.mean_big_m, stats.mean_m) {
            (Some(big), Some(small)) => Some(big * small),
            _ => None,
        };
        let alpha = ratio(stats.var_n, stats.mean_n);
        let beta = ratio(stats.var_m, stats.mean_m.map(|m| m * m));
        let scaled = |factor: Option<f64>| ratio(stats.var_big_m, factor.zip(mm).map(|(f, p)| f * p));
        Self {
            r_v: scaled(Some(2.0)),
            alpha,
            beta,
            r_v_alpha: scaled(alpha.map(|a| 1.0 + a)),
            r_v_beta: scaled(beta.map(|b| 1.0 + b)),
            r_v_alpha_beta: scaled(alpha.zip(beta).map(|(a, b)| a + b)),
        }
    }
}
