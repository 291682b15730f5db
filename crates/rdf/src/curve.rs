//! RDF result curves and ensemble averaging.

use crate::config::RdfConfig;
use crate::error::RdfError;

/// Radial distribution function: bin-center radii and one value per bin.
#[derive(Debug, Clone, PartialEq)]
pub struct RdfCurve {
    radii: Vec<f64>,
    values: Vec<f64>,
}

impl RdfCurve {
    pub(crate) fn new(radii: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(radii.len(), values.len());
        Self { radii, values }
    }

    /// A curve with every value undefined (NaN).
    pub fn undefined(config: &RdfConfig) -> Self {
        let radii = config.radii();
        let values = vec![f64::NAN; radii.len()];
        Self { radii, values }
    }

    /// Bin centers in physical units.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Value per bin; NaN where undefined.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the curve has no bins.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if at least one bin is defined.
    pub fn is_defined(&self) -> bool {
        self.values.iter().any(|v| !v.is_nan())
    }
}

/// Per-bin mean over `curves`, skipping NaN.
///
/// A bin is undefined only if no curve defines it.
///
/// # Errors
///
/// Returns [`RdfError::NoCurves`] for an empty slice and
/// [`RdfError::CurveLengthMismatch`] if bin counts differ.
pub fn ensemble_mean(curves: &[RdfCurve]) -> Result<RdfCurve, RdfError> {
    let first = curves.first().ok_or(RdfError::NoCurves)?;
    let n = first.len();
    for (index, c) in curves.iter().enumerate() {
        if c.len() != n {
            return Err(RdfError::CurveLengthMismatch {
                index,
                len: c.len(),
                expected: n,
            });
        }
    }
    let mut column = Vec::with_capacity(curves.len());
    let values = (0..n)
        .map(|b| {
            column.clear();
            column.extend(curves.iter().map(|c| c.values[b]));
            cirrus_stats::or_nan(cirrus_stats::nan_mean(&column))
        })
        .collect();
    Ok(RdfCurve::new(first.radii.clone(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(values: Vec<f64>) -> RdfCurve {
        let radii = (0..values.len()).map(|i| i as f64 + 0.5).collect();
        RdfCurve::new(radii, values)
    }

    #[test]
    fn mean_skips_nan() {
        let m = ensemble_mean(&[
            curve(vec![1.0, f64::NAN, f64::NAN]),
            curve(vec![3.0, 2.0, f64::NAN]),
        ])
        .unwrap();
        assert_relative_eq!(m.values()[0], 2.0);
        assert_relative_eq!(m.values()[1], 2.0);
        assert!(m.values()[2].is_nan());
        assert_eq!(m.radii(), &[0.5, 1.5, 2.5]);
    }

    #[test]
    fn mean_of_nothing_is_error() {
        assert_eq!(ensemble_mean(&[]), Err(RdfError::NoCurves));
    }

    #[test]
    fn mean_length_mismatch() {
        let err = ensemble_mean(&[curve(vec![1.0]), curve(vec![1.0, 2.0])]).unwrap_err();
        assert_eq!(
            err,
            RdfError::CurveLengthMismatch {
                index: 1,
                len: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn undefined_curve() {
        let c = RdfCurve::undefined(&RdfConfig::new(4.0, 1.0, 0.0));
        assert_eq!(c.len(), 4);
        assert!(!c.is_defined());
    }
}
