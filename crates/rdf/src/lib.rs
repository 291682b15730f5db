//! Radial distribution functions of labeled cloud fields.
//!
//! The RDF measures how much more likely it is to find cloud at distance `r`
//! from a cloud than at a random location. Values above 1 indicate
//! clustering, values below 1 regular spacing.
//!
//! # Quick start
//!
//! ```
//! use cirrus_objects::LabelMap;
//! use cirrus_rdf::{RdfConfig, gated_rdf};
//! use ndarray::{Array2, array};
//!
//! let labels = LabelMap::from_array(array![
//!     [1, 1, 0, 0],
//!     [0, 0, 0, 2],
//!     [0, 0, 0, 2],
//! ]);
//! let field = Array2::<f64>::ones((3, 4));
//! let config = RdfConfig::new(3.0, 1.0, 0.1);
//!
//! let curve = gated_rdf(&labels, field.view(), None, &config).unwrap();
//! assert_eq!(curve.len(), 3);
//! assert!(curve.is_defined());
//! ```
//!
//! # Architecture
//!
//! ```text
//! compute_rdf() / gated_rdf()
//!   ├─ input checks, once per call
//!   ├─ coverage gate    (gated only: occupied / valid > min_coverage)
//!   └─ rdf_of_valid()
//!        ├─ valid area  (mask.rs: exclusion mask, disk erosion)
//!        ├─ Raster      (raster.rs: occupied-cell pair counts)
//!        └─ Centroid    (centroid.rs: center-of-mass pair histogram)
//! ensemble_mean()       (curve.rs: NaN-skipping mean over members)
//! ```

mod centroid;
mod config;
mod curve;
mod error;
mod mask;
mod raster;

use cirrus_objects::{LabelMap, aggregate};
use ndarray::{Array2, ArrayView2};
use tracing::trace;

pub use config::{RdfConfig, RdfMethod};
pub use curve::{RdfCurve, ensemble_mean};
pub use error::RdfError;

/// Computes the RDF of a label map.
///
/// `field` weights the object centers for [`RdfMethod::Centroid`]; the raster
/// method only looks at which cells are labeled. Cells flagged in `excluded`
/// count neither as points nor as valid area.
///
/// # Errors
///
/// Returns an error for an invalid configuration or when `field` or
/// `excluded` do not match the label map.
pub fn compute_rdf(
    labels: &LabelMap,
    field: ArrayView2<'_, f64>,
    excluded: Option<ArrayView2<'_, bool>>,
    config: &RdfConfig,
) -> Result<RdfCurve, RdfError> {
    config.validate()?;
    let valid = checked_valid(labels, field, excluded)?;
    rdf_of_valid(labels, field, &valid, config)
}

/// Fraction of valid cells that are labeled. `None` without valid cells.
///
/// # Errors
///
/// Returns [`RdfError::ShapeMismatch`] if `excluded` does not match the
/// label map.
pub fn coverage(
    labels: &LabelMap,
    excluded: Option<ArrayView2<'_, bool>>,
) -> Result<Option<f64>, RdfError> {
    let valid = checked_mask(labels.dim(), excluded)?;
    Ok(coverage_of_valid(labels, &valid))
}

/// Computes the RDF only if the coverage exceeds `min_coverage`; otherwise
/// returns an undefined curve.
///
/// # Errors
///
/// Same as [`compute_rdf`]. Shape and configuration errors are reported even
/// when the coverage gate fails.
pub fn gated_rdf(
    labels: &LabelMap,
    field: ArrayView2<'_, f64>,
    excluded: Option<ArrayView2<'_, bool>>,
    config: &RdfConfig,
) -> Result<RdfCurve, RdfError> {
    config.validate()?;
    let valid = checked_valid(labels, field, excluded)?;
    match coverage_of_valid(labels, &valid) {
        Some(cov) if cov > config.min_coverage() => rdf_of_valid(labels, field, &valid, config),
        cov => {
            trace!(
                coverage = ?cov,
                min_coverage = config.min_coverage(),
                "coverage below threshold, rdf undefined"
            );
            Ok(RdfCurve::undefined(config))
        }
    }
}

/// Inputs must already be checked against the label map.
fn rdf_of_valid(
    labels: &LabelMap,
    field: ArrayView2<'_, f64>,
    valid: &Array2<bool>,
    config: &RdfConfig,
) -> Result<RdfCurve, RdfError> {
    let values = match config.method() {
        RdfMethod::Raster => {
            let occupied = occupied_mask(labels, valid);
            raster::raster_rdf(&occupied, valid, config)
        }
        RdfMethod::Centroid => {
            let objects = aggregate(labels, field, None)?;
            centroid::centroid_rdf(objects.centers(), valid, config)?
        }
    };
    Ok(RdfCurve::new(config.radii(), values))
}

fn coverage_of_valid(labels: &LabelMap, valid: &Array2<bool>) -> Option<f64> {
    let n_valid = valid.iter().filter(|&&v| v).count();
    if n_valid == 0 {
        return None;
    }
    let n_occupied = occupied_mask(labels, valid).iter().filter(|&&o| o).count();
    Some(n_occupied as f64 / n_valid as f64)
}

fn checked_valid(
    labels: &LabelMap,
    field: ArrayView2<'_, f64>,
    excluded: Option<ArrayView2<'_, bool>>,
) -> Result<Array2<bool>, RdfError> {
    let dim = labels.dim();
    if field.dim() != dim {
        return Err(RdfError::ShapeMismatch {
            input: "field",
            expected: dim,
            got: field.dim(),
        });
    }
    checked_mask(dim, excluded)
}

fn checked_mask(
    dim: (usize, usize),
    excluded: Option<ArrayView2<'_, bool>>,
) -> Result<Array2<bool>, RdfError> {
    if let Some(ex) = &excluded
        && ex.dim() != dim
    {
        return Err(RdfError::ShapeMismatch {
            input: "mask",
            expected: dim,
            got: ex.dim(),
        });
    }
    Ok(mask::valid_mask(dim, excluded))
}

fn occupied_mask(labels: &LabelMap, valid: &Array2<bool>) -> Array2<bool> {
    let mut occupied = labels.view().mapv(|l| l > 0);
    ndarray::Zip::from(&mut occupied)
        .and(valid)
        .for_each(|o, &v| *o = *o && v);
    occupied
}
