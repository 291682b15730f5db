//! Coarse means of an auxiliary field (e.g. microphysical heating rate).

use cirrus_stats::{mean, sample_variance};
use ndarray::{ArrayView2, s};

use crate::grid::BoxGrid;

/// Ensemble mean and variance of the per-member box average of an
/// auxiliary field. Not subject to the object-count policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuxiliaryStatistics {
    /// Mean over members of the box average.
    pub mean: Option<f64>,
    /// Bessel-corrected variance over members of the box average.
    pub var: Option<f64>,
}

/// Box statistics of `fields` (one per member) for every box of `grid`, in
/// row-major order. Shapes must already be validated.
pub(crate) fn box_statistics(grid: &BoxGrid, fields: &[ArrayView2<'_, f64>]) -> Vec<AuxiliaryStatistics> {
    let mut member_means = Vec::with_capacity(fields.len());
    grid.boxes()
        .map(|b| {
            let (rows, cols) = grid.cell_ranges(b);
            member_means.clear();
            member_means.extend(
                fields
                    .iter()
                    .filter_map(|f| f.slice(s![rows.clone(), cols.clone()]).mean()),
            );
            AuxiliaryStatistics {
                mean: mean(&member_means),
                var: sample_variance(&member_means),
            }
        })
        .collect()
}
