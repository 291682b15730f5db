//! Coarse-grained ensemble statistics of cloud objects.
//!
//! The domain is partitioned into square boxes at several scales. For every
//! box the objects of all ensemble members are collected by center of mass
//! and reduced to the ensemble mean and variance of the object count `N`,
//! the summed object value `M` and the individual object value `m`.
//!
//! # Quick start
//!
//! ```
//! use cirrus_coarse::{BoxIndex, CoarseConfig, ScaleIndex, ScaleSet, accumulate};
//! use cirrus_objects::CloudObjects;
//!
//! let members = vec![
//!     CloudObjects::from_parts(vec![1.0], vec![3.0], vec![[0.5, 0.5]]),
//!     CloudObjects::from_parts(vec![1.0], vec![5.0], vec![[0.0, 1.0]]),
//! ];
//! let config = CoarseConfig::new(ScaleSet::new(vec![2]).unwrap());
//! let result = accumulate(&config, &members, (4, 4), None, None).unwrap();
//!
//! let stats = result.scale(ScaleIndex(0)).statistics(BoxIndex::new(0, 0));
//! assert_eq!(stats.mean_n, Some(1.0));
//! assert_eq!(stats.mean_m, Some(4.0));
//! ```
//!
//! # Architecture
//!
//! ```text
//! accumulate()
//!   └─ per scale (grid.rs: ScaleSet, BoxGrid)
//!        ├─ sample_boxes()          (sample.rs: EnsembleBoxSample)
//!        ├─ BoxStatistics::compute  (statistics.rs, min-count policy)
//!        ├─ CondHistogram::add_box  (histogram.rs)
//!        └─ auxiliary box means     (auxiliary.rs)
//! ScalingRatios                     (scaling.rs)
//! ```

pub mod auxiliary;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod index;
pub mod sample;
pub mod scaling;
pub mod statistics;

use cirrus_objects::CloudObjects;
use ndarray::ArrayView2;
use tracing::trace;

pub use auxiliary::AuxiliaryStatistics;
pub use error::CoarseError;
pub use grid::{BoxGrid, ScaleSet, grids};
pub use histogram::CondHistogram;
pub use index::{BoxIndex, MemberIndex, ScaleIndex};
pub use sample::{BoxSampleBuilder, EnsembleBoxSample, sample_box, sample_boxes};
pub use scaling::ScalingRatios;
pub use statistics::BoxStatistics;

/// Configuration for [`accumulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseConfig {
    /// Box side lengths.
    scales: ScaleSet,
    /// Minimum number of members with an object for a box to be computed.
    min_object_count: usize,
    /// Compute the m-N correlation.
    correlation: bool,
}

impl CoarseConfig {
    /// Creates a configuration.
    ///
    /// Defaults: `min_object_count = 1`, `correlation = false`.
    pub fn new(scales: ScaleSet) -> Self {
        Self {
            scales,
            min_object_count: 1,
            correlation: false,
        }
    }

    /// Sets the minimum number of members with objects (inclusive).
    pub fn with_min_object_count(mut self, min_object_count: usize) -> Self {
        self.min_object_count = min_object_count;
        self
    }

    /// Enables or disables the correlation.
    pub fn with_correlation(mut self, correlation: bool) -> Self {
        self.correlation = correlation;
        self
    }

    /// Returns the scales.
    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    /// Returns the minimum member count.
    pub fn min_object_count(&self) -> usize {
        self.min_object_count
    }

    /// Returns whether the correlation is computed.
    pub fn correlation(&self) -> bool {
        self.correlation
    }
}

impl Default for CoarseConfig {
    fn default() -> Self {
        Self::new(ScaleSet::default())
    }
}

/// Box results at one scale, row-major over the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleResult {
    grid: BoxGrid,
    statistics: Vec<BoxStatistics>,
    auxiliary: Option<Vec<AuxiliaryStatistics>>,
}

impl ScaleResult {
    /// The box grid.
    pub fn grid(&self) -> &BoxGrid {
        &self.grid
    }

    /// Statistics of box `b`.
    ///
    /// # Panics
    ///
    /// Panics if `b` lies outside the grid.
    pub fn statistics(&self, b: BoxIndex) -> &BoxStatistics {
        &self.statistics[self.grid.flat(b)]
    }

    /// Auxiliary statistics of box `b`, if an auxiliary field was given.
    pub fn auxiliary(&self, b: BoxIndex) -> Option<&AuxiliaryStatistics> {
        self.auxiliary.as_ref().map(|a| &a[self.grid.flat(b)])
    }

    /// Iterates `(box, statistics)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxIndex, &BoxStatistics)> + '_ {
        self.grid.boxes().zip(self.statistics.iter())
    }

    /// Number of boxes passing the minimum-count policy.
    pub fn n_defined(&self) -> usize {
        self.statistics.iter().filter(|s| s.is_defined()).count()
    }
}

/// Results for every scale, indexed by [`ScaleIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseResult {
    scales: Vec<ScaleResult>,
}

impl CoarseResult {
    /// Result at `scale`.
    pub fn scale(&self, scale: ScaleIndex) -> &ScaleResult {
        &self.scales[scale.0]
    }

    /// Iterates scale results in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (ScaleIndex, &ScaleResult)> + '_ {
        self.scales.iter().enumerate().map(|(i, s)| (ScaleIndex(i), s))
    }
}

/// Coarse-grains the objects of all `members` over a `domain` of
/// `(rows, cols)` cells.
///
/// When `auxiliary` is given it must hold one field per member; its box means
/// are reported regardless of the object policy. When `histogram` is given,
/// the pooled values of every defined box are added to it.
///
/// # Errors
///
/// Returns an error for auxiliary fields of the wrong count or shape and for
/// a histogram built with a different number of scales.
pub fn accumulate(
    config: &CoarseConfig,
    members: &[CloudObjects],
    domain: (usize, usize),
    auxiliary: Option<&[ArrayView2<'_, f64>]>,
    mut histogram: Option<&mut CondHistogram>,
) -> Result<CoarseResult, CoarseError> {
    if let Some(fields) = auxiliary {
        if fields.len() != members.len() {
            return Err(CoarseError::AuxiliaryCount {
                expected: members.len(),
                got: fields.len(),
            });
        }
        for (member, f) in fields.iter().enumerate() {
            if f.dim() != domain {
                return Err(CoarseError::AuxiliaryShape {
                    member,
                    expected: domain,
                    got: f.dim(),
                });
            }
        }
    }
    if let Some(h) = &histogram
        && h.n_scales() != config.scales.len()
    {
        return Err(CoarseError::HistogramScales {
            expected: config.scales.len(),
            got: h.n_scales(),
        });
    }

    let mut scales = Vec::with_capacity(config.scales.len());
    for (scale_index, n) in config.scales.iter() {
        let grid = BoxGrid::new(domain, n);
        let samples = sample_boxes(&grid, members);
        let statistics: Vec<BoxStatistics> = samples
            .iter()
            .map(|s| BoxStatistics::compute(s, config.min_object_count, config.correlation))
            .collect();

        if let Some(h) = histogram.as_deref_mut() {
            for (sample, stats) in samples.iter().zip(&statistics) {
                if let Some(mean_m) = stats.mean_m {
                    h.add_box(scale_index, mean_m, sample.pooled());
                }
            }
        }

        let auxiliary = auxiliary.map(|fields| auxiliary::box_statistics(&grid, fields));
        let result = ScaleResult {
            grid,
            statistics,
            auxiliary,
        };
        trace!(
            scale = n,
            boxes = grid.n_boxes(),
            defined = result.n_defined(),
            "coarse-grained scale"
        );
        scales.push(result);
    }
    Ok(CoarseResult { scales })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_stats::BinEdges;
    use ndarray::Array2;

    fn one_object(sum: f64, center: [f64; 2]) -> CloudObjects {
        CloudObjects::from_parts(vec![1.0], vec![sum], vec![center])
    }

    #[test]
    fn auxiliary_count_checked() {
        let members = vec![CloudObjects::empty(), CloudObjects::empty()];
        let f = Array2::zeros((4, 4));
        let err = accumulate(
            &CoarseConfig::new(ScaleSet::new(vec![2]).unwrap()),
            &members,
            (4, 4),
            Some(&[f.view()][..]),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoarseError::AuxiliaryCount {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn auxiliary_shape_checked() {
        let members = vec![CloudObjects::empty()];
        let f = Array2::zeros((4, 3));
        let err = accumulate(
            &CoarseConfig::new(ScaleSet::new(vec![2]).unwrap()),
            &members,
            (4, 4),
            Some(&[f.view()][..]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CoarseError::AuxiliaryShape { member: 0, .. }));
    }

    #[test]
    fn histogram_scale_count_checked() {
        let edges = BinEdges::new(vec![0.0, 1.0]).unwrap();
        let mut h = CondHistogram::new(3, edges.clone(), edges);
        let err = accumulate(&CoarseConfig::default(), &[], (8, 8), None, Some(&mut h)).unwrap_err();
        assert_eq!(
            err,
            CoarseError::HistogramScales {
                expected: 7,
                got: 3
            }
        );
    }

    #[test]
    fn histogram_only_fed_by_defined_boxes() {
        let edges = BinEdges::new(vec![0.0, 100.0]).unwrap();
        let mut h = CondHistogram::new(1, edges.clone(), edges);
        let members = vec![one_object(3.0, [0.0, 0.0]), CloudObjects::empty()];
        let config = CoarseConfig::new(ScaleSet::new(vec![2]).unwrap()).with_min_object_count(2);
        accumulate(&config, &members, (4, 4), None, Some(&mut h)).unwrap();
        assert_eq!(h.total(), 0.0);

        let config = config.with_min_object_count(1);
        accumulate(&config, &members, (4, 4), None, Some(&mut h)).unwrap();
        assert_eq!(h.total(), 1.0);
    }
}
