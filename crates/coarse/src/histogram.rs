//! Running conditional histogram of object values.

use cirrus_stats::BinEdges;
use ndarray::{Array3, ArrayView2, Axis};

use crate::error::CoarseError;
use crate::index::ScaleIndex;

/// Per-scale 2D counts of object values `m`, binned jointly by the box mean
/// `<m>` and by `m` itself.
///
/// Created once per sweep and fed every box with defined statistics.
/// Accumulators built on separate workers are combined with [`merge`].
///
/// [`merge`]: CondHistogram::merge
#[derive(Debug, Clone, PartialEq)]
pub struct CondHistogram {
    mean_m_edges: BinEdges,
    m_edges: BinEdges,
    counts: Array3<f64>,
}

impl CondHistogram {
    /// Zeroed histogram for `n_scales` scales.
    pub fn new(n_scales: usize, mean_m_edges: BinEdges, m_edges: BinEdges) -> Self {
        let counts = Array3::zeros((n_scales, mean_m_edges.n_bins(), m_edges.n_bins()));
        Self {
            mean_m_edges,
            m_edges,
            counts,
        }
    }

    /// Number of scales.
    pub fn n_scales(&self) -> usize {
        self.counts.len_of(Axis(0))
    }

    /// Edges of the box-mean axis.
    pub fn mean_m_edges(&self) -> &BinEdges {
        &self.mean_m_edges
    }

    /// Edges of the object-value axis.
    pub fn m_edges(&self) -> &BinEdges {
        &self.m_edges
    }

    /// Adds the pooled values of one box whose mean is `mean_m`.
    ///
    /// A mean outside the edges contributes nothing; values outside the
    /// `m` edges are skipped individually.
    pub fn add_box(&mut self, scale: ScaleIndex, mean_m: f64, pooled: &[f64]) {
        let Some(i) = self.mean_m_edges.bin_index(mean_m) else {
            return;
        };
        for &m in pooled {
            if let Some(j) = self.m_edges.bin_index(m) {
                self.counts[[scale.0, i, j]] += 1.0;
            }
        }
    }

    /// Adds the counts of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoarseError::HistogramBins`] if the histograms differ in
    /// edges or scale count.
    pub fn merge(&mut self, other: &CondHistogram) -> Result<(), CoarseError> {
        if self.mean_m_edges != other.mean_m_edges
            || self.m_edges != other.m_edges
            || self.counts.dim() != other.counts.dim()
        {
            return Err(CoarseError::HistogramBins);
        }
        self.counts += &other.counts;
        Ok(())
    }

    /// Counts for one scale, `[mean_m_bin, m_bin]`.
    pub fn scale_counts(&self, scale: ScaleIndex) -> ArrayView2<'_, f64> {
        self.counts.index_axis(Axis(0), scale.0)
    }

    /// All counts, `[scale, mean_m_bin, m_bin]`.
    pub fn counts(&self) -> &Array3<f64> {
        &self.counts
    }

    /// Total number of counted values.
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist() -> CondHistogram {
        CondHistogram::new(
            2,
            BinEdges::new(vec![0.0, 10.0, 100.0]).unwrap(),
            BinEdges::new(vec![0.0, 5.0, 15.0, 50.0]).unwrap(),
        )
    }

    #[test]
    fn starts_at_zero() {
        let h = hist();
        assert_eq!(h.counts().dim(), (2, 2, 3));
        assert_eq!(h.total(), 0.0);
    }

    #[test]
    fn add_box_bins_jointly() {
        let mut h = hist();
        h.add_box(ScaleIndex(1), 35.0 / 3.0, &[10.0, 20.0, 5.0, 99.0]);
        let c = h.scale_counts(ScaleIndex(1));
        assert_eq!(c[[1, 1]], 2.0);
        assert_eq!(c[[1, 2]], 1.0);
        assert_eq!(h.total(), 3.0);
        assert_eq!(h.scale_counts(ScaleIndex(0)).sum(), 0.0);
    }

    #[test]
    fn mean_outside_edges_ignored() {
        let mut h = hist();
        h.add_box(ScaleIndex(0), 500.0, &[1.0, 2.0]);
        h.add_box(ScaleIndex(0), f64::NAN, &[1.0]);
        assert_eq!(h.total(), 0.0);
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = hist();
        let mut b = hist();
        a.add_box(ScaleIndex(0), 1.0, &[1.0]);
        b.add_box(ScaleIndex(0), 1.0, &[1.0, 6.0]);
        a.merge(&b).unwrap();
        assert_eq!(a.scale_counts(ScaleIndex(0))[[0, 0]], 2.0);
        assert_eq!(a.scale_counts(ScaleIndex(0))[[0, 1]], 1.0);
    }

    #[test]
    fn merge_rejects_other_bins() {
        let mut a = hist();
        let b = CondHistogram::new(
            2,
            BinEdges::new(vec![0.0, 1.0]).unwrap(),
            BinEdges::new(vec![0.0, 1.0]).unwrap(),
        );
        assert_eq!(a.merge(&b), Err(CoarseError::HistogramBins));
    }
}
