//! Validated bin edges and histogram counting.

use crate::error::StatsError;

/// Strictly increasing, finite histogram bin edges.
///
/// Bins are half-open `[e[i], e[i+1])` except the last one, which also
/// includes its upper edge (numpy `histogram` convention).
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Creates bin edges from an explicit list.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::TooFewEdges`] for fewer than 2 edges,
    /// [`StatsError::NonFiniteEdge`] for NaN/infinite edges and
    /// [`StatsError::NonMonotonicEdges`] if edges are not strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self, StatsError> {
        if edges.len() < 2 {
            return Err(StatsError::TooFewEdges { got: edges.len() });
        }
        for (index, &value) in edges.iter().enumerate() {
            if !value.is_finite() {
                return Err(StatsError::NonFiniteEdge { index, value });
            }
        }
        for index in 1..edges.len() {
            if edges[index] <= edges[index - 1] {
                return Err(StatsError::NonMonotonicEdges {
                    index,
                    value: edges[index],
                    previous: edges[index - 1],
                });
            }
        }
        Ok(Self { edges })
    }

    /// Creates `num` evenly spaced edges from `start` to `stop` inclusive.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Result<Self, StatsError> {
        if num < 2 {
            return Err(StatsError::TooFewEdges { got: num });
        }
        let step = (stop - start) / (num - 1) as f64;
        let edges = (0..num)
            .map(|i| {
                if i == num - 1 {
                    stop
                } else {
                    start + step * i as f64
                }
            })
            .collect();
        Self::new(edges)
    }

    /// The raw edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (`edges - 1`).
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Upper edge of every bin, used as the coordinate of a bin dimension.
    pub fn upper_edges(&self) -> &[f64] {
        &self.edges[1..]
    }

    /// Bin containing `value`, or `None` if it falls outside the edges or is NaN.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if !(value >= first && value <= last) {
            return None;
        }
        if value == last {
            return Some(self.n_bins() - 1);
        }
        // Index of the first edge strictly greater than value, minus one.
        let upper = self.edges.partition_point(|&e| e <= value);
        Some(upper - 1)
    }
}

/// Counts `values` into the bins of `edges`. Out-of-range and NaN values are
/// ignored.
pub fn histogram(values: &[f64], edges: &BinEdges) -> Vec<f64> {
    let mut counts = vec![0.0; edges.n_bins()];
    for &v in values {
        if let Some(b) = edges.bin_index(v) {
            counts[b] += 1.0;
        }
    }
    counts
}
