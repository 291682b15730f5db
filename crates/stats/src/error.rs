//! Error types for cirrus-stats.

/// Error type for all fallible operations in the cirrus-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when fewer than two bin edges are supplied.
    #[error("at least 2 bin edges are required, got {got}")]
    TooFewEdges {
        /// Number of edges supplied.
        got: usize,
    },

    /// Returned when a bin edge is NaN or infinite.
    #[error("bin edge {index} is not finite: {value}")]
    NonFiniteEdge {
        /// Position of the offending edge.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when bin edges are not strictly increasing.
    #[error("bin edges must be strictly increasing: edge {index} ({value}) <= {previous}")]
    NonMonotonicEdges {
        /// Position of the first edge that breaks monotonicity.
        index: usize,
        /// Value at `index`.
        value: f64,
        /// Value at `index - 1`.
        previous: f64,
    },
}
