//! Error types for the cirrus-rdf crate.

use cirrus_objects::ObjectsError;
use cirrus_stats::StatsError;

/// Error type for all fallible operations in the cirrus-rdf crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RdfError {
    /// Returned when `max_radius` is not a positive finite number.
    #[error("max_radius must be positive and finite, got {value}")]
    InvalidMaxRadius {
        /// The offending value.
        value: f64,
    },

    /// Returned when `bin_width` is not a positive finite number.
    #[error("bin_width must be positive and finite, got {value}")]
    InvalidBinWidth {
        /// The offending value.
        value: f64,
    },

    /// Returned when the bin width is larger than the maximum radius.
    #[error("bin_width {bin_width} leaves no bin below max_radius {max_radius}")]
    NoBins {
        /// Maximum radius in grid cells.
        max_radius: f64,
        /// Bin width in grid cells.
        bin_width: f64,
    },

    /// Returned when `grid_spacing` is not a positive finite number.
    #[error("grid_spacing must be positive and finite, got {value}")]
    InvalidGridSpacing {
        /// The offending value.
        value: f64,
    },

    /// Returned when `min_coverage` lies outside `[0, 1]`.
    #[error("min_coverage must be in [0, 1], got {value}")]
    InvalidCoverage {
        /// The offending value.
        value: f64,
    },

    /// Returned when an input grid does not match the label map.
    #[error("{input} shape {got:?} does not match label shape {expected:?}")]
    ShapeMismatch {
        /// Name of the misaligned input.
        input: &'static str,
        /// Shape of the label map.
        expected: (usize, usize),
        /// Shape of the offending input.
        got: (usize, usize),
    },

    /// Returned when curves to be averaged have different bin counts.
    #[error("curve {index} has {len} bins, expected {expected}")]
    CurveLengthMismatch {
        /// Position of the offending curve.
        index: usize,
        /// Its bin count.
        len: usize,
        /// Bin count of the first curve.
        expected: usize,
    },

    /// Returned when averaging an empty set of curves.
    #[error("cannot average zero curves")]
    NoCurves,

    /// Propagated from object identification.
    #[error(transparent)]
    Objects(#[from] ObjectsError),

    /// Propagated from bin edge construction.
    #[error(transparent)]
    Stats(#[from] StatsError),
}
