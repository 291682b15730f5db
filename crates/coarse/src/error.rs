//! Error types for the cirrus-coarse crate.

use cirrus_stats::StatsError;

/// Error type for all fallible operations in the cirrus-coarse crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoarseError {
    /// Returned when no coarse-graining scale is configured.
    #[error("at least one coarse-graining scale is required")]
    EmptyScales,

    /// Returned when a scale is zero.
    #[error("scale at position {index} must be >= 1")]
    ZeroScale {
        /// Position of the offending scale.
        index: usize,
    },

    /// Returned when a scale appears more than once.
    #[error("scale {scale} appears more than once")]
    DuplicateScale {
        /// The repeated scale.
        scale: usize,
    },

    /// Returned when the auxiliary fields do not cover every member.
    #[error("expected {expected} auxiliary fields (one per member), got {got}")]
    AuxiliaryCount {
        /// Number of members.
        expected: usize,
        /// Number of auxiliary fields supplied.
        got: usize,
    },

    /// Returned when an auxiliary field does not match the domain.
    #[error("auxiliary field of member {member} has shape {got:?}, expected {expected:?}")]
    AuxiliaryShape {
        /// Member position.
        member: usize,
        /// Domain shape.
        expected: (usize, usize),
        /// Shape of the offending field.
        got: (usize, usize),
    },

    /// Returned when a conditional histogram was built for other scales.
    #[error("conditional histogram has {got} scales, configuration has {expected}")]
    HistogramScales {
        /// Number of configured scales.
        expected: usize,
        /// Number of scales in the histogram.
        got: usize,
    },

    /// Returned when two conditional histograms with different bins are merged.
    #[error("cannot merge conditional histograms with different bins")]
    HistogramBins,

    /// Propagated from bin edge validation.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_scales() {
        assert_eq!(
            CoarseError::EmptyScales.to_string(),
            "at least one coarse-graining scale is required"
        );
    }

    #[test]
    fn display_zero_scale() {
        let e = CoarseError::ZeroScale { index: 3 };
        assert_eq!(e.to_string(), "scale at position 3 must be >= 1");
    }

    #[test]
    fn display_duplicate_scale() {
        let e = CoarseError::DuplicateScale { scale: 64 };
        assert_eq!(e.to_string(), "scale 64 appears more than once");
    }

    #[test]
    fn display_auxiliary_count() {
        let e = CoarseError::AuxiliaryCount {
            expected: 20,
            got: 19,
        };
        assert_eq!(
            e.to_string(),
            "expected 20 auxiliary fields (one per member), got 19"
        );
    }

    #[test]
    fn display_auxiliary_shape() {
        let e = CoarseError::AuxiliaryShape {
            member: 1,
            expected: (4, 4),
            got: (4, 3),
        };
        assert_eq!(
            e.to_string(),
            "auxiliary field of member 1 has shape (4, 3), expected (4, 4)"
        );
    }

    #[test]
    fn display_histogram_scales() {
        let e = CoarseError::HistogramScales {
            expected: 7,
            got: 3,
        };
        assert_eq!(
            e.to_string(),
            "conditional histogram has 3 scales, configuration has 7"
        );
    }

    #[test]
    fn display_stats_is_transparent() {
        let inner = StatsError::TooFewEdges { got: 0 };
        assert_eq!(CoarseError::from(inner.clone()).to_string(), inner.to_string());
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<CoarseError>();
    }
}
