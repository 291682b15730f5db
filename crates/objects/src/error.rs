//! Error types for the cirrus-objects crate.

/// Error type for all fallible operations in the cirrus-objects crate.
///
/// Every variant is a configuration problem: an empty object set is a valid
/// outcome and never produces an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectsError {
    /// Returned when two grids that must align have different shapes.
    #[error("{input} shape {got:?} does not match field shape {expected:?}")]
    ShapeMismatch {
        /// Name of the misaligned input.
        input: &'static str,
        /// Shape of the primary field.
        expected: (usize, usize),
        /// Shape of the offending input.
        got: (usize, usize),
    },

    /// Returned when a footprint matrix has an even side length.
    #[error("footprint dimensions must be odd, got {rows}x{cols}")]
    EvenFootprint {
        /// Footprint rows.
        rows: usize,
        /// Footprint columns.
        cols: usize,
    },

    /// Returned when footprint rows have different lengths.
    #[error("footprint row {row} has {len} entries, expected {expected}")]
    RaggedFootprint {
        /// Index of the offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Length of the first row.
        expected: usize,
    },

    /// Returned when a footprint selects no neighbor besides its center.
    #[error("footprint must contain at least one neighbor offset")]
    EmptyFootprint,

    /// Returned when a threshold is NaN.
    #[error("{name} must not be NaN")]
    NanThreshold {
        /// Name of the threshold parameter.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shape_mismatch() {
        let e = ObjectsError::ShapeMismatch {
            input: "gate",
            expected: (4, 4),
            got: (3, 4),
        };
        assert_eq!(
            e.to_string(),
            "gate shape (3, 4) does not match field shape (4, 4)"
        );
    }

    #[test]
    fn display_even_footprint() {
        let e = ObjectsError::EvenFootprint { rows: 2, cols: 3 };
        assert_eq!(e.to_string(), "footprint dimensions must be odd, got 2x3");
    }

    #[test]
    fn display_ragged_footprint() {
        let e = ObjectsError::RaggedFootprint {
            row: 1,
            len: 2,
            expected: 3,
        };
        assert_eq!(e.to_string(), "footprint row 1 has 2 entries, expected 3");
    }

    #[test]
    fn display_empty_footprint() {
        assert_eq!(
            ObjectsError::EmptyFootprint.to_string(),
            "footprint must contain at least one neighbor offset"
        );
    }

    #[test]
    fn display_nan_threshold() {
        let e = ObjectsError::NanThreshold { name: "threshold" };
        assert_eq!(e.to_string(), "threshold must not be NaN");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ObjectsError>();
    }
}
