//! Structuring footprints that define which cells count as neighbors.

use ndarray::Array2;

use crate::error::ObjectsError;

/// A centered boolean structuring matrix with odd side lengths.
///
/// Set entries (other than the center) are neighbor offsets. The footprint
/// decides merge topology for connected labeling and the window size for
/// local-maximum detection during watershed separation.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    matrix: Array2<bool>,
    offsets: Vec<(isize, isize)>,
}

impl Footprint {
    /// Builds a footprint from an explicit matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectsError::EvenFootprint`] if either side is even (or zero)
    /// and [`ObjectsError::EmptyFootprint`] if no off-center entry is set.
    pub fn from_matrix(matrix: Array2<bool>) -> Result<Self, ObjectsError> {
        let (rows, cols) = matrix.dim();
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(ObjectsError::EvenFootprint { rows, cols });
        }
        let (cr, cc) = ((rows / 2) as isize, (cols / 2) as isize);
        let offsets: Vec<(isize, isize)> = matrix
            .indexed_iter()
            .filter(|&(_, &set)| set)
            .map(|((r, c), _)| (r as isize - cr, c as isize - cc))
            .filter(|&off| off != (0, 0))
            .collect();
        if offsets.is_empty() {
            return Err(ObjectsError::EmptyFootprint);
        }
        Ok(Self { matrix, offsets })
    }

    /// Builds a footprint from nested rows of 0/1 flags.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, ObjectsError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut matrix = Array2::from_elem((n_rows, n_cols), false);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(ObjectsError::RaggedFootprint {
                    row: r,
                    len: row.len(),
                    expected: n_cols,
                });
            }
            for (c, &flag) in row.iter().enumerate() {
                matrix[[r, c]] = flag != 0;
            }
        }
        Self::from_matrix(matrix)
    }

    /// The 3x3 cross (4-connectivity).
    pub fn cross() -> Self {
        let mut matrix = Array2::from_elem((3, 3), false);
        for (r, c) in [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)] {
            matrix[[r, c]] = true;
        }
        Self {
            matrix,
            offsets: vec![(-1, 0), (0, -1), (0, 1), (1, 0)],
        }
    }

    /// A full `size x size` square. `square(3)` gives 8-connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error for even sizes and for `size == 1`, which has no
    /// neighbors.
    pub fn square(size: usize) -> Result<Self, ObjectsError> {
        Self::from_matrix(Array2::from_elem((size, size), true))
    }

    /// Off-center `(d_row, d_col)` offsets, in row-major order.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<bool> {
        &self.matrix
    }

    /// Half extent `(rows / 2, cols / 2)`.
    pub fn radius(&self) -> (usize, usize) {
        let (rows, cols) = self.matrix.dim();
        (rows / 2, cols / 2)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::cross()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn cross_offsets() {
        let fp = Footprint::cross();
        assert_eq!(fp.offsets(), &[(-1, 0), (0, -1), (0, 1), (1, 0)]);
        assert_eq!(fp.radius(), (1, 1));
    }

    #[test]
    fn cross_matches_matrix_constructor() {
        let m = array![
            [false, true, false],
            [true, true, true],
            [false, true, false]
        ];
        assert_eq!(Footprint::from_matrix(m).unwrap(), Footprint::cross());
    }

    #[test]
    fn square_three_is_eight_connected() {
        let fp = Footprint::square(3).unwrap();
        assert_eq!(fp.offsets().len(), 8);
    }

    #[test]
    fn square_one_rejected() {
        assert_eq!(Footprint::square(1), Err(ObjectsError::EmptyFootprint));
    }

    #[test]
    fn even_rejected() {
        assert!(matches!(
            Footprint::square(4),
            Err(ObjectsError::EvenFootprint { rows: 4, cols: 4 })
        ));
    }

    #[test]
    fn from_rows_builds_matrix() {
        let fp = Footprint::from_rows(&[vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]]).unwrap();
        assert_eq!(fp, Footprint::cross());
    }

    #[test]
    fn from_rows_ragged_rejected() {
        assert_eq!(
            Footprint::from_rows(&[vec![0, 1, 0], vec![1, 1]]),
            Err(ObjectsError::RaggedFootprint {
                row: 1,
                len: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn wide_footprint_radius() {
        let fp = Footprint::from_matrix(Array2::from_elem((3, 5), true)).unwrap();
        assert_eq!(fp.radius(), (1, 2));
        assert_eq!(fp.offsets().len(), 14);
    }
}
