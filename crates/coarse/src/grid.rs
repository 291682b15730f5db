//! Scale sets and the box partition at one scale.

use crate::error::CoarseError;
use crate::index::{BoxIndex, ScaleIndex};

/// Validated, ordered set of box side lengths (grid cells).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleSet {
    scales: Vec<usize>,
}

impl ScaleSet {
    /// Validates and wraps `scales`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if `scales` is empty, contains 0 or repeats a value.
    pub fn new(scales: Vec<usize>) -> Result<Self, CoarseError> {
        if scales.is_empty() {
            return Err(CoarseError::EmptyScales);
        }
        for (index, &scale) in scales.iter().enumerate() {
            if scale == 0 {
                return Err(CoarseError::ZeroScale { index });
            }
            if scales[..index].contains(&scale) {
                return Err(CoarseError::DuplicateScale { scale });
            }
        }
        Ok(Self { scales })
    }

    /// The scales in configured order.
    pub fn as_slice(&self) -> &[usize] {
        &self.scales
    }

    /// Number of scales.
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    /// Always `false`; a validated set has at least one scale.
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Iterates `(ScaleIndex, scale)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ScaleIndex, usize)> + '_ {
        self.scales
            .iter()
            .enumerate()
            .map(|(i, &n)| (ScaleIndex(i), n))
    }

    /// The smallest scale, which yields the most boxes.
    pub fn finest(&self) -> usize {
        self.scales.iter().copied().min().unwrap_or(1)
    }
}

impl Default for ScaleSet {
    fn default() -> Self {
        Self {
            scales: vec![256, 128, 64, 32, 16, 8, 4],
        }
    }
}

/// Partition of a `rows x cols` domain into `scale x scale` boxes.
///
/// Cells beyond the last full box are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGrid {
    scale: usize,
    n_rows: usize,
    n_cols: usize,
}

impl BoxGrid {
    /// Box grid for `domain` at `scale` (which must be >= 1).
    pub fn new(domain: (usize, usize), scale: usize) -> Self {
        let scale = scale.max(1);
        Self {
            scale,
            n_rows: domain.0 / scale,
            n_cols: domain.1 / scale,
        }
    }

    /// Box side length.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Number of box rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of box columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Total number of boxes.
    pub fn n_boxes(&self) -> usize {
        self.n_rows * self.n_cols
    }

    /// Row-major flat position of `b`.
    pub fn flat(&self, b: BoxIndex) -> usize {
        b.row * self.n_cols + b.col
    }

    /// Iterates boxes in row-major order.
    pub fn boxes(&self) -> impl Iterator<Item = BoxIndex> + '_ {
        (0..self.n_rows).flat_map(move |row| (0..self.n_cols).map(move |col| BoxIndex { row, col }))
    }

    /// Box containing `center` (row, col), using half-open bounds
    /// `[k * scale, (k + 1) * scale)`. `None` outside every full box.
    pub fn box_of(&self, center: [f64; 2]) -> Option<BoxIndex> {
        let [r, c] = center;
        if !(r >= 0.0 && c >= 0.0) {
            return None;
        }
        let row = (r / self.scale as f64).floor() as usize;
        let col = (c / self.scale as f64).floor() as usize;
        (row < self.n_rows && col < self.n_cols).then_some(BoxIndex { row, col })
    }

    /// Cell ranges `(rows, cols)` covered by `b`.
    pub fn cell_ranges(&self, b: BoxIndex) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let n = self.scale;
        (b.row * n..(b.row + 1) * n, b.col * n..(b.col + 1) * n)
    }
}

/// Grids for every scale of `scales`, indexed by [`ScaleIndex`].
pub fn grids(scales: &ScaleSet, domain: (usize, usize)) -> Vec<BoxGrid> {
    scales.iter().map(|(_, n)| BoxGrid::new(domain, n)).collect()
}
