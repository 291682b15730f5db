//! Thresholded connected-component labeling.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use tracing::trace;

use crate::error::ObjectsError;
use crate::footprint::Footprint;
use crate::watershed;

/// Configuration for [`label`].
///
/// # Example
///
/// ```
/// use cirrus_objects::{Footprint, LabelConfig};
///
/// let config = LabelConfig::new(1.0)
///     .with_gate_threshold(0.0)
///     .with_water(true)
///     .with_footprint(Footprint::square(5).unwrap());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LabelConfig {
    /// A cell is a candidate only if `field > threshold`.
    threshold: f64,
    /// Gate cells must satisfy `gate > gate_threshold`.
    gate_threshold: f64,
    /// Separate touching objects by flooding from local maxima.
    water: bool,
    /// Neighborhood used for merging or maximum detection.
    footprint: Footprint,
}

impl LabelConfig {
    /// Creates a configuration with the given field threshold.
    ///
    /// Defaults: `gate_threshold = 0.0`, `water = false`, cross footprint.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            gate_threshold: 0.0,
            water: false,
            footprint: Footprint::cross(),
        }
    }

    /// Sets the gate threshold.
    pub fn with_gate_threshold(mut self, gate_threshold: f64) -> Self {
        self.gate_threshold = gate_threshold;
        self
    }

    /// Enables or disables watershed separation.
    pub fn with_water(mut self, water: bool) -> Self {
        self.water = water;
        self
    }

    /// Sets the neighborhood footprint.
    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    /// Returns the field threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the gate threshold.
    pub fn gate_threshold(&self) -> f64 {
        self.gate_threshold
    }

    /// Returns whether watershed separation is enabled.
    pub fn water(&self) -> bool {
        self.water
    }

    /// Returns the footprint.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Validates this configuration.
    ///
    /// Returns an error if either threshold is NaN.
    pub fn validate(&self) -> Result<(), ObjectsError> {
        if self.threshold.is_nan() {
            return Err(ObjectsError::NanThreshold { name: "threshold" });
        }
        if self.gate_threshold.is_nan() {
            return Err(ObjectsError::NanThreshold {
                name: "gate_threshold",
            });
        }
        Ok(())
    }
}

/// Integer label grid: 0 is background, `1..=n_objects` are objects.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    labels: Array2<u32>,
    n_objects: usize,
}

impl LabelMap {
    /// Wraps an existing label grid. Labels are expected to be consecutive
    /// from 1; the object count is the maximum label.
    pub fn from_array(labels: Array2<u32>) -> Self {
        let n_objects = labels.iter().copied().max().unwrap_or(0) as usize;
        Self { labels, n_objects }
    }

    /// An all-background map.
    pub fn empty(dim: (usize, usize)) -> Self {
        Self {
            labels: Array2::zeros(dim),
            n_objects: 0,
        }
    }

    /// Number of labeled objects.
    pub fn n_objects(&self) -> usize {
        self.n_objects
    }

    /// Returns `true` if no object was found.
    pub fn is_empty(&self) -> bool {
        self.n_objects == 0
    }

    /// Grid shape `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    /// Read-only view of the label grid.
    pub fn view(&self) -> ArrayView2<'_, u32> {
        self.labels.view()
    }

    /// Label at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.labels[[row, col]]
    }

    /// Number of cells belonging to any object.
    pub fn occupied_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l > 0).count()
    }

    /// Consumes the map, returning the label grid.
    pub fn into_inner(self) -> Array2<u32> {
        self.labels
    }
}

/// Labels the objects of `field`.
///
/// A cell is a candidate iff `field > threshold` and, when `gate` is given,
/// `gate > gate_threshold`. NaN never passes a threshold.
///
/// With `water = false` candidates are merged whenever their offset is part
/// of the footprint. With `water = true` touching objects are separated: each
/// footprint-local maximum seeds one object and seeds flood the candidate
/// region from high to low field values.
///
/// Labels are consecutive from 1 in raster order of each object's first cell.
/// A field without candidates yields an empty map, never an error.
///
/// # Errors
///
/// Returns [`ObjectsError::ShapeMismatch`] if `gate` does not match `field`,
/// or [`ObjectsError::NanThreshold`] for an invalid configuration.
pub fn label(
    field: ArrayView2<'_, f64>,
    gate: Option<ArrayView2<'_, f64>>,
    config: &LabelConfig,
) -> Result<LabelMap, ObjectsError> {
    config.validate()?;
    let dim = field.dim();
    if let Some(g) = &gate
        && g.dim() != dim
    {
        return Err(ObjectsError::ShapeMismatch {
            input: "gate",
            expected: dim,
            got: g.dim(),
        });
    }

    let candidates = candidate_mask(field, gate, config);
    if !candidates.iter().any(|&c| c) {
        return Ok(LabelMap::empty(dim));
    }

    let raw = if config.water {
        watershed::separate(field, &candidates, &config.footprint)
    } else {
        let neighbors = symmetric_offsets(config.footprint.offsets());
        connected_components(&candidates, &neighbors)
    };
    let map = relabel_raster(raw);
    trace!(
        n_objects = map.n_objects(),
        water = config.water,
        "labeled field"
    );
    Ok(map)
}

/// Cells passing the threshold and (optionally) the gate.
fn candidate_mask(
    field: ArrayView2<'_, f64>,
    gate: Option<ArrayView2<'_, f64>>,
    config: &LabelConfig,
) -> Array2<bool> {
    let mut mask = field.mapv(|v| v > config.threshold);
    if let Some(g) = gate {
        ndarray::Zip::from(&mut mask)
            .and(&g)
            .for_each(|m, &gv| *m = *m && gv > config.gate_threshold);
    }
    mask
}

/// Footprint offsets plus their mirror images, so connectivity is symmetric.
fn symmetric_offsets(offsets: &[(isize, isize)]) -> Vec<(isize, isize)> {
    let mut out: Vec<(isize, isize)> = offsets.to_vec();
    for &(dr, dc) in offsets {
        if !out.contains(&(-dr, -dc)) {
            out.push((-dr, -dc));
        }
    }
    out
}

/// Applies `(dr, dc)` to `(r, c)`, returning the neighbor if it is in bounds.
pub(crate) fn shifted(
    (r, c): (usize, usize),
    (dr, dc): (isize, isize),
    (rows, cols): (usize, usize),
) -> Option<(usize, usize)> {
    let nr = r as isize + dr;
    let nc = c as isize + dc;
    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
        return None;
    }
    Some((nr as usize, nc as usize))
}

/// Breadth-first component labeling over `neighbors`.
pub(crate) fn connected_components(
    mask: &Array2<bool>,
    neighbors: &[(isize, isize)],
) -> Array2<u32> {
    let dim = mask.dim();
    let mut labels = Array2::<u32>::zeros(dim);
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for r in 0..dim.0 {
        for c in 0..dim.1 {
            if !mask[[r, c]] || labels[[r, c]] != 0 {
                continue;
            }
            next += 1;
            labels[[r, c]] = next;
            queue.push_back((r, c));
            while let Some(cell) = queue.pop_front() {
                for &off in neighbors {
                    if let Some((nr, nc)) = shifted(cell, off, dim)
                        && mask[[nr, nc]]
                        && labels[[nr, nc]] == 0
                    {
                        labels[[nr, nc]] = next;
                        queue.push_back((nr, nc));
                    }
                }
            }
        }
    }
    labels
}

/// Renumbers labels consecutively in raster order of first appearance.
fn relabel_raster(raw: Array2<u32>) -> LabelMap {
    let max = raw.iter().copied().max().unwrap_or(0) as usize;
    let mut mapping = vec![0u32; max + 1];
    let mut next = 0u32;
    for &l in raw.iter() {
        if l > 0 && mapping[l as usize] == 0 {
            next += 1;
            mapping[l as usize] = next;
        }
    }
    let labels = raw.mapv(|l| mapping[l as usize]);
    LabelMap {
        labels,
        n_objects: next as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn below_threshold_gives_empty_map() {
        let field = array![[0.5, 0.9], [1.0, 0.0]];
        let map = label(field.view(), None, &LabelConfig::new(1.0)).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.occupied_count(), 0);
        assert_eq!(map.dim(), (2, 2));
    }

    #[test]
    fn threshold_is_strict() {
        let field = array![[1.0, 1.0001]];
        let map = label(field.view(), None, &LabelConfig::new(1.0)).unwrap();
        assert_eq!(map.view(), array![[0, 1]].view());
    }

    #[test]
    fn cross_does_not_merge_diagonals() {
        let field = array![[2.0, 0.0], [0.0, 2.0]];
        let map = label(field.view(), None, &LabelConfig::new(1.0)).unwrap();
        assert_eq!(map.n_objects(), 2);
        assert_eq!(map.view(), array![[1, 0], [0, 2]].view());
    }

    #[test]
    fn square_footprint_merges_diagonals() {
        let field = array![[2.0, 0.0], [0.0, 2.0]];
        let config = LabelConfig::new(1.0).with_footprint(Footprint::square(3).unwrap());
        let map = label(field.view(), None, &config).unwrap();
        assert_eq!(map.n_objects(), 1);
    }

    #[test]
    fn wide_footprint_bridges_gaps() {
        let field = array![[2.0, 0.0, 2.0]];
        let fp = Footprint::from_rows(&[vec![0, 0, 0, 0, 0], vec![1, 1, 1, 1, 1], vec![
            0, 0, 0, 0, 0,
        ]])
        .unwrap();
        let map = label(field.view(), None, &LabelConfig::new(1.0).with_footprint(fp)).unwrap();
        assert_eq!(map.n_objects(), 1);
    }

    #[test]
    fn gate_restricts_candidates() {
        let field = array![[2.0, 2.0, 2.0]];
        let gate = array![[1.0, 0.0, 1.0]];
        let map = label(field.view(), Some(gate.view()), &LabelConfig::new(1.0)).unwrap();
        assert_eq!(map.view(), array![[1, 0, 2]].view());
    }

    #[test]
    fn gate_threshold_is_strict() {
        let field = array![[2.0, 2.0]];
        let gate = array![[0.5, 0.6]];
        let config = LabelConfig::new(1.0).with_gate_threshold(0.5);
        let map = label(field.view(), Some(gate.view()), &config).unwrap();
        assert_eq!(map.view(), array![[0, 1]].view());
    }

    #[test]
    fn gate_shape_mismatch() {
        let field = array![[2.0, 2.0]];
        let gate = array![[1.0], [1.0]];
        let err = label(field.view(), Some(gate.view()), &LabelConfig::new(1.0)).unwrap_err();
        assert_eq!(
            err,
            ObjectsError::ShapeMismatch {
                input: "gate",
                expected: (1, 2),
                got: (2, 1),
            }
        );
    }

    #[test]
    fn nan_never_candidate() {
        let field = array![[f64::NAN, 3.0]];
        let map = label(field.view(), None, &LabelConfig::new(-10.0)).unwrap();
        assert_eq!(map.view(), array![[0, 1]].view());
    }

    #[test]
    fn nan_threshold_rejected() {
        let field = array![[1.0]];
        assert!(label(field.view(), None, &LabelConfig::new(f64::NAN)).is_err());
    }

    #[test]
    fn labels_are_raster_ordered() {
        let field = array![
            [0.0, 0.0, 0.0, 5.0],
            [5.0, 0.0, 0.0, 5.0],
            [5.0, 0.0, 5.0, 0.0],
        ];
        let map = label(field.view(), None, &LabelConfig::new(1.0)).unwrap();
        assert_eq!(
            map.view(),
            array![[0, 0, 0, 1], [2, 0, 0, 1], [2, 0, 3, 0]].view()
        );
    }

    #[test]
    fn from_array_counts_objects() {
        let map = LabelMap::from_array(array![[0, 2], [1, 0]]);
        assert_eq!(map.n_objects(), 2);
        assert_eq!(map.get(0, 1), 2);
    }

    #[test]
    fn symmetric_offsets_adds_mirrors() {
        let out = symmetric_offsets(&[(0, 1), (1, 1)]);
        assert_eq!(out, vec![(0, 1), (1, 1), (0, -1), (-1, -1)]);
    }
}
