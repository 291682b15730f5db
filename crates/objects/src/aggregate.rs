//! Per-object aggregates: size, (density-weighted) sum and center of mass.

use ndarray::ArrayView2;

use crate::error::ObjectsError;
use crate::label::{LabelConfig, LabelMap, label};

/// Per-object aggregates, indexed by `label - 1`.
///
/// All three vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CloudObjects {
    sizes: Vec<f64>,
    sums: Vec<f64>,
    centers: Vec<[f64; 2]>,
}

impl CloudObjects {
    /// An empty object set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an object set from parallel vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors differ in length.
    pub fn from_parts(sizes: Vec<f64>, sums: Vec<f64>, centers: Vec<[f64; 2]>) -> Self {
        assert!(
            sizes.len() == sums.len() && sums.len() == centers.len(),
            "object vectors must have equal length"
        );
        Self {
            sizes,
            sums,
            centers,
        }
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` if there are no objects.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Cell count of each object.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Summed value of each object.
    pub fn sums(&self) -> &[f64] {
        &self.sums
    }

    /// Center of mass `(row, col)` of each object.
    pub fn centers(&self) -> &[[f64; 2]] {
        &self.centers
    }

    /// Multiplies every sum by `factor` (e.g. cell area `dx * dx`).
    pub fn scale_sums(&mut self, factor: f64) {
        for s in &mut self.sums {
            *s *= factor;
        }
    }

    /// Mean object sum, or `None` without objects.
    pub fn mean_sum(&self) -> Option<f64> {
        cirrus_stats::mean(&self.sums)
    }
}

/// Reduces a label map to per-object aggregates.
///
/// `sums[i]` is the sum of `field` (times `density`, when given) over the
/// cells labeled `i + 1`. Centers are weighted by `field`; objects with a
/// negative weight, or whose weights do not sum to a positive finite value,
/// fall back to the geometric centroid, so every center lies inside the
/// object's bounding box.
///
/// # Errors
///
/// Returns [`ObjectsError::ShapeMismatch`] if `field` or `density` do not
/// match the label map.
pub fn aggregate(
    labels: &LabelMap,
    field: ArrayView2<'_, f64>,
    density: Option<ArrayView2<'_, f64>>,
) -> Result<CloudObjects, ObjectsError> {
    let dim = labels.dim();
    if field.dim() != dim {
        return Err(ObjectsError::ShapeMismatch {
            input: "labels",
            expected: field.dim(),
            got: dim,
        });
    }
    if let Some(d) = &density
        && d.dim() != dim
    {
        return Err(ObjectsError::ShapeMismatch {
            input: "density",
            expected: dim,
            got: d.dim(),
        });
    }

    let n = labels.n_objects();
    let mut sizes = vec![0.0; n];
    let mut sums = vec![0.0; n];
    let mut weight = vec![0.0; n];
    let mut mixed_sign = vec![false; n];
    let mut weighted = vec![[0.0; 2]; n];
    let mut geometric = vec![[0.0; 2]; n];

    for ((r, c), &l) in labels.view().indexed_iter() {
        if l == 0 {
            continue;
        }
        let i = (l - 1) as usize;
        let v = field[[r, c]];
        sizes[i] += 1.0;
        sums[i] += match &density {
            Some(d) => v * d[[r, c]],
            None => v,
        };
        weight[i] += v;
        mixed_sign[i] |= v < 0.0;
        weighted[i][0] += v * r as f64;
        weighted[i][1] += v * c as f64;
        geometric[i][0] += r as f64;
        geometric[i][1] += c as f64;
    }

    let centers = (0..n)
        .map(|i| {
            if !mixed_sign[i] && weight[i] > 0.0 && weight[i].is_finite() {
                [weighted[i][0] / weight[i], weighted[i][1] / weight[i]]
            } else {
                [geometric[i][0] / sizes[i], geometric[i][1] / sizes[i]]
            }
        })
        .collect();

    Ok(CloudObjects {
        sizes,
        sums,
        centers,
    })
}

/// Labels `field` and aggregates the resulting objects.
///
/// # Errors
///
/// Propagates errors from [`label`] and [`aggregate`].
pub fn identify(
    field: ArrayView2<'_, f64>,
    gate: Option<ArrayView2<'_, f64>>,
    density: Option<ArrayView2<'_, f64>>,
    config: &LabelConfig,
) -> Result<(LabelMap, CloudObjects), ObjectsError> {
    let labels = label(field, gate, config)?;
    let objects = aggregate(&labels, field, density)?;
    Ok((labels, objects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    #[test]
    fn block_of_constant_value() {
        let mut field = Array2::zeros((5, 5));
        for r in 1..4 {
            for c in 1..4 {
                field[[r, c]] = 2.5;
            }
        }
        let (labels, objects) = identify(field.view(), None, None, &LabelConfig::new(1.0)).unwrap();
        assert_eq!(labels.n_objects(), 1);
        assert_eq!(objects.sizes(), &[9.0]);
        assert_relative_eq!(objects.sums()[0], 22.5);
        assert_relative_eq!(objects.centers()[0][0], 2.0);
        assert_relative_eq!(objects.centers()[0][1], 2.0);
    }

    #[test]
    fn density_weights_sums() {
        let field = array![[2.0, 4.0]];
        let density = array![[0.5, 2.0]];
        let (_, objects) =
            identify(field.view(), None, Some(density.view()), &LabelConfig::new(1.0)).unwrap();
        assert_relative_eq!(objects.sums()[0], 9.0);
    }

    #[test]
    fn center_is_field_weighted() {
        let field = array![[1.0, 3.0]];
        let labels = LabelMap::from_array(array![[1, 1]]);
        let objects = aggregate(&labels, field.view(), None).unwrap();
        assert_relative_eq!(objects.centers()[0][1], 0.75);
    }

    #[test]
    fn non_positive_weight_uses_geometric_centroid() {
        let field = array![[-1.0, 1.0, -2.0]];
        let labels = LabelMap::from_array(array![[1, 1, 1]]);
        let objects = aggregate(&labels, field.view(), None).unwrap();
        assert_relative_eq!(objects.centers()[0][0], 0.0);
        assert_relative_eq!(objects.centers()[0][1], 1.0);
    }

    #[test]
    fn mixed_sign_weights_keep_center_inside_object() {
        let field = array![[3.0, -2.9]];
        let (_, objects) = identify(field.view(), None, None, &LabelConfig::new(-5.0)).unwrap();
        assert_eq!(objects.len(), 1);
        let [r, c] = objects.centers()[0];
        assert_relative_eq!(r, 0.0);
        assert_relative_eq!(c, 0.5);
    }

    #[test]
    fn empty_map_gives_empty_vectors() {
        let field = Array2::zeros((3, 3));
        let objects = aggregate(&LabelMap::empty((3, 3)), field.view(), None).unwrap();
        assert!(objects.is_empty());
        assert!(objects.sums().is_empty());
        assert!(objects.centers().is_empty());
        assert_eq!(objects.mean_sum(), None);
    }

    #[test]
    fn density_shape_mismatch() {
        let field = Array2::zeros((2, 2));
        let density = Array2::zeros((2, 3));
        let err = aggregate(&LabelMap::empty((2, 2)), field.view(), Some(density.view()))
            .unwrap_err();
        assert!(matches!(
            err,
            ObjectsError::ShapeMismatch {
                input: "density",
                ..
            }
        ));
    }

    #[test]
    fn scale_sums_multiplies() {
        let mut objects = CloudObjects::from_parts(vec![1.0, 2.0], vec![3.0, 4.0], vec![
            [0.0, 0.0],
            [1.0, 1.0],
        ]);
        objects.scale_sums(100.0);
        assert_eq!(objects.sums(), &[300.0, 400.0]);
        assert_eq!(objects.mean_sum(), Some(350.0));
    }
}
