//! Pair correlation of object centers of mass.

use cirrus_stats::{BinEdges, StatsError, histogram};
use ndarray::Array2;
use std::f64::consts::PI;

use crate::config::RdfConfig;
use crate::mask::interior_mask;

/// Centroid RDF.
///
/// Centers lying on excluded cells are dropped. Reference points are centers
/// whose full `max_radius` disk lies in the valid area; for each one the
/// distances to every other center are histogrammed, optionally divided by
/// the number density (centers per valid cell), averaged over reference
/// points and divided by the annulus area.
pub(crate) fn centroid_rdf(
    centers: &[[f64; 2]],
    valid: &Array2<bool>,
    config: &RdfConfig,
) -> Result<Vec<f64>, StatsError> {
    let n_bins = config.n_bins();
    let upper = n_bins as f64 * config.bin_width();
    let edges = BinEdges::linspace(0.0, upper, n_bins + 1)?;

    let (rows, cols) = valid.dim();
    let cell_of = |&[r, c]: &[f64; 2]| {
        let (r, c) = (r.round(), c.round());
        if r < 0.0 || c < 0.0 || r >= rows as f64 || c >= cols as f64 {
            None
        } else {
            Some((r as usize, c as usize))
        }
    };

    let points: Vec<[f64; 2]> = centers
        .iter()
        .filter(|p| cell_of(*p).is_some_and(|cell| valid[cell]))
        .copied()
        .collect();

    let interior = interior_mask(valid, config.max_radius());
    let references: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| cell_of(*p).is_some_and(|cell| interior[cell]))
        .map(|(i, _)| i)
        .collect();

    if references.is_empty() {
        return Ok(vec![f64::NAN; n_bins]);
    }

    let n_valid = valid.iter().filter(|&&v| v).count() as f64;
    let number_density = points.len() as f64 / n_valid;

    let mut total = vec![0.0; n_bins];
    let mut distances = Vec::with_capacity(points.len());
    for &i in &references {
        let [ri, ci] = points[i];
        distances.clear();
        distances.extend(
            points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &[rj, cj])| ((ri - rj).powi(2) + (ci - cj).powi(2)).sqrt()),
        );
        for (t, count) in total.iter_mut().zip(histogram(&distances, &edges)) {
            *t += if config.normalize() {
                count / number_density
            } else {
                count
            };
        }
    }

    let n_ref = references.len() as f64;
    let e = edges.edges();
    Ok(total
        .iter()
        .enumerate()
        .map(|(b, &t)| {
            let area = PI * (e[b + 1].powi(2) - e[b].powi(2));
            t / n_ref / area
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn no_reference_points_is_undefined() {
        let valid = Array2::from_elem((5, 5), true);
        let g = centroid_rdf(&[[0.0, 0.0], [4.0, 4.0]], &valid, &RdfConfig::new(3.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(g.len(), 3);
        assert!(g.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn single_reference_raw_counts() {
        let valid = Array2::from_elem((9, 9), true);
        let centers = [[4.0, 4.0], [4.0, 5.5], [0.0, 0.0]];
        let cfg = RdfConfig::new(3.0, 1.0, 0.0).with_normalize(false);
        let g = centroid_rdf(&centers, &valid, &cfg).unwrap();
        // Only (4, 4) is interior; its neighbor at 1.5 lands in bin [1, 2).
        assert_relative_eq!(g[0], 0.0);
        assert_relative_eq!(g[1], 1.0 / (PI * 3.0));
        assert_relative_eq!(g[2], 0.0);
    }

    #[test]
    fn centers_on_excluded_cells_are_dropped() {
        let mut valid = Array2::from_elem((9, 9), true);
        valid[[0, 8]] = false;
        let centers = [[4.0, 4.0], [0.0, 8.0]];
        let cfg = RdfConfig::new(2.0, 1.0, 0.0).with_normalize(false);
        let g = centroid_rdf(&centers, &valid, &cfg).unwrap();
        assert!(g.iter().all(|&v| v == 0.0));
    }
}
