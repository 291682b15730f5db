//! Pair statistics over occupied grid cells.

use ndarray::Array2;

use crate::config::RdfConfig;
use crate::mask::disk_offsets;

/// Raster RDF of `occupied` within the `valid` area.
///
/// For each bin, observed counts are ordered pairs of occupied cells at that
/// distance. Expected counts assume the `n_occ - 1` other occupied cells are
/// spread uniformly over the `n_valid - 1` other valid cells.
pub(crate) fn raster_rdf(occupied: &Array2<bool>, valid: &Array2<bool>, config: &RdfConfig) -> Vec<f64> {
    let n_bins = config.n_bins();
    let dim = occupied.dim();
    let bin_width = config.bin_width();

    let table: Vec<(isize, isize, usize)> = disk_offsets(config.max_radius())
        .into_iter()
        .filter(|&(_, _, d)| d < config.max_radius())
        .filter_map(|(dy, dx, d)| {
            let bin = (d / bin_width).floor() as usize;
            (bin < n_bins).then_some((dy, dx, bin))
        })
        .collect();

    let mut observed = vec![0.0; n_bins];
    let mut valid_at = vec![0.0; n_bins];
    for ((r, c), &occ) in occupied.indexed_iter() {
        if !occ {
            continue;
        }
        for &(dy, dx, bin) in &table {
            let nr = r as isize + dy;
            let nc = c as isize + dx;
            if nr < 0 || nc < 0 || nr >= dim.0 as isize || nc >= dim.1 as isize {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            if valid[[nr, nc]] {
                valid_at[bin] += 1.0;
                if occupied[[nr, nc]] {
                    observed[bin] += 1.0;
                }
            }
        }
    }

    if !config.normalize() {
        return observed.into_iter().map(|o| o / 2.0).collect();
    }

    let n_occ = occupied.iter().filter(|&&o| o).count() as f64;
    let n_valid = valid.iter().filter(|&&v| v).count() as f64;
    if n_occ < 2.0 || n_valid < 2.0 {
        return vec![f64::NAN; n_bins];
    }
    let density = (n_occ - 1.0) / (n_valid - 1.0);
    observed
        .iter()
        .zip(&valid_at)
        .map(|(&o, &v)| {
            let expected = v * density;
            if expected > 0.0 { o / expected } else { f64::NAN }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn adjacent_pair_counts() {
        let occupied = array![[true, true, false, false]];
        let valid = Array2::from_elem((1, 4), true);
        let cfg = RdfConfig::new(3.0, 1.0, 0.0).with_normalize(false);
        let counts = raster_rdf(&occupied, &valid, &cfg);
        // Bins [0,1), [1,2), [2,3): one unordered pair at distance 1.
        assert_eq!(counts, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn normalized_against_valid_area() {
        let occupied = array![[true, true, false, false]];
        let valid = Array2::from_elem((1, 4), true);
        let cfg = RdfConfig::new(3.0, 1.0, 0.0);
        let g = raster_rdf(&occupied, &valid, &cfg);
        assert!(g[0].is_nan());
        // d=1: three valid neighbors over both cells, expected 3 * 1/3, observed 2
        assert_relative_eq!(g[1], 2.0);
        // d=2: cell 0 sees cell 2, cell 1 sees cell 3 -> expected 2/3, observed 0
        assert_relative_eq!(g[2], 0.0);
    }

    #[test]
    fn excluded_cells_leave_denominator() {
        let occupied = array![[true, true, false, false]];
        let valid = array![[true, true, true, false]];
        let cfg = RdfConfig::new(3.0, 1.0, 0.0);
        let g = raster_rdf(&occupied, &valid, &cfg);
        // density (2-1)/(3-1); d=1 expected 3 * 0.5, observed 2
        assert_relative_eq!(g[1], 2.0 / 1.5);
        // d=2: only cell 0 -> cell 2 is valid; expected 0.5, observed 0
        assert_relative_eq!(g[2], 0.0);
    }

    #[test]
    fn single_occupied_cell_is_undefined() {
        let occupied = array![[true, false, false]];
        let valid = Array2::from_elem((1, 3), true);
        let g = raster_rdf(&occupied, &valid, &RdfConfig::new(2.0, 1.0, 0.0));
        assert!(g.iter().all(|v| v.is_nan()));
    }
}
