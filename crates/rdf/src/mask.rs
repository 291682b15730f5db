//! Valid-area masks and disk offsets.

use ndarray::{Array2, ArrayView2};

/// Cells not excluded by `excluded`.
pub(crate) fn valid_mask(dim: (usize, usize), excluded: Option<ArrayView2<'_, bool>>) -> Array2<bool> {
    match excluded {
        Some(ex) => ex.mapv(|e| !e),
        None => Array2::from_elem(dim, true),
    }
}

/// Integer offsets `(dy, dx)` with `0 < |d| <= radius`.
pub(crate) fn disk_offsets(radius: f64) -> Vec<(isize, isize, f64)> {
    let reach = radius.floor() as isize;
    let mut out = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dy * dy + dx * dx) as f64).sqrt();
            if d > 0.0 && d <= radius {
                out.push((dy, dx, d));
            }
        }
    }
    out
}

/// Cells whose full disk of `radius` lies inside the domain and touches no
/// invalid cell.
pub(crate) fn interior_mask(valid: &Array2<bool>, radius: f64) -> Array2<bool> {
    let (rows, cols) = valid.dim();
    let reach = radius.floor() as usize;
    let offsets = disk_offsets(radius);
    let mut interior = Array2::from_elem((rows, cols), false);
    if rows <= 2 * reach || cols <= 2 * reach {
        return interior;
    }
    for r in reach..rows - reach {
        for c in reach..cols - reach {
            if !valid[[r, c]] {
                continue;
            }
            interior[[r, c]] = offsets.iter().all(|&(dy, dx, _)| {
                valid[[(r as isize + dy) as usize, (c as isize + dx) as usize]]
            });
        }
    }
    interior
}
