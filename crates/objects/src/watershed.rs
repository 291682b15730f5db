//! Marker-based watershed separation of touching objects.
//!
//! Seeds are candidate cells that are maximal within the footprint window
//! (only candidate neighbors are compared). Adjacent seed cells form a single
//! plateau seed. Seeds then flood the candidate region in order of decreasing
//! field value; ties go to the cell queued first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ndarray::{Array2, ArrayView2};

use crate::footprint::Footprint;
use crate::label::{connected_components, shifted};

const FOUR_NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Queue entry: higher value first, then lower sequence number.
struct Entry {
    value: f64,
    seq: u64,
    cell: (usize, usize),
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Labels `candidates` by flooding from footprint-local maxima of `field`.
///
/// Every connected candidate region holds at least one maximum, so every
/// candidate cell ends up labeled.
pub(crate) fn separate(
    field: ArrayView2<'_, f64>,
    candidates: &Array2<bool>,
    footprint: &Footprint,
) -> Array2<u32> {
    let dim = field.dim();
    let maxima = local_maxima(field, candidates, footprint);
    let mut labels = connected_components(&maxima, &FOUR_NEIGHBORS);

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    for ((r, c), &l) in labels.indexed_iter() {
        if l > 0 {
            heap.push(Entry {
                value: field[[r, c]],
                seq,
                cell: (r, c),
            });
            seq += 1;
        }
    }

    while let Some(Entry { cell, .. }) = heap.pop() {
        let current = labels[cell];
        for off in FOUR_NEIGHBORS {
            if let Some(n) = shifted(cell, off, dim)
                && candidates[n]
                && labels[n] == 0
            {
                labels[n] = current;
                heap.push(Entry {
                    value: field[n],
                    seq,
                    cell: n,
                });
                seq += 1;
            }
        }
    }
    labels
}

/// Candidate cells not exceeded by any candidate inside the footprint window.
fn local_maxima(
    field: ArrayView2<'_, f64>,
    candidates: &Array2<bool>,
    footprint: &Footprint,
) -> Array2<bool> {
    let dim = field.dim();
    let mut maxima = Array2::from_elem(dim, false);
    for ((r, c), &is_candidate) in candidates.indexed_iter() {
        if !is_candidate {
            continue;
        }
        let v = field[[r, c]];
        maxima[[r, c]] = footprint.offsets().iter().all(|&off| {
            shifted((r, c), off, dim).is_none_or(|n| !candidates[n] || field[n] <= v)
        });
    }
    maxima
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn two_peaks_are_split() {
        let field = array![[5.0, 3.0, 2.0, 3.0, 6.0]];
        let candidates = field.mapv(|v| v > 1.0);
        let labels = separate(field.view(), &candidates, &Footprint::cross());
        assert_eq!(labels[[0, 0]], 1);
        assert_eq!(labels[[0, 4]], 2);
        assert!(labels.iter().all(|&l| l > 0));
        assert_eq!(labels[[0, 1]], 1);
        assert_eq!(labels[[0, 3]], 2);
        // The saddle is reached first from the higher peak.
        assert_eq!(labels[[0, 2]], 2);
    }

    #[test]
    fn plateau_is_single_seed() {
        let field = array![[4.0, 4.0, 1.5]];
        let candidates = field.mapv(|v| v > 1.0);
        let labels = separate(field.view(), &candidates, &Footprint::cross());
        assert_eq!(labels, array![[1, 1, 1]]);
    }

    #[test]
    fn wide_footprint_suppresses_nearby_peak() {
        let field = array![[5.0, 3.0, 4.0]];
        let candidates = field.mapv(|v| v > 1.0);
        let fp = Footprint::square(5).unwrap();
        let maxima = local_maxima(field.view(), &candidates, &fp);
        assert_eq!(maxima, array![[true, false, false]]);
    }

    #[test]
    fn entry_ordering() {
        let a = Entry {
            value: 2.0,
            seq: 5,
            cell: (0, 0),
        };
        let b = Entry {
            value: 1.0,
            seq: 0,
            cell: (0, 1),
        };
        let c = Entry {
            value: 2.0,
            seq: 1,
            cell: (0, 2),
        };
        assert!(a > b);
        assert!(c > a);
    }
}
