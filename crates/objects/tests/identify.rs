//! Integration tests for labeling and aggregation.

use approx::assert_relative_eq;
use cirrus_objects::{Footprint, LabelConfig, LabelMap, aggregate, identify, label};
use ndarray::{Array2, array};

/// Everything at or below the threshold: no objects, empty aggregates.
#[test]
fn all_below_threshold() {
    let field = Array2::from_elem((6, 7), 0.5);
    let (labels, objects) = identify(field.view(), None, None, &LabelConfig::new(0.5)).unwrap();
    assert!(labels.is_empty());
    assert_eq!(labels.view(), Array2::<u32>::zeros((6, 7)).view());
    assert!(objects.is_empty());
    assert!(objects.sizes().is_empty());
}

/// 3x3 block of constant value away from the border.
#[test]
fn constant_block_in_corner_region() {
    let mut field = Array2::zeros((8, 8));
    for r in 4..7 {
        for c in 0..3 {
            field[[r, c]] = 4.0;
        }
    }
    let (_, objects) = identify(field.view(), None, None, &LabelConfig::new(0.0)).unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects.sizes(), &[9.0]);
    assert_relative_eq!(objects.sums()[0], 36.0);
    assert_relative_eq!(objects.centers()[0][0], 5.0);
    assert_relative_eq!(objects.centers()[0][1], 1.0);
}

/// Running the same input twice gives identical results.
#[test]
fn labeling_is_idempotent() {
    let field = array![
        [0.0, 3.0, 3.0, 0.0, 1.0],
        [2.0, 0.0, 3.0, 0.0, 5.0],
        [2.0, 0.0, 0.0, 0.0, 5.0],
        [0.0, 0.0, 7.0, 0.0, 0.0],
    ];
    let config = LabelConfig::new(0.5).with_water(true);
    let first = identify(field.view(), None, None, &config).unwrap();
    let second = identify(field.view(), None, None, &config).unwrap();
    assert_eq!(first, second);

    let again = aggregate(&first.0, field.view(), None).unwrap();
    assert_eq!(again, first.1);
}

/// Labels are consecutive and every object has at least one cell.
#[test]
fn labels_are_consecutive() {
    let field = array![
        [1.0, 0.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 0.0, 1.0, 0.0],
    ];
    let map = label(field.view(), None, &LabelConfig::new(0.0)).unwrap();
    assert_eq!(map.n_objects(), 5);
    for l in 1..=5u32 {
        assert!(map.view().iter().any(|&x| x == l));
    }
    let objects = aggregate(&map, field.view(), None).unwrap();
    assert!(objects.sizes().iter().all(|&s| s >= 1.0));
}

/// Gate field restricts candidates (mass flux gated by condensate).
#[test]
fn condensate_gate_splits_object() {
    let w = array![[1.0, 1.0, 1.0, 1.0]];
    let condensate = array![[1e-4, 0.0, 2e-4, 3e-4]];
    let (labels, objects) = identify(
        w.view(),
        Some(condensate.view()),
        None,
        &LabelConfig::new(0.5),
    )
    .unwrap();
    assert_eq!(labels.view(), array![[1, 0, 2, 2]].view());
    assert_eq!(objects.sizes(), &[1.0, 2.0]);
}

/// Diagonal neighbors merge only with an 8-connected footprint.
#[test]
fn eight_connectivity() {
    let field = array![
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    let cross = label(field.view(), None, &LabelConfig::new(0.0)).unwrap();
    assert_eq!(cross.n_objects(), 3);

    let square = LabelConfig::new(0.0).with_footprint(Footprint::square(3).unwrap());
    let merged = label(field.view(), None, &square).unwrap();
    assert_eq!(merged.n_objects(), 1);
}

/// Two touching peaks are one object without separation and two with it.
#[test]
fn watershed_separates_touching_peaks() {
    let field = array![
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 3.0, 4.0, 1.0, 4.0, 3.0, 0.0],
        [0.0, 4.0, 9.0, 2.0, 8.0, 4.0, 0.0],
        [0.0, 3.0, 4.0, 1.0, 4.0, 3.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    ];
    let plain = label(field.view(), None, &LabelConfig::new(0.5)).unwrap();
    assert_eq!(plain.n_objects(), 1);

    let config = LabelConfig::new(0.5).with_water(true);
    let (separated, objects) = identify(field.view(), None, None, &config).unwrap();
    assert_eq!(separated.n_objects(), 2);
    assert_eq!(separated.occupied_count(), plain.occupied_count());
    assert_ne!(separated.get(2, 2), separated.get(2, 4));
    let total: f64 = objects.sizes().iter().sum();
    assert_relative_eq!(total, 15.0);
}

/// A wide footprint suppresses the weaker of two nearby peaks.
#[test]
fn wide_footprint_merges_under_watershed() {
    let field = array![[1.0, 9.0, 1.0, 8.0, 1.0]];
    let narrow = LabelConfig::new(0.5).with_water(true);
    assert_eq!(label(field.view(), None, &narrow).unwrap().n_objects(), 2);

    let wide = narrow.with_footprint(Footprint::square(5).unwrap());
    assert_eq!(label(field.view(), None, &wide).unwrap().n_objects(), 1);
}

/// Centers of mass always lie within the domain.
#[test]
fn centers_in_bounds() {
    let field = array![
        [-1.0, 2.0, 0.0],
        [3.0, 0.0, -2.0],
        [0.0, 0.0, 5.0],
    ];
    let labels = LabelMap::from_array(array![[1, 1, 0], [1, 0, 2], [0, 0, 2]]);
    let objects = aggregate(&labels, field.view(), None).unwrap();
    for &[r, c] in objects.centers() {
        assert!((0.0..3.0).contains(&r));
        assert!((0.0..3.0).contains(&c));
    }
}
