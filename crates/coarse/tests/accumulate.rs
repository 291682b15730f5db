//! Integration tests for coarse-grained ensemble statistics.

use approx::assert_relative_eq;
use cirrus_coarse::{
    BoxIndex, CoarseConfig, CondHistogram, ScaleIndex, ScaleSet, ScalingRatios, accumulate,
};
use cirrus_objects::{CloudObjects, LabelConfig, identify};
use cirrus_stats::BinEdges;
use ndarray::{Array2, array};

fn objects(sums: &[f64], centers: &[[f64; 2]]) -> CloudObjects {
    CloudObjects::from_parts(vec![1.0; sums.len()], sums.to_vec(), centers.to_vec())
}

fn single_scale(n: usize) -> CoarseConfig {
    CoarseConfig::new(ScaleSet::new(vec![n]).unwrap())
}

/// Members {[10, 20], [], [5]} in one box.
#[test]
fn three_members_one_box() {
    let members = vec![
        objects(&[10.0, 20.0], &[[0.0, 0.0], [1.0, 1.0]]),
        CloudObjects::empty(),
        objects(&[5.0], &[[1.5, 0.5]]),
    ];
    let config = single_scale(2).with_correlation(true);
    let result = accumulate(&config, &members, (2, 2), None, None).unwrap();
    let st = result.scale(ScaleIndex(0)).statistics(BoxIndex::new(0, 0));
    assert_relative_eq!(st.mean_n.unwrap(), 1.0);
    assert_relative_eq!(st.var_n.unwrap(), 1.0);
    assert_relative_eq!(st.mean_big_m.unwrap(), 35.0 / 3.0);
    assert_relative_eq!(st.mean_m.unwrap(), 35.0 / 3.0);
    assert!(st.corr_m_n.is_some());

    // Two members have objects: still computed at min_object_count = 2.
    let strict = single_scale(2).with_min_object_count(2);
    let result = accumulate(&strict, &members, (2, 2), None, None).unwrap();
    let st2 = result.scale(ScaleIndex(0)).statistics(BoxIndex::new(0, 0));
    assert_eq!(st2.mean_n, st.mean_n);
    assert_eq!(st2.var_m, st.var_m);
}

/// 4x4 domain, n = 2, one object per member at disjoint positions.
#[test]
fn disjoint_members_on_small_domain() {
    let members = vec![
        objects(&[2.0], &[[0.5, 3.0]]),
        objects(&[6.0], &[[3.0, 0.0]]),
    ];
    let result = accumulate(&single_scale(2), &members, (4, 4), None, None).unwrap();
    let scale = result.scale(ScaleIndex(0));
    assert_eq!(scale.grid().n_boxes(), 4);

    let top_right = scale.statistics(BoxIndex::new(0, 1));
    assert_eq!(top_right.mean_n, Some(0.5));
    assert_relative_eq!(top_right.var_n.unwrap(), 0.5);
    assert_eq!(top_right.mean_big_m, Some(1.0));
    assert_eq!(top_right.mean_m, Some(2.0));
    assert_eq!(top_right.var_m, None);

    let bottom_left = scale.statistics(BoxIndex::new(1, 0));
    assert_eq!(bottom_left.mean_n, Some(0.5));
    assert_eq!(bottom_left.mean_m, Some(6.0));

    for b in [BoxIndex::new(0, 0), BoxIndex::new(1, 1)] {
        assert!(!scale.statistics(b).is_defined());
        assert_eq!(scale.statistics(b).var_n, None);
    }
    assert_eq!(scale.n_defined(), 2);
}

/// A single member never produces a variance.
#[test]
fn single_member_variances_undefined() {
    let members = vec![objects(&[1.0, 2.0], &[[0.0, 0.0], [0.5, 0.5]])];
    let result = accumulate(&single_scale(2), &members, (2, 2), None, None).unwrap();
    let st = result.scale(ScaleIndex(0)).statistics(BoxIndex::new(0, 0));
    assert_eq!(st.var_n, None);
    assert_eq!(st.var_big_m, None);
    assert_relative_eq!(st.var_m.unwrap(), 0.5);
}

/// Scales are independent; the coarsest covers the whole domain.
#[test]
fn multiple_scales() {
    let members = vec![
        objects(&[1.0], &[[0.0, 0.0]]),
        objects(&[3.0], &[[7.0, 7.0]]),
    ];
    let config = CoarseConfig::new(ScaleSet::new(vec![8, 4, 16]).unwrap());
    let result = accumulate(&config, &members, (8, 8), None, None).unwrap();
    let whole = result.scale(ScaleIndex(0));
    assert_eq!(whole.grid().n_boxes(), 1);
    let st = whole.statistics(BoxIndex::new(0, 0));
    assert_eq!(st.mean_n, Some(1.0));
    assert_eq!(st.var_n, Some(0.0));
    assert_eq!(result.scale(ScaleIndex(1)).n_defined(), 2);
    assert_eq!(result.scale(ScaleIndex(2)).grid().n_boxes(), 0);
    assert_eq!(result.iter().count(), 3);
}

/// Auxiliary box means ignore the object policy.
#[test]
fn auxiliary_reported_without_objects() {
    let members = vec![CloudObjects::empty(), CloudObjects::empty()];
    let a = Array2::from_elem((4, 4), 1.0);
    let b = Array2::from_elem((4, 4), 3.0);
    let fields = [a.view(), b.view()];
    let result = accumulate(&single_scale(4), &members, (4, 4), Some(&fields[..]), None).unwrap();
    let scale = result.scale(ScaleIndex(0));
    assert!(!scale.statistics(BoxIndex::new(0, 0)).is_defined());
    let aux = scale.auxiliary(BoxIndex::new(0, 0)).unwrap();
    assert_relative_eq!(aux.mean.unwrap(), 2.0);
    assert_relative_eq!(aux.var.unwrap(), 2.0);
}

/// The conditional histogram accumulates across calls within one sweep.
#[test]
fn conditional_histogram_accumulates() {
    let mut hist = CondHistogram::new(
        1,
        BinEdges::new(vec![0.0, 10.0, 20.0]).unwrap(),
        BinEdges::new(vec![0.0, 10.0, 20.0, 30.0]).unwrap(),
    );
    let members = vec![
        objects(&[10.0, 20.0], &[[0.0, 0.0], [1.0, 1.0]]),
        CloudObjects::empty(),
        objects(&[5.0], &[[1.5, 0.5]]),
    ];
    for _ in 0..2 {
        accumulate(&single_scale(2), &members, (2, 2), None, Some(&mut hist)).unwrap();
    }
    let counts = hist.scale_counts(ScaleIndex(0));
    // box mean 35/3 -> mean bin 1; values 5, 10, 20 -> m bins 0, 1, 2
    assert_eq!(counts.row(1).to_vec(), vec![2.0, 2.0, 2.0]);
    assert_eq!(counts.row(0).sum(), 0.0);
}

/// Objects identified on real fields feed the coarse grid.
#[test]
fn from_identified_fields() {
    let f1 = array![
        [2.0, 2.0, 0.0, 0.0],
        [2.0, 2.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 3.0],
    ];
    let f2 = array![
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ];
    let config = LabelConfig::new(0.5);
    let members: Vec<CloudObjects> = [f1, f2]
        .iter()
        .map(|f| identify(f.view(), None, None, &config).unwrap().1)
        .collect();
    let result = accumulate(&single_scale(2), &members, (4, 4), None, None).unwrap();
    let st = result.scale(ScaleIndex(0)).statistics(BoxIndex::new(0, 0));
    // member 1 block center (0.5, 0.5), member 2 single cell (1, 1)
    assert_eq!(st.mean_n, Some(1.0));
    assert_relative_eq!(st.mean_m.unwrap(), 4.5);

    let ratios = ScalingRatios::from_statistics(st);
    assert_relative_eq!(ratios.alpha.unwrap(), 0.0);
}
