//! Ensemble moments of one box.

use cirrus_stats::{mean, pearson_correlation, sample_variance};

use crate::sample::EnsembleBoxSample;

/// Ensemble mean and variance of `N`, `M` and `m` in one box.
///
/// `None` marks an undefined statistic: the box failed the minimum-count
/// policy, a variance had fewer than 2 samples, or a correlation had too few
/// pairs or no spread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxStatistics {
    /// Mean object count over members.
    pub mean_n: Option<f64>,
    /// Bessel-corrected variance of the object count.
    pub var_n: Option<f64>,
    /// Mean summed value over members.
    pub mean_big_m: Option<f64>,
    /// Bessel-corrected variance of the summed value.
    pub var_big_m: Option<f64>,
    /// Mean of the pooled object values.
    pub mean_m: Option<f64>,
    /// Bessel-corrected variance of the pooled object values.
    pub var_m: Option<f64>,
    /// Correlation between per-member mean object value and object count.
    pub corr_m_n: Option<f64>,
}

impl BoxStatistics {
    /// Computes the statistics of `sample`.
    ///
    /// Moments are only computed if at least `min_object_count` members have
    /// an object in the box. The correlation is computed only if `correlation`
    /// is set, over members with objects.
    pub fn compute(sample: &EnsembleBoxSample, min_object_count: usize, correlation: bool) -> Self {
        if sample.members_with_objects() < min_object_count {
            return Self::default();
        }
        let corr_m_n = if correlation {
            let (m, n): (Vec<f64>, Vec<f64>) = sample
                .member_mean_m()
                .iter()
                .zip(sample.n())
                .filter_map(|(&mm, &n)| mm.map(|mm| (mm, n)))
                .unzip();
            pearson_correlation(&m, &n)
        } else {
            None
        };
        Self {
            mean_n: mean(sample.n()),
            var_n: sample_variance(sample.n()),
            mean_big_m: mean(sample.big_m()),
            var_big_m: sample_variance(sample.big_m()),
            mean_m: mean(sample.pooled()),
            var_m: sample_variance(sample.pooled()),
            corr_m_n,
        }
    }

    /// Returns `true` if the box passed the minimum-count policy.
    pub fn is_defined(&self) -> bool {
        self.mean_n.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemberIndex;
    use crate::sample::BoxSampleBuilder;
    use approx::assert_relative_eq;

    fn sample(members: &[&[f64]]) -> EnsembleBoxSample {
        let mut b = BoxSampleBuilder::new(members.len());
        for (ie, objs) in members.iter().enumerate() {
            for &m in *objs {
                b.push(MemberIndex(ie), m);
            }
        }
        b.build()
    }

    #[test]
    fn three_member_example() {
        let s = sample(&[&[10.0, 20.0], &[], &[5.0]]);
        let st = BoxStatistics::compute(&s, 1, true);
        assert_relative_eq!(st.mean_n.unwrap(), 1.0);
        assert_relative_eq!(st.var_n.unwrap(), 1.0);
        assert_relative_eq!(st.mean_big_m.unwrap(), 35.0 / 3.0);
        assert_relative_eq!(st.var_big_m.unwrap(), 775.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(st.mean_m.unwrap(), 35.0 / 3.0);
        assert_relative_eq!(st.var_m.unwrap(), 175.0 / 3.0, epsilon = 1e-9);
        // Two members with objects: (15, 2) and (5, 1).
        assert_relative_eq!(st.corr_m_n.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn min_count_boundary_is_inclusive() {
        let s = sample(&[&[10.0, 20.0], &[], &[5.0]]);
        assert!(BoxStatistics::compute(&s, 2, false).is_defined());
        let st = BoxStatistics::compute(&s, 3, true);
        assert_eq!(st, BoxStatistics::default());
    }

    #[test]
    fn single_member_variance_undefined() {
        let s = sample(&[&[7.0]]);
        let st = BoxStatistics::compute(&s, 1, true);
        assert_eq!(st.mean_n, Some(1.0));
        assert_eq!(st.var_n, None);
        assert_eq!(st.var_big_m, None);
        assert_eq!(st.var_m, None);
        assert_eq!(st.corr_m_n, None);
    }

    #[test]
    fn empty_box_with_zero_min_count() {
        let s = sample(&[&[], &[]]);
        let st = BoxStatistics::compute(&s, 0, false);
        assert_eq!(st.mean_n, Some(0.0));
        assert_eq!(st.var_n, Some(0.0));
        assert_eq!(st.mean_m, None);
        assert_eq!(st.var_m, None);
    }

    #[test]
    fn correlation_disabled() {
        let s = sample(&[&[1.0], &[2.0, 3.0]]);
        assert_eq!(BoxStatistics::compute(&s, 1, false).corr_m_n, None);
    }
}
