//! Per-box ensemble samples.

use cirrus_objects::CloudObjects;

use crate::grid::BoxGrid;
use crate::index::{BoxIndex, MemberIndex};

/// Objects of every member falling into one box.
///
/// Built by [`BoxSampleBuilder`] and consumed by
/// [`BoxStatistics::compute`](crate::BoxStatistics::compute).
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleBoxSample {
    n: Vec<f64>,
    big_m: Vec<f64>,
    member_mean_m: Vec<Option<f64>>,
    pooled: Vec<f64>,
}

impl EnsembleBoxSample {
    /// Object count `N` per member.
    pub fn n(&self) -> &[f64] {
        &self.n
    }

    /// Summed object value `M` per member (0.0 without objects).
    pub fn big_m(&self) -> &[f64] {
        &self.big_m
    }

    /// Mean object value per member, `None` without objects.
    pub fn member_mean_m(&self) -> &[Option<f64>] {
        &self.member_mean_m
    }

    /// Object values `m` of all members, in member order.
    pub fn pooled(&self) -> &[f64] {
        &self.pooled
    }

    /// Number of members.
    pub fn n_members(&self) -> usize {
        self.n.len()
    }

    /// Number of members with at least one object.
    pub fn members_with_objects(&self) -> usize {
        self.n.iter().filter(|&&n| n > 0.0).count()
    }
}

/// Collects object values per member for one box.
#[derive(Debug, Clone)]
pub struct BoxSampleBuilder {
    per_member: Vec<Vec<f64>>,
}

impl BoxSampleBuilder {
    /// Builder for an ensemble of `n_members`.
    pub fn new(n_members: usize) -> Self {
        Self {
            per_member: vec![Vec::new(); n_members],
        }
    }

    /// Records one object of `member` with value `m`.
    pub fn push(&mut self, member: MemberIndex, m: f64) {
        self.per_member[member.0].push(m);
    }

    /// Finishes the sample.
    pub fn build(self) -> EnsembleBoxSample {
        let n_members = self.per_member.len();
        let mut n = Vec::with_capacity(n_members);
        let mut big_m = Vec::with_capacity(n_members);
        let mut member_mean_m = Vec::with_capacity(n_members);
        let mut pooled = Vec::new();
        for objects in self.per_member {
            n.push(objects.len() as f64);
            big_m.push(objects.iter().sum());
            member_mean_m.push(cirrus_stats::mean(&objects));
            pooled.extend(objects);
        }
        EnsembleBoxSample {
            n,
            big_m,
            member_mean_m,
            pooled,
        }
    }
}

/// Distributes every member's objects into the boxes of `grid` by center of
/// mass. Returns one sample per box in row-major order.
pub fn sample_boxes(grid: &BoxGrid, members: &[CloudObjects]) -> Vec<EnsembleBoxSample> {
    let mut builders = vec![BoxSampleBuilder::new(members.len()); grid.n_boxes()];
    for (ie, objects) in members.iter().enumerate() {
        for (&center, &m) in objects.centers().iter().zip(objects.sums()) {
            if let Some(b) = grid.box_of(center) {
                builders[grid.flat(b)].push(MemberIndex(ie), m);
            }
        }
    }
    builders.into_iter().map(BoxSampleBuilder::build).collect()
}

/// Sample for a single box; convenient when only one box is of interest.
pub fn sample_box(grid: &BoxGrid, b: BoxIndex, members: &[CloudObjects]) -> EnsembleBoxSample {
    let mut builder = BoxSampleBuilder::new(members.len());
    for (ie, objects) in members.iter().enumerate() {
        for (&center, &m) in objects.centers().iter().zip(objects.sums()) {
            if grid.box_of(center) == Some(b) {
                builder.push(MemberIndex(ie), m);
            }
        }
    }
    builder.build()
}
