//! Typed indices for scales, boxes and members.

/// Position of a scale within a [`ScaleSet`](crate::ScaleSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaleIndex(pub usize);

/// Position of a member within the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberIndex(pub usize);

/// A box within a [`BoxGrid`](crate::BoxGrid): `row` counts boxes along the
/// first grid axis, `col` along the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxIndex {
    /// Box row.
    pub row: usize,
    /// Box column.
    pub col: usize,
}

impl BoxIndex {
    /// Creates a box index.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}
