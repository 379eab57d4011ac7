//! Query interface shared by cached and uncached stores

use crate::error::Result;

/// Range-sum queries and point updates over an integer array
///
/// Implemented by [`ArrayStore`](crate::ArrayStore) as the uncached baseline
/// and by cache layers built on top of it.
pub trait RangeQuery {
    /// Sum of the positions in `[left, right]`
    fn range_sum(&self, left: usize, right: usize) -> Result<i64>;

    /// Set position `index` to `value`
    fn update(&self, index: usize, value: i64) -> Result<()>;

    /// Number of positions in the array
    fn len(&self) -> usize;

    /// Whether the array has no positions
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
