//! Range-sum engine
//!
//! Plain linear scan over the requested positions. There is deliberately no
//! prefix-sum table: the cache layer is measured against this baseline.

use crate::error::{Error, Result};
use crate::interval::Interval;

/// Sum of `values[left..=right]`
///
/// The interval must lie inside `values`; use [`try_range_sum`] for unchecked
/// input. Accumulates in `i128`, so only a final total outside the `i64`
/// range is an error ([`Error::Overflow`]); sums are never wrapped.
pub fn range_sum(values: &[i64], interval: Interval) -> Result<i64> {
    let total: i128 = values[interval.left()..=interval.right()]
        .iter()
        .map(|&value| i128::from(value))
        .sum();

    i64::try_from(total).map_err(|_| Error::Overflow {
        left: interval.left(),
        right: interval.right(),
    })
}

/// Bounds-checked variant of [`range_sum`]
pub fn try_range_sum(values: &[i64], left: usize, right: usize) -> Result<i64> {
    let interval = Interval::checked(left, right, values.len())?;
    range_sum(values, interval)
}
