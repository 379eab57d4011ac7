//! Workload operations

use std::fmt;

use crate::error::Result;
use crate::query::RangeQuery;

/// A single step of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Sum of `[left, right]`
    Range {
        /// Left endpoint
        left: usize,
        /// Right endpoint (inclusive)
        right: usize,
    },

    /// Point update
    Update {
        /// Position to overwrite
        index: usize,
        /// New value
        value: i64,
    },
}

impl Operation {
    /// Run the operation against `target`
    ///
    /// # Returns
    /// * `Result<Option<i64>>` - The sum for range queries, `None` for updates
    pub fn apply<Q: RangeQuery + ?Sized>(&self, target: &Q) -> Result<Option<i64>> {
        match *self {
            Operation::Range { left, right } => target.range_sum(left, right).map(Some),
            Operation::Update { index, value } => target.update(index, value).map(|_| None),
        }
    }

    /// Whether this is a range query
    pub fn is_range(&self) -> bool {
        matches!(self, Operation::Range { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Range { left, right } => write!(f, "range {} {}", left, right),
            Operation::Update { index, value } => write!(f, "update {} {}", index, value),
        }
    }
}
