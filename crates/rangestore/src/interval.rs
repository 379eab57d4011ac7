//! Closed index ranges used as cache keys

use std::fmt;

use crate::error::{Error, Result};

/// Closed range `[left, right]` of array positions
///
/// Equality and hashing are structural, so an `Interval` can key a map
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    left: usize,
    right: usize,
}

impl Interval {
    /// Create an interval, rejecting `left > right`
    pub fn new(left: usize, right: usize) -> Result<Self> {
        if left > right {
            return Err(Error::InvalidInterval {
                left,
                right,
                len: None,
            });
        }
        Ok(Self { left, right })
    }

    /// Create an interval that must also lie inside an array of `len` elements
    pub fn checked(left: usize, right: usize, len: usize) -> Result<Self> {
        if left > right || right >= len {
            return Err(Error::InvalidInterval {
                left,
                right,
                len: Some(len),
            });
        }
        Ok(Self { left, right })
    }

    /// Left endpoint
    pub fn left(&self) -> usize {
        self.left
    }

    /// Right endpoint (inclusive)
    pub fn right(&self) -> usize {
        self.right
    }

    /// Whether `index` falls inside the interval
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }

    /// Number of positions covered
    #[allow(clippy::len_without_is_empty)] // never empty
    pub fn len(&self) -> usize {
        self.right - self.left + 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}
