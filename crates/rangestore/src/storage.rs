//! Array store implementation
//!
//! The array length is fixed at construction; only point updates mutate it.

use parking_lot::RwLock;

use crate::engine;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::query::RangeQuery;

/// ArrayStore owns the mutable integer array
///
/// Every query and update is bounds-checked. Range sums are computed by a
/// linear scan with no caching.
pub struct ArrayStore {
    /// Backing values
    values: RwLock<Vec<i64>>,

    /// Fixed length, cached to avoid taking the lock for bounds checks
    len: usize,
}

impl ArrayStore {
    /// Create a store that takes ownership of `values`
    pub fn new(values: Vec<i64>) -> Self {
        let len = values.len();
        Self {
            values: RwLock::new(values),
            len,
        }
    }

    /// Get the number of positions
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Validate `[left, right]` against this array
    pub fn check_interval(&self, left: usize, right: usize) -> Result<Interval> {
        Interval::checked(left, right, self.len)
    }

    /// Validate a single position
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Result<i64> {
        self.check_index(index)?;
        Ok(self.values.read()[index])
    }

    /// Sum the positions of `interval`, rechecking it against this store
    pub fn sum_interval(&self, interval: Interval) -> Result<i64> {
        let interval = self.check_interval(interval.left(), interval.right())?;
        engine::range_sum(&self.values.read(), interval)
    }

    /// Sum of `[left, right]`, computed by a full scan
    pub fn range_sum(&self, left: usize, right: usize) -> Result<i64> {
        let interval = self.check_interval(left, right)?;
        engine::range_sum(&self.values.read(), interval)
    }

    /// Set `index` to `value`
    ///
    /// # Returns
    /// * `Result<i64>` - The value previously stored at `index`
    pub fn update(&self, index: usize, value: i64) -> Result<i64> {
        self.check_index(index)?;
        let mut values = self.values.write();
        Ok(std::mem::replace(&mut values[index], value))
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Vec<i64> {
        self.values.read().clone()
    }

    /// Consume the store and return the array
    pub fn into_values(self) -> Vec<i64> {
        self.values.into_inner()
    }
}

impl From<Vec<i64>> for ArrayStore {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}

impl RangeQuery for ArrayStore {
    fn range_sum(&self, left: usize, right: usize) -> Result<i64> {
        ArrayStore::range_sum(self, left, right)
    }

    fn update(&self, index: usize, value: i64) -> Result<()> {
        ArrayStore::update(self, index, value).map(|_| ())
    }

    fn len(&self) -> usize {
        self.len
    }
}
