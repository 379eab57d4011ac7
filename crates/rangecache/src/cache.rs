//! CachedArray: interval cache wrapping ArrayStore

use parking_lot::Mutex;
use rangestore::{ArrayStore, Interval, RangeQuery, Result};
use tracing::debug;

use crate::lru::IntervalCache;
use crate::stats::CacheStats;

/// Array store whose range sums are served from an [`IntervalCache`]
///
/// One lock guards the cache for the whole of each call, so a miss cannot
/// store a sum computed before a concurrent update, and an update is never
/// visible before its invalidation.
pub struct CachedArray {
    /// Underlying array
    store: ArrayStore,

    /// LRU cache of computed sums
    cache: Mutex<IntervalCache>,

    /// Cache statistics
    stats: CacheStats,
}

impl CachedArray {
    /// Create a cached array over `values`
    ///
    /// # Arguments
    /// * `values` - Initial array contents
    /// * `capacity` - Maximum number of cached intervals
    pub fn new(values: Vec<i64>, capacity: usize) -> Self {
        Self::with_cache(ArrayStore::new(values), IntervalCache::new(capacity))
    }

    /// Assemble a cached array from an existing store and cache
    ///
    /// The cache is cleared, since its entries cannot be trusted for a store
    /// it was not tracking.
    pub fn with_cache(store: ArrayStore, mut cache: IntervalCache) -> Self {
        cache.clear();
        Self {
            store,
            cache: Mutex::new(cache),
            stats: CacheStats::new(),
        }
    }

    /// Sum of `[left, right]`, from cache when possible
    ///
    /// # Returns
    /// * `Result<i64>` - The sum, or an invalid-interval error
    pub fn range_sum(&self, left: usize, right: usize) -> Result<i64> {
        let interval = self.store.check_interval(left, right)?;
        let mut cache = self.cache.lock();

        if let Some(sum) = cache.lookup(&interval) {
            self.stats.record_hit();
            return Ok(sum);
        }

        self.stats.record_miss();
        let sum = self.store.sum_interval(interval)?;

        if cache.insert(interval, sum).is_some() {
            self.stats.record_eviction();
        }

        Ok(sum)
    }

    /// Set `index` to `value` and drop every cached interval covering it
    pub fn update(&self, index: usize, value: i64) -> Result<()> {
        let mut cache = self.cache.lock();
        self.store.update(index, value)?;

        let removed = cache.invalidate(index);
        if removed > 0 {
            debug!(index, removed, "update invalidated cached sums");
            self.stats.record_invalidations(removed);
        }

        Ok(())
    }

    /// Cached sum for `[left, right]` without promoting it
    pub fn peek(&self, left: usize, right: usize) -> Option<i64> {
        let interval = Interval::new(left, right).ok()?;
        self.cache.lock().peek(&interval)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Intervals currently cached, most recently used first
    pub fn cached_intervals(&self) -> Vec<Interval> {
        self.cache.lock().keys()
    }

    /// Clear the cache and its statistics (array remains unchanged)
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        cache.clear();
        self.stats.reset();
    }

    /// Underlying array store
    pub fn store(&self) -> &ArrayStore {
        &self.store
    }

    /// Get the number of positions in the array
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop the cache and return the array store
    pub fn into_store(self) -> ArrayStore {
        self.store
    }
}

impl RangeQuery for CachedArray {
    fn range_sum(&self, left: usize, right: usize) -> Result<i64> {
        CachedArray::range_sum(self, left, right)
    }

    fn update(&self, index: usize, value: i64) -> Result<()> {
        CachedArray::update(self, index, value)
    }

    fn len(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rangestore::parser::parse_operations;
    use rangestore::Error;

    #[test]
    fn test_cache_miss_then_hit() {
        let cached = CachedArray::new(vec![1, 2, 3, 4], 10);

        assert_eq!(cached.range_sum(0, 3).unwrap(), 10);
        assert_eq!(cached.stats().misses(), 1);

        assert_eq!(cached.range_sum(0, 3).unwrap(), 10);
        assert_eq!(cached.stats().hits(), 1);
        assert_eq!(cached.cache_len(), 1);
    }

    #[test]
    fn test_update_invalidates_overlapping_only() {
        let mut values = vec![0; 16];
        values[0..=5].copy_from_slice(&[5, 5, 5, 5, 5, 5]);
        values[10..=15].copy_from_slice(&[2, 2, 2, 2, 2, 2]);
        let cached = CachedArray::new(values, 10);

        assert_eq!(cached.range_sum(0, 5).unwrap(), 30);
        assert_eq!(cached.range_sum(10, 15).unwrap(), 12);

        cached.update(3, 100).unwrap();

        assert_eq!(cached.peek(0, 5), None);
        assert_eq!(cached.peek(10, 15), Some(12));

        let misses = cached.stats().misses();
        assert_eq!(cached.range_sum(0, 5).unwrap(), 125);
        assert_eq!(cached.stats().misses(), misses + 1);

        let hits = cached.stats().hits();
        assert_eq!(cached.range_sum(10, 15).unwrap(), 12);
        assert_eq!(cached.stats().hits(), hits + 1);
        assert_eq!(cached.stats().invalidations(), 1);
    }

    #[test]
    fn test_cache_eviction() {
        let cached = CachedArray::new(vec![1; 8], 2);

        cached.range_sum(0, 1).unwrap();
        cached.range_sum(2, 3).unwrap();
        cached.range_sum(0, 1).unwrap(); // hit, promotes
        cached.range_sum(4, 5).unwrap(); // evicts (2,3)

        assert_eq!(cached.cache_len(), 2);
        assert_eq!(cached.stats().evictions(), 1);
        assert_eq!(
            cached.cached_intervals(),
            vec![Interval::new(4, 5).unwrap(), Interval::new(0, 1).unwrap()]
        );
    }

    #[test]
    fn test_zero_capacity_is_uncached() {
        let cached = CachedArray::new(vec![3, 4], 0);

        assert_eq!(cached.range_sum(0, 1).unwrap(), 7);
        assert_eq!(cached.range_sum(0, 1).unwrap(), 7);
        assert_eq!(cached.stats().hits(), 0);
        assert_eq!(cached.cache_len(), 0);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let cached = CachedArray::new(vec![1, 2, 3], 4);

        assert!(matches!(
            cached.range_sum(1, 3),
            Err(Error::InvalidInterval { .. })
        ));
        assert!(matches!(
            cached.update(3, 1),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert_eq!(cached.stats().misses(), 0);
        assert_eq!(cached.cache_len(), 0);
    }

    #[test]
    fn test_overflowing_sum_is_error_not_cached() {
        let cached = CachedArray::new(vec![1, 1], 4);
        let ops = parse_operations("update 0 9223372036854775807\nrange 0 1\nrange 0 0\n").unwrap();

        assert_eq!(ops[0].apply(&cached).unwrap(), None);
        assert!(matches!(
            ops[1].apply(&cached),
            Err(Error::Overflow { left: 0, right: 1 })
        ));
        assert_eq!(cached.peek(0, 1), None);
        assert_eq!(ops[2].apply(&cached).unwrap(), Some(i64::MAX));

        // The uncached baseline rejects the same interval.
        assert!(matches!(
            cached.store().range_sum(0, 1),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_failed_update_keeps_cache() {
        let cached = CachedArray::new(vec![1, 2, 3], 4);

        cached.range_sum(0, 2).unwrap();
        assert!(cached.update(7, 1).is_err());
        assert_eq!(cached.peek(0, 2), Some(6));
    }

    #[test]
    fn test_cache_clear() {
        let cached = CachedArray::new(vec![1, 2, 3], 4);

        cached.range_sum(0, 1).unwrap();
        cached.range_sum(0, 1).unwrap();
        cached.clear_cache();
        cached.clear_cache();

        assert_eq!(cached.cache_len(), 0);
        assert_eq!(cached.stats().hits(), 0);
        assert_eq!(cached.store().snapshot(), vec![1, 2, 3]);

        cached.range_sum(0, 1).unwrap();
        assert_eq!(cached.stats().misses(), 1);
    }

    #[test]
    fn test_with_cache_starts_empty() {
        let mut cache = IntervalCache::new(4);
        cache.insert(Interval::new(0, 0).unwrap(), 999);

        let cached = CachedArray::with_cache(ArrayStore::new(vec![1]), cache);

        assert_eq!(cached.range_sum(0, 0).unwrap(), 1);
        assert_eq!(cached.capacity(), 4);
    }

    #[test]
    fn test_into_store() {
        let cached = CachedArray::new(vec![1, 2], 4);
        cached.update(1, 5).unwrap();

        let store = cached.into_store();
        assert_eq!(store.into_values(), vec![1, 5]);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let cached = Arc::new(CachedArray::new(vec![1; 64], 8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cached = Arc::clone(&cached);
                thread::spawn(move || {
                    for i in 0..200usize {
                        if i % 10 == 0 {
                            cached.update((i + t) % 64, 1).unwrap();
                        } else {
                            assert_eq!(cached.range_sum(0, 63).unwrap(), 64);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cached.cache_len() <= 8);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Range(usize, usize),
        Update(usize, i64),
    }

    fn step_strategy(len: usize) -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => (0..len, 0..len).prop_map(|(a, b)| Step::Range(a.min(b), a.max(b))),
            1 => (0..len, -100i64..100).prop_map(|(i, v)| Step::Update(i, v)),
        ]
    }

    proptest! {
        #[test]
        fn prop_cached_matches_uncached(
            values in proptest::collection::vec(-100i64..100, 1..24),
            capacity in 0usize..6,
            steps in proptest::collection::vec(step_strategy(24), 0..150),
        ) {
            let len = values.len();
            let baseline = ArrayStore::new(values.clone());
            let cached = CachedArray::new(values, capacity);

            for step in steps {
                match step {
                    Step::Range(l, r) => {
                        let (l, r) = (l % len, r % len);
                        let (l, r) = (l.min(r), l.max(r));
                        prop_assert_eq!(
                            cached.range_sum(l, r).unwrap(),
                            baseline.range_sum(l, r).unwrap()
                        );
                    }
                    Step::Update(i, v) => {
                        let i = i % len;
                        cached.update(i, v).unwrap();
                        baseline.update(i, v).unwrap();
                        for key in cached.cached_intervals() {
                            prop_assert!(!key.contains(i));
                        }
                    }
                }
                prop_assert!(cached.cache_len() <= capacity);
            }
        }
    }
}
