//! # rangecache
//!
//! LRU cache of range sums layered over [`rangestore::ArrayStore`].
//!
//! ## Architecture
//! - **HashMap**: AHash keyed by interval for O(1) lookups
//! - **LRU List**: Index-linked list for O(1) promote and evict
//! - **Invalidation**: Linear scan dropping every interval that covers an
//!   updated position

#![warn(missing_docs)]

mod cache;
mod lru;
mod stats;

pub use cache::CachedArray;
pub use lru::IntervalCache;
pub use stats::{CacheStats, StatsSnapshot};
