//! LRU cache keyed by interval
//!
//! Uses an index-linked list over a slab of nodes for O(1) promote and evict.
//! Invalidation is a linear scan of the live entries.

use std::collections::HashMap;

use ahash::RandomState;
use rangestore::Interval;
use tracing::trace;

/// Node in the recency list
struct Node {
    key: Interval,
    sum: i64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity cache of range sums
///
/// Entries are ordered from most recently used (head) to least recently used
/// (tail). A capacity of zero is valid and retains nothing.
pub struct IntervalCache {
    map: HashMap<Interval, usize, RandomState>,
    nodes: Vec<Option<Node>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl IntervalCache {
    /// Create a new cache holding at most `capacity` intervals
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Get the cached sum for `interval`, promoting it to most recently used
    pub fn lookup(&mut self, interval: &Interval) -> Option<i64> {
        let idx = *self.map.get(interval)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| node.sum)
    }

    /// Get the cached sum without touching recency
    pub fn peek(&self, interval: &Interval) -> Option<i64> {
        let idx = *self.map.get(interval)?;
        self.nodes[idx].as_ref().map(|node| node.sum)
    }

    /// Insert or refresh an entry
    ///
    /// # Returns
    /// * `Option<(Interval, i64)>` - The least recently used entry, if it was
    ///   evicted to make room
    pub fn insert(&mut self, interval: Interval, sum: i64) -> Option<(Interval, i64)> {
        if let Some(&idx) = self.map.get(&interval) {
            if let Some(node) = &mut self.nodes[idx] {
                node.sum = sum;
            }
            self.move_to_front(idx);
            return None;
        }

        if self.capacity == 0 {
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: interval,
            sum,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(interval, idx);
        evicted
    }

    /// Remove every entry whose interval contains `index`
    ///
    /// # Returns
    /// * `usize` - Number of entries removed
    pub fn invalidate(&mut self, index: usize) -> usize {
        let stale: Vec<Interval> = self
            .map
            .keys()
            .filter(|key| key.contains(index))
            .copied()
            .collect();

        for key in &stale {
            self.remove(key);
        }

        if !stale.is_empty() {
            trace!(index, removed = stale.len(), "invalidated cached intervals");
        }
        stale.len()
    }

    /// Remove a single interval
    pub fn remove(&mut self, interval: &Interval) -> Option<i64> {
        let idx = self.map.remove(interval)?;
        self.unlink(idx);
        self.free_node(idx);
        self.nodes[idx].take().map(|node| node.sum)
    }

    /// Cached intervals, most recently used first
    pub fn keys(&self) -> Vec<Interval> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match &self.nodes[idx] {
                Some(node) => {
                    keys.push(node.key);
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn evict(&mut self) -> Option<(Interval, i64)> {
        let tail_idx = self.tail?;
        self.unlink(tail_idx);
        self.free_node(tail_idx);
        let node = self.nodes[tail_idx].take()?;
        self.map.remove(&node.key);
        trace!(interval = %node.key, "evicted least recently used interval");
        Some((node.key, node.sum))
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}
