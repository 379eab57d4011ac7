//! Timed replay of a workload against cached and uncached stores

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rangecache::{CachedArray, StatsSnapshot};
use rangestore::{ArrayStore, Operation, RangeQuery};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of replaying operations against one store
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
    /// Every range result, in workload order
    pub results: Vec<i64>,
    /// Wrapping sum of `results`, reported as a short fingerprint
    pub checksum: i64,
    /// Number of range queries answered
    pub ranges: usize,
    /// Number of updates applied
    pub updates: usize,
}

/// Replay `operations` against `target`, timing the batch
pub fn run_operations<Q: RangeQuery + ?Sized>(
    target: &Q,
    operations: &[Operation],
) -> Result<RunResult> {
    let mut results = Vec::with_capacity(operations.len());
    let mut checksum = 0i64;
    let mut updates = 0;

    let start = Instant::now();
    for (step, op) in operations.iter().enumerate() {
        match op
            .apply(target)
            .with_context(|| format!("operation {} ({}) failed", step + 1, op))?
        {
            Some(sum) => {
                checksum = checksum.wrapping_add(sum);
                results.push(sum);
            }
            None => updates += 1,
        }
    }
    let elapsed = start.elapsed();

    Ok(RunResult {
        elapsed,
        ranges: results.len(),
        results,
        checksum,
        updates,
    })
}

/// Position of the first range query whose results differ between runs
///
/// A run that stops short of the other diverges at its length.
pub fn first_divergence(expected: &RunResult, actual: &RunResult) -> Option<usize> {
    expected
        .results
        .iter()
        .zip(&actual.results)
        .position(|(a, b)| a != b)
        .or_else(|| {
            (expected.results.len() != actual.results.len())
                .then(|| expected.results.len().min(actual.results.len()))
        })
}

/// Comparison of an uncached and a cached run over the same workload
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Array length
    pub size: usize,
    /// Number of operations replayed
    pub operations: usize,
    /// Range queries in the workload
    pub ranges: usize,
    /// Updates in the workload
    pub updates: usize,
    /// Cache capacity used for the cached run
    pub capacity: usize,
    /// Uncached wall-clock time in seconds
    pub uncached_secs: f64,
    /// Cached wall-clock time in seconds
    pub cached_secs: f64,
    /// `uncached / cached`; `None` when the cached run measured zero time
    pub speedup: Option<f64>,
    /// Checksum of the uncached run
    pub uncached_checksum: i64,
    /// Checksum of the cached run
    pub cached_checksum: i64,
    /// Whether every range query returned the same value in both runs
    pub results_match: bool,
    /// Index of the first range query that differed, if any
    pub first_mismatch: Option<usize>,
    /// Cache counters after the cached run
    pub cache: StatsSnapshot,
}

/// `uncached / cached`, or `None` for an unbounded ratio
pub fn speedup(uncached: Duration, cached: Duration) -> Option<f64> {
    if cached.is_zero() {
        None
    } else {
        Some(uncached.as_secs_f64() / cached.as_secs_f64())
    }
}

/// Run the workload once without and once with the cache
///
/// Each run gets its own copy of `values`; the cached run starts from an
/// empty cache.
pub fn compare(values: &[i64], operations: &[Operation], capacity: usize) -> Result<BenchReport> {
    let baseline = ArrayStore::new(values.to_vec());
    let uncached = run_operations(&baseline, operations).context("uncached run")?;
    info!(elapsed = ?uncached.elapsed, "uncached run finished");

    let cached_array = CachedArray::new(values.to_vec(), capacity);
    cached_array.clear_cache();
    let cached = run_operations(&cached_array, operations).context("cached run")?;
    info!(elapsed = ?cached.elapsed, "cached run finished");

    let stats = cached_array.stats().snapshot();
    debug!(?stats, cache_len = cached_array.cache_len(), "cache state after run");

    Ok(BenchReport::from_runs(
        values.len(),
        capacity,
        &uncached,
        &cached,
        stats,
    ))
}

impl BenchReport {
    /// Build a report from a baseline run and a cached run of the same workload
    pub fn from_runs(
        size: usize,
        capacity: usize,
        uncached: &RunResult,
        cached: &RunResult,
        cache: StatsSnapshot,
    ) -> Self {
        let first_mismatch = first_divergence(uncached, cached);

        Self {
            size,
            operations: uncached.ranges + uncached.updates,
            ranges: uncached.ranges,
            updates: uncached.updates,
            capacity,
            uncached_secs: uncached.elapsed.as_secs_f64(),
            cached_secs: cached.elapsed.as_secs_f64(),
            speedup: speedup(uncached.elapsed, cached.elapsed),
            uncached_checksum: uncached.checksum,
            cached_checksum: cached.checksum,
            results_match: first_mismatch.is_none(),
            first_mismatch,
            cache,
        }
    }

    /// Fail if the cached run diverged from the baseline
    pub fn ensure_match(&self) -> Result<()> {
        if let Some(index) = self.first_mismatch {
            bail!(
                "cached results diverged from the uncached baseline at range query {}",
                index + 1
            );
        }
        Ok(())
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Workload:   {} ops ({} range, {} update) over {} elements",
            self.operations, self.ranges, self.updates, self.size
        )?;
        writeln!(f, "No cache:   {:.4} s", self.uncached_secs)?;
        match self.speedup {
            Some(speedup) => writeln!(
                f,
                "LRU cache:  {:.4} s  (speedup x{:.2})",
                self.cached_secs, speedup
            )?,
            None => writeln!(f, "LRU cache:  {:.4} s  (speedup unbounded)", self.cached_secs)?,
        }
        writeln!(
            f,
            "Cache:      capacity {}, hit ratio {:.1}%, {} evictions, {} invalidations",
            self.capacity,
            self.cache.hit_ratio * 100.0,
            self.cache.evictions,
            self.cache.invalidations
        )?;
        match self.first_mismatch {
            None => write!(f, "Results:    match"),
            Some(index) => write!(f, "Results:    MISMATCH at range query {}", index + 1),
        }
    }
}
