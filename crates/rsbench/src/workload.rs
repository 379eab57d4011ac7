//! Synthetic workload generation
//!
//! A small pool of wide "hot" intervals receives most of the range queries,
//! with occasional point updates mixed in.

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rangestore::Operation;

/// Smallest and largest generated array value
const VALUE_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Parameters of a generated workload
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Array length
    pub size: usize,
    /// Number of operations
    pub queries: usize,
    /// RNG seed
    pub seed: u64,
    /// Number of hot intervals
    pub hot_pool: usize,
    /// Probability that a range query uses a hot interval
    pub p_hot: f64,
    /// Probability that an operation is an update
    pub p_update: f64,
}

impl WorkloadConfig {
    /// Check parameters before generating anything
    pub fn validate(&self) -> Result<()> {
        ensure!(self.size > 0, "array size must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.p_hot),
            "p_hot must be within [0, 1], got {}",
            self.p_hot
        );
        ensure!(
            (0.0..=1.0).contains(&self.p_update),
            "p_update must be within [0, 1], got {}",
            self.p_update
        );
        Ok(())
    }
}

/// Generated array and operation stream
#[derive(Debug, Clone)]
pub struct Workload {
    /// Initial array contents
    pub values: Vec<i64>,
    /// Operations to replay
    pub operations: Vec<Operation>,
}

/// Generate a workload; the same config always yields the same workload
pub fn generate(config: &WorkloadConfig) -> Result<Workload> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let values = random_values(&mut rng, config.size);
    let operations = make_operations(&mut rng, config);

    Ok(Workload { values, operations })
}

/// Array of `size` uniform values from a fresh RNG seeded with `seed`
pub fn seeded_values(size: usize, seed: u64) -> Vec<i64> {
    random_values(&mut StdRng::seed_from_u64(seed), size)
}

fn random_values<R: Rng>(rng: &mut R, size: usize) -> Vec<i64> {
    (0..size).map(|_| rng.gen_range(VALUE_RANGE)).collect()
}

fn make_operations<R: Rng>(rng: &mut R, config: &WorkloadConfig) -> Vec<Operation> {
    let n = config.size;
    let mid = n / 2;

    let hot: Vec<(usize, usize)> = (0..config.hot_pool)
        .map(|_| (rng.gen_range(0..=mid), rng.gen_range(mid..n)))
        .collect();

    let mut operations = Vec::with_capacity(config.queries);
    for _ in 0..config.queries {
        if rng.gen_bool(config.p_update) {
            operations.push(Operation::Update {
                index: rng.gen_range(0..n),
                value: rng.gen_range(VALUE_RANGE),
            });
            continue;
        }

        let hot_pick = if rng.gen_bool(config.p_hot) {
            hot.choose(rng).copied()
        } else {
            None
        };

        let (left, right) = match hot_pick {
            Some(interval) => interval,
            None => {
                let left = rng.gen_range(0..n);
                (left, rng.gen_range(left..n))
            }
        };
        operations.push(Operation::Range { left, right });
    }
    operations
}
