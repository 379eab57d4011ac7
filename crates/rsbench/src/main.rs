//! rsbench - compare cached and uncached range-sum workloads

mod runner;
mod workload;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rangestore::parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::runner::compare;
use crate::workload::{generate, seeded_values, Workload, WorkloadConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Array length
    #[arg(short = 'n', long, default_value_t = 20_000)]
    size: usize,

    /// Number of operations to generate
    #[arg(short, long, default_value_t = 5_000)]
    queries: usize,

    /// RNG seed for the array and the workload
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Cache capacity (number of intervals)
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Number of hot intervals
    #[arg(long, default_value_t = 30)]
    hot_pool: usize,

    /// Probability that a range query hits the hot pool
    #[arg(long, default_value_t = 0.95)]
    p_hot: f64,

    /// Probability that an operation is an update
    #[arg(long, default_value_t = 0.03)]
    p_update: f64,

    /// Replay operations from a trace file instead of generating them
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write the operations that were run to a trace file
    #[arg(long)]
    save_trace: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn workload_config(&self) -> WorkloadConfig {
        WorkloadConfig {
            size: self.size,
            queries: self.queries,
            seed: self.seed,
            hot_pool: self.hot_pool,
            p_hot: self.p_hot,
            p_update: self.p_update,
        }
    }
}

fn load_workload(args: &Args) -> Result<Workload> {
    let config = args.workload_config();

    match &args.trace {
        Some(path) => {
            config.validate()?;
            let operations = parser::read_operations(path)
                .with_context(|| format!("failed to read trace {}", path.display()))?;
            info!("Loaded {} operations from {}", operations.len(), path.display());

            Ok(Workload {
                values: seeded_values(args.size, args.seed),
                operations,
            })
        }
        None => generate(&config),
    }
}

/// `RUST_LOG`-style directives, falling back to `info` when unset or invalid
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting rsbench v{}", env!("CARGO_PKG_VERSION"));
    info!("Array size: {}", args.size);
    info!("Cache capacity: {}", args.capacity);

    let workload = load_workload(&args)?;
    if workload.operations.is_empty() {
        warn!("Workload is empty, timings will be zero");
    }

    if let Some(path) = &args.save_trace {
        parser::write_operations(path, &workload.operations)
            .with_context(|| format!("failed to write trace {}", path.display()))?;
        info!("Saved trace to {}", path.display());
    }

    let report = compare(&workload.values, &workload.operations, args.capacity)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    report.ensure_match()
}
