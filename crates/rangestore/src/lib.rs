//! # rangestore
//!
//! Mutable integer array answering range-sum queries.
//!
//! ## Components
//! - **Engine**: linear-scan range sums over a slice
//! - **ArrayStore**: bounds-checked owner of the array, the uncached baseline
//! - **Operations**: workload steps and a text trace format parsed with nom

#![warn(missing_docs)]

pub mod engine;
mod error;
mod interval;
mod operation;
pub mod parser;
mod query;
mod storage;

pub use error::{Error, Result};
pub use interval::Interval;
pub use operation::Operation;
pub use query::RangeQuery;
pub use storage::ArrayStore;
