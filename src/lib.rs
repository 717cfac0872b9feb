//! coordsweep - coordination statistics and Monte Carlo sweep dispatch
//!
//! Two batch pipelines for a NaTiMn phosphate cluster-expansion workflow:
//!
//! - **Extraction**: read a table of relaxed configurations, classify the
//!   sites of every structure (Na split into Na1/Na2 by environment), and
//!   measure neighbor distances for a fixed set of species pairs. The result
//!   is one serialized dataset keyed by configuration name.
//! - **Sweep**: build a temperature × chemical-potential grid, partition it
//!   round-robin over workers, and run one Monte Carlo simulation per grid
//!   point and direction in its own job directory.
//!
//! # Architecture
//!
//! - **structure**: lattice, sites, POSCAR reader, periodic neighbor search
//! - **analysis**: species classification and neighbor queries
//! - **stats**: per-site and dataset-level coordination statistics
//! - **dataset**: configuration table and dataset assembly
//! - **coordinator / worker / engine**: sweep planning, job execution and
//!   simulation launch
//! - **output**: dataset files, sweep manifest, console summaries

pub mod analysis;
pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod engine;
pub mod output;
pub mod stats;
pub mod structure;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use dataset::Dataset;
pub use engine::JobRunner;
pub use structure::Structure;

/// Result type used throughout coordsweep
pub type Result<T> = anyhow::Result<T>;
