//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Extract neighbor-coordination statistics from relaxed structures
    Extract,
    /// Dispatch a temperature / chemical-potential Monte Carlo sweep
    Sweep,
}

/// Dataset output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Bincode,
    Msgpack,
    Json,
}

/// Sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    TUp,
    TDown,
    XiUp,
    XiDown,
}

/// Handling of existing job directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExistingArg {
    Skip,
    Fail,
    Overwrite,
}

/// coordsweep - coordination statistics and Monte Carlo sweep dispatch
#[derive(Parser, Debug)]
#[command(name = "coordsweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Execution mode: extract or sweep
    #[arg(long, value_enum, default_value = "extract")]
    pub mode: ExecutionMode,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Validate and print the configuration without touching any files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    // === Extraction Options ===
    /// Whitespace-delimited configuration table
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Structure file path template, `{name}` is replaced by the configuration name
    #[arg(long)]
    pub structure_pattern: Option<String>,

    /// Radius of the Na1/Na2 environment test (Å)
    #[arg(long)]
    pub split_radius: Option<f64>,

    /// Dataset output file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Dataset output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    // === Sweep Options ===
    /// Temperature grid as min:max:step (max is exclusive)
    #[arg(long)]
    pub temperature_grid: Option<String>,

    /// Chemical potential grid as min:max:step (max is exclusive)
    #[arg(long, allow_hyphen_values = true)]
    pub potential_grid: Option<String>,

    /// Base Monte Carlo job template (JSON)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory in which job directories are created
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Simulation command line, run inside every job directory
    /// (whitespace-separated, no quoting; use `args` in the config file for
    /// arguments with spaces)
    #[arg(long)]
    pub command: Option<String>,

    /// Sweep directions to submit, in order (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub directions: Option<Vec<DirectionArg>>,

    /// Number of worker threads
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Rank of this process under a parallel launcher
    #[arg(long, env = "OMPI_COMM_WORLD_RANK")]
    pub rank: Option<usize>,

    /// Number of processes under a parallel launcher
    #[arg(long, env = "OMPI_COMM_WORLD_SIZE")]
    pub world_size: Option<usize>,

    /// Prepare job directories and inputs without starting the simulation
    #[arg(long)]
    pub no_launch: bool,

    /// What to do with job directories that already exist
    #[arg(long, value_enum)]
    pub existing: Option<ExistingArg>,

    /// Write a JSON manifest of all sweep jobs
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate flag combinations that clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rank.is_some() != self.world_size.is_some() {
            anyhow::bail!("--rank and --world-size must be given together");
        }
        if self.rank.is_some() && self.workers.is_some() {
            anyhow::bail!("--workers cannot be combined with --rank/--world-size");
        }
        if self.workers == Some(0) {
            anyhow::bail!("--workers must be at least 1");
        }
        Ok(())
    }
}
