//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! Every section has defaults matching the standard NaTiMn(PO4) workflow, so
//! a run needs no configuration file at all.

pub mod cli;
pub mod cli_convert;
pub mod sweep;
pub mod toml;
pub mod validator;

pub use sweep::{Direction, ExistingJobPolicy, Grid, SweptDimension};

use crate::analysis::{ClassifierConfig, NeighborQuery};
use crate::dataset::TableColumns;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Coordination extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Whitespace-delimited configuration table
    #[serde(default = "default_table")]
    pub table: PathBuf,
    /// Column names in the table
    #[serde(default)]
    pub columns: TableColumns,
    /// Structure file path with a `{name}` placeholder
    #[serde(default = "default_structure_pattern")]
    pub structure_pattern: String,
    /// Factor applied to the composition column
    #[serde(default = "default_composition_scale")]
    pub composition_scale: f64,
    /// Factor applied to the formation energy column
    #[serde(default = "default_energy_scale")]
    pub energy_scale: f64,
    /// Factor applied to the supercell size before truncation
    #[serde(default = "default_size_scale")]
    pub size_scale: f64,
    /// Na1/Na2 split parameters
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Neighbor queries, one coordination record each
    #[serde(default = "NeighborQuery::default_set")]
    pub queries: Vec<NeighborQuery>,
}

fn default_table() -> PathBuf {
    PathBuf::from("configs.csv")
}

fn default_structure_pattern() -> String {
    "../training_data/{name}/calctype.default/run.final/CONTCAR".to_string()
}

fn default_composition_scale() -> f64 {
    1.5
}

fn default_energy_scale() -> f64 {
    0.5
}

fn default_size_scale() -> f64 {
    2.0
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            columns: TableColumns::default(),
            structure_pattern: default_structure_pattern(),
            composition_scale: default_composition_scale(),
            energy_scale: default_energy_scale(),
            size_scale: default_size_scale(),
            classifier: ClassifierConfig::default(),
            queries: NeighborQuery::default_set(),
        }
    }
}

/// Monte Carlo sweep settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_temperature_grid")]
    pub temperature_grid: Grid,
    #[serde(default = "default_potential_grid")]
    pub potential_grid: Grid,
    /// Base job template (JSON)
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Name of the input file written into every job directory
    #[serde(default = "default_input_file")]
    pub input_file: String,
    /// Directory the job directories are created in
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Simulation executable
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments passed to the executable
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Directions to submit, in order
    #[serde(default = "default_directions")]
    pub directions: Vec<Direction>,
    /// Worker threads (defaults to the number of CPUs)
    pub workers: Option<usize>,
    /// Rank of this process when started by a parallel launcher
    pub rank: Option<usize>,
    /// Number of launcher processes
    pub world_size: Option<usize>,
    /// Handling of job directories that already exist
    #[serde(default)]
    pub existing: ExistingJobPolicy,
}

fn default_temperature_grid() -> Grid {
    Grid::new(200.0, 841.0, 20.0)
}

fn default_potential_grid() -> Grid {
    Grid::new(-1.5, 2.501, 0.05)
}

fn default_template() -> PathBuf {
    PathBuf::from("metropolis_grand_canonical.json")
}

fn default_input_file() -> String {
    "input.json".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_command() -> String {
    "casm".to_string()
}

fn default_args() -> Vec<String> {
    ["monte", "-s", "input.json", "--verbosity", "quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_directions() -> Vec<Direction> {
    vec![Direction::XiDown, Direction::XiUp, Direction::TUp, Direction::TDown]
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            temperature_grid: default_temperature_grid(),
            potential_grid: default_potential_grid(),
            template: default_template(),
            input_file: default_input_file(),
            root: default_root(),
            command: default_command(),
            args: default_args(),
            directions: default_directions(),
            workers: None,
            rank: None,
            world_size: None,
            existing: ExistingJobPolicy::default(),
        }
    }
}

impl SweepConfig {
    /// Worker count used to partition the grids
    pub fn effective_workers(&self) -> usize {
        self.world_size
            .or(self.workers)
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    /// The full command line, for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Serialization format of the dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    #[default]
    Bincode,
    Msgpack,
    Json,
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFormat::Bincode => write!(f, "bincode"),
            DatasetFormat::Msgpack => write!(f, "msgpack"),
            DatasetFormat::Json => write!(f, "json"),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Dataset file written by the extractor
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub format: DatasetFormat,
    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
    /// Sweep manifest (JSON) written after all jobs finished
    pub manifest: Option<PathBuf>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data.bin")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: DatasetFormat::default(),
            pretty: false,
            manifest: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_config() {
        let sweep = SweepConfig::default();

        assert_eq!(sweep.temperature_grid.len(), 33);
        assert_eq!(sweep.directions.len(), 4);
        assert_eq!(sweep.command_line(), "casm monte -s input.json --verbosity quiet");
        assert!(sweep.effective_workers() >= 1);
    }

    #[test]
    fn test_world_size_overrides_workers() {
        let sweep = SweepConfig {
            workers: Some(8),
            world_size: Some(3),
            ..Default::default()
        };
        assert_eq!(sweep.effective_workers(), 3);
    }

    #[test]
    fn test_default_extract_config() {
        let extract = ExtractConfig::default();

        assert_eq!(extract.queries.len(), 9);
        assert!(extract.structure_pattern.contains("{name}"));
        assert_eq!(extract.classifier.split_radius, 3.2);
    }
}
