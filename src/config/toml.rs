//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{convert_direction, convert_existing, convert_format, parse_grid, split_command};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Extraction settings
    if let Some(ref table) = cli.table {
        config.extract.table = table.clone();
    }
    if let Some(ref pattern) = cli.structure_pattern {
        config.extract.structure_pattern = pattern.clone();
    }
    if let Some(radius) = cli.split_radius {
        config.extract.classifier.split_radius = radius;
    }

    // Sweep settings
    if let Some(ref grid) = cli.temperature_grid {
        config.sweep.temperature_grid = parse_grid(grid)?;
    }
    if let Some(ref grid) = cli.potential_grid {
        config.sweep.potential_grid = parse_grid(grid)?;
    }
    if let Some(ref template) = cli.template {
        config.sweep.template = template.clone();
    }
    if let Some(ref root) = cli.root {
        config.sweep.root = root.clone();
    }
    if let Some(ref command) = cli.command {
        let (command, args) = split_command(command)?;
        config.sweep.command = command;
        config.sweep.args = args;
    }
    if let Some(ref directions) = cli.directions {
        config.sweep.directions = directions.iter().copied().map(convert_direction).collect();
    }
    if let Some(workers) = cli.workers {
        config.sweep.workers = Some(workers);
    }
    if cli.rank.is_some() || cli.world_size.is_some() {
        config.sweep.rank = cli.rank;
        config.sweep.world_size = cli.world_size;
    }
    if let Some(existing) = cli.existing {
        config.sweep.existing = convert_existing(existing);
    }

    // Output settings
    if let Some(ref path) = cli.output {
        config.output.path = path.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = convert_format(format);
    }
    if cli.pretty {
        config.output.pretty = true;
    }
    if let Some(ref path) = cli.manifest {
        config.output.manifest = Some(path.clone());
    }

    Ok(config)
}
