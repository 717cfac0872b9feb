//! Configuration validation

use super::*;
use crate::dataset::NAME_PLACEHOLDER;
use anyhow::Result;
use std::collections::HashSet;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_extract(&config.extract)?;
    validate_sweep(&config.sweep)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate extraction configuration
pub fn validate_extract(extract: &ExtractConfig) -> Result<()> {
    if !extract.structure_pattern.contains(NAME_PLACEHOLDER) {
        anyhow::bail!(
            "structure_pattern must contain {}, got '{}'",
            NAME_PLACEHOLDER,
            extract.structure_pattern
        );
    }

    for (name, value) in [
        ("composition_scale", extract.composition_scale),
        ("energy_scale", extract.energy_scale),
        ("size_scale", extract.size_scale),
    ] {
        if !value.is_finite() {
            anyhow::bail!("{} must be finite, got {}", name, value);
        }
    }

    let radius = extract.classifier.split_radius;
    if !(radius.is_finite() && radius > 0.0) {
        anyhow::bail!("split_radius must be positive, got {}", radius);
    }

    validate_queries(&extract.queries)
}

/// Validate neighbor queries
pub fn validate_queries(queries: &[NeighborQuery]) -> Result<()> {
    if queries.is_empty() {
        anyhow::bail!("At least one neighbor query is required");
    }

    let mut labels = HashSet::new();
    for query in queries {
        if query.label.trim().is_empty() {
            anyhow::bail!("Query {} has an empty label", query.coordination());
        }
        if !labels.insert(query.label.as_str()) {
            anyhow::bail!("Duplicate query label: {}", query.label);
        }
        if query.k == 0 {
            anyhow::bail!("Query {}: k must be at least 1", query.label);
        }
        if !(query.radius.is_finite() && query.radius > 0.0) {
            anyhow::bail!("Query {}: radius must be positive, got {}", query.label, query.radius);
        }
        if !(query.min_distance >= 0.0) {
            anyhow::bail!(
                "Query {}: min_distance must be non-negative, got {}",
                query.label,
                query.min_distance
            );
        }
        if query.min_distance >= query.radius {
            anyhow::bail!(
                "Query {}: min_distance ({}) must be smaller than radius ({})",
                query.label,
                query.min_distance,
                query.radius
            );
        }
    }

    Ok(())
}

/// Validate sweep configuration
pub fn validate_sweep(sweep: &SweepConfig) -> Result<()> {
    validate_grid("temperature_grid", &sweep.temperature_grid)?;
    validate_grid("potential_grid", &sweep.potential_grid)?;

    if sweep.directions.is_empty() {
        anyhow::bail!("At least one sweep direction is required");
    }
    let mut seen = HashSet::new();
    for direction in &sweep.directions {
        if !seen.insert(*direction) {
            anyhow::bail!("Sweep direction {} listed twice", direction);
        }
    }

    if sweep.command.trim().is_empty() {
        anyhow::bail!("Simulation command must not be empty");
    }
    if sweep.input_file.trim().is_empty() {
        anyhow::bail!("input_file must not be empty");
    }

    if sweep.workers == Some(0) {
        anyhow::bail!("workers must be at least 1");
    }

    match (sweep.rank, sweep.world_size) {
        (Some(rank), Some(world_size)) => {
            if world_size == 0 {
                anyhow::bail!("world_size must be at least 1");
            }
            if rank >= world_size {
                anyhow::bail!("rank ({}) must be smaller than world_size ({})", rank, world_size);
            }
        }
        (None, None) => {}
        _ => anyhow::bail!("rank and world_size must be set together"),
    }

    Ok(())
}

/// Validate a sweep grid
pub fn validate_grid(name: &str, grid: &Grid) -> Result<()> {
    if !(grid.min.is_finite() && grid.max.is_finite() && grid.step.is_finite()) {
        anyhow::bail!("{} must have finite bounds, got {}", name, grid);
    }
    if grid.step <= 0.0 {
        anyhow::bail!("{} step must be positive, got {}", name, grid.step);
    }
    if grid.max <= grid.min {
        anyhow::bail!("{} max ({}) must be greater than min ({})", name, grid.max, grid.min);
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.path.as_os_str().is_empty() {
        anyhow::bail!("Output path must not be empty");
    }
    if output.pretty && output.format != DatasetFormat::Json {
        log::warn!("pretty only applies to JSON output, ignored for {}", output.format);
    }

    Ok(())
}
