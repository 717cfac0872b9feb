//! CLI to Config conversion utilities

use crate::config::cli;
use crate::config::{DatasetFormat, Direction, ExistingJobPolicy, Grid};
use anyhow::{Context, Result};

/// Parse a grid string (e.g., "200:841:20" or "-1.5,2.501,0.05")
pub fn parse_grid(s: &str) -> Result<Grid> {
    let s = s.trim();
    let parts: Vec<&str> = s.split([':', ',']).map(str::trim).collect();
    if parts.len() != 3 {
        anyhow::bail!("Invalid grid format: {} (expected min:max:step)", s);
    }

    let number = |part: &str| -> Result<f64> {
        part.parse::<f64>()
            .with_context(|| format!("Invalid grid value '{}' in {}", part, s))
    };

    Ok(Grid::new(number(parts[0])?, number(parts[1])?, number(parts[2])?))
}

/// Split a command line into the executable and its arguments
///
/// Words are separated by whitespace only; there is no shell quoting.
/// Arguments containing spaces go in the `args` list of the `[sweep]` TOML
/// section instead, and quoted input is rejected rather than split wrongly.
pub fn split_command(s: &str) -> Result<(String, Vec<String>)> {
    if s.contains(['"', '\'']) {
        anyhow::bail!(
            "Quoted simulation command '{}' is not supported; set `command` and `args` in the config file",
            s
        );
    }

    let mut words = s.split_whitespace().map(str::to_string);
    let command = words
        .next()
        .ok_or_else(|| anyhow::anyhow!("Simulation command is empty"))?;
    Ok((command, words.collect()))
}

/// Convert CLI FormatArg to DatasetFormat
pub fn convert_format(cli_format: cli::FormatArg) -> DatasetFormat {
    match cli_format {
        cli::FormatArg::Bincode => DatasetFormat::Bincode,
        cli::FormatArg::Msgpack => DatasetFormat::Msgpack,
        cli::FormatArg::Json => DatasetFormat::Json,
    }
}

/// Convert CLI DirectionArg to Direction
pub fn convert_direction(cli_direction: cli::DirectionArg) -> Direction {
    match cli_direction {
        cli::DirectionArg::TUp => Direction::TUp,
        cli::DirectionArg::TDown => Direction::TDown,
        cli::DirectionArg::XiUp => Direction::XiUp,
        cli::DirectionArg::XiDown => Direction::XiDown,
    }
}

/// Convert CLI ExistingArg to ExistingJobPolicy
pub fn convert_existing(cli_existing: cli::ExistingArg) -> ExistingJobPolicy {
    match cli_existing {
        cli::ExistingArg::Skip => ExistingJobPolicy::Skip,
        cli::ExistingArg::Fail => ExistingJobPolicy::Fail,
        cli::ExistingArg::Overwrite => ExistingJobPolicy::Overwrite,
    }
}
