//! Whitespace-delimited configuration table
//!
//! The first non-empty line is the header. Columns are looked up by name, so
//! extra columns and column order do not matter. Lines starting with `#` are
//! comments.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names of the columns the loader reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumns {
    pub name: String,
    pub composition: String,
    pub energy: String,
    pub size: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            name: "configname".to_string(),
            composition: "comp(a)".to_string(),
            energy: "formation_energy".to_string(),
            size: "scel_size".to_string(),
        }
    }
}

/// One row of the configuration table
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRow {
    pub name: String,
    pub composition: f64,
    pub formation_energy: f64,
    pub supercell_size: f64,
}

/// Read the configuration table from a file
pub fn read_table(path: &Path, columns: &TableColumns) -> Result<Vec<ConfigRow>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration table: {}", path.display()))?;

    parse_table(&contents, columns)
        .with_context(|| format!("Failed to parse configuration table: {}", path.display()))
}

/// Parse table contents
pub fn parse_table(contents: &str, columns: &TableColumns) -> Result<Vec<ConfigRow>> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("Configuration table is empty"))?;
    let header: Vec<&str> = header.split_whitespace().collect();

    let column = |name: &str| -> Result<usize> {
        header
            .iter()
            .position(|h| *h == name)
            .ok_or_else(|| anyhow::anyhow!("Missing column '{}' (found: {})", name, header.join(", ")))
    };
    let name_col = column(&columns.name)?;
    let composition_col = column(&columns.composition)?;
    let energy_col = column(&columns.energy)?;
    let size_col = column(&columns.size)?;

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < header.len() {
            anyhow::bail!(
                "Line {}: expected {} columns, found {}",
                line_no,
                header.len(),
                fields.len()
            );
        }

        let number = |col: usize| -> Result<f64> {
            fields[col].parse::<f64>().with_context(|| {
                format!("Line {}: invalid number '{}' in column '{}'", line_no, fields[col], header[col])
            })
        };

        rows.push(ConfigRow {
            name: fields[name_col].to_string(),
            composition: number(composition_col)?,
            formation_energy: number(energy_col)?,
            supercell_size: number(size_col)?,
        });
    }

    Ok(rows)
}
