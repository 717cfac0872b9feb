//! Configuration dataset assembly
//!
//! Turns the configuration table into one [`ConfigurationEntry`] per row:
//! scalar fields with their linear transforms, the relaxed structure, and one
//! [`CoordinationRecord`] per configured neighbor query.
//!
//! Loading is all-or-nothing. A missing or malformed structure aborts the
//! whole batch and no partial dataset is returned.

pub mod table;

pub use table::{read_table, ConfigRow, TableColumns};

use crate::analysis::{Analyzer, CoordinationRecord};
use crate::config::ExtractConfig;
use crate::structure::Structure;
use crate::Result;
use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Placeholder replaced by the configuration name in structure paths
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Analysis result for one named configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub name: String,
    /// Composition, scaled
    pub composition: f64,
    /// Formation energy, scaled
    pub formation_energy: f64,
    /// Number of formula units in the supercell
    pub formula_units: i64,
    pub structure: Structure,
    /// Coordination records keyed by query label
    pub bonds: BTreeMap<String, CoordinationRecord>,
}

impl ConfigurationEntry {
    /// Build an entry from a table row and an already loaded structure
    pub fn from_structure(row: &ConfigRow, structure: Structure, config: &ExtractConfig) -> Self {
        let analyzer = Analyzer::new(structure, &config.classifier);

        let bonds = config
            .queries
            .iter()
            .map(|query| (query.label.clone(), analyzer.query(query)))
            .collect();

        Self {
            name: row.name.clone(),
            composition: row.composition * config.composition_scale,
            formation_energy: row.formation_energy * config.energy_scale,
            formula_units: (row.supercell_size * config.size_scale).trunc() as i64,
            structure: analyzer.into_structure(),
            bonds,
        }
    }
}

/// All configuration entries keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub entries: BTreeMap<String, ConfigurationEntry>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ConfigurationEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigurationEntry> {
        self.entries.values()
    }
}

impl FromIterator<ConfigurationEntry> for Dataset {
    fn from_iter<I: IntoIterator<Item = ConfigurationEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }
}

/// Resolve the structure file of configuration `name`
pub fn structure_path(pattern: &str, name: &str) -> PathBuf {
    PathBuf::from(pattern.replace(NAME_PLACEHOLDER, name))
}

/// Load and analyze one configuration
pub fn build_entry(row: &ConfigRow, config: &ExtractConfig) -> Result<ConfigurationEntry> {
    let path = structure_path(&config.structure_pattern, &row.name);
    let structure = Structure::from_file(&path)
        .with_context(|| format!("Failed to load structure for '{}'", row.name))?;

    log::debug!("Loaded {} ({} sites) from {}", row.name, structure.len(), path.display());

    let entry = ConfigurationEntry::from_structure(row, structure, config);
    log::info!(
        "Analyzed {}: {} ({} records)",
        entry.name,
        entry.structure.formula(),
        entry.bonds.len()
    );
    Ok(entry)
}

/// Analyze every row of the table
///
/// Rows are processed in parallel; the first failure aborts the batch.
pub fn build_dataset(rows: &[ConfigRow], config: &ExtractConfig) -> Result<Dataset> {
    let mut seen = HashSet::new();
    for row in rows {
        if !seen.insert(row.name.as_str()) {
            anyhow::bail!("Duplicate configuration name in table: {}", row.name);
        }
    }

    let entries = rows
        .par_iter()
        .map(|row| build_entry(row, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(entries.into_iter().collect())
}

/// Read the table named in `config` and analyze every configuration
pub fn load_dataset(config: &ExtractConfig) -> Result<Dataset> {
    let rows = read_table(&config.table, &config.columns)?;
    log::info!("Read {} configurations from {}", rows.len(), config.table.display());

    build_dataset(&rows, config)
}
