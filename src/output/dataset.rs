//! Dataset serialization
//!
//! The dataset is written as a single blob keyed by configuration name, in
//! bincode (default), MessagePack or JSON.

use crate::config::{DatasetFormat, OutputConfig};
use crate::dataset::Dataset;
use crate::Result;
use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write `dataset` to `output.path` in `output.format`
pub fn write_dataset(dataset: &Dataset, output: &OutputConfig) -> Result<()> {
    let path = &output.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create dataset file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match output.format {
        DatasetFormat::Bincode => bincode::serialize_into(&mut writer, dataset)
            .context("Failed to encode dataset as bincode")?,
        DatasetFormat::Msgpack => rmp_serde::encode::write_named(&mut writer, dataset)
            .context("Failed to encode dataset as MessagePack")?,
        DatasetFormat::Json => {
            let encoded = if output.pretty {
                serde_json::to_writer_pretty(&mut writer, dataset)
            } else {
                serde_json::to_writer(&mut writer, dataset)
            };
            encoded.context("Failed to encode dataset as JSON")?
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write dataset file: {}", path.display()))?;

    log::info!("Wrote {} entries to {} ({})", dataset.len(), path.display(), output.format);
    Ok(())
}

/// Read a dataset written by [`write_dataset`]
pub fn read_dataset(path: &Path, format: DatasetFormat) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let dataset = match format {
        DatasetFormat::Bincode => bincode::deserialize_from(reader).context("Failed to decode bincode dataset")?,
        DatasetFormat::Msgpack => rmp_serde::from_read(reader).context("Failed to decode MessagePack dataset")?,
        DatasetFormat::Json => serde_json::from_reader(reader).context("Failed to decode JSON dataset")?,
    };

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::dataset::{ConfigRow, ConfigurationEntry};
    use crate::structure::{Lattice, Structure};
    use tempfile::TempDir;

    fn sample_dataset() -> Dataset {
        let structure = Structure::from_fractional(
            Lattice::orthorhombic(6.0, 6.0, 6.0).unwrap(),
            vec![("Ti", [0.0, 0.0, 0.0]), ("O", [0.3, 0.0, 0.0]), ("Mn", [0.5, 0.5, 0.5])],
        );
        let row = ConfigRow {
            name: "SCEL1_1_1_1_0_0_0/0".to_string(),
            composition: 0.0,
            formation_energy: 0.0,
            supercell_size: 1.0,
        };
        std::iter::once(ConfigurationEntry::from_structure(&row, structure, &ExtractConfig::default())).collect()
    }

    #[test]
    fn test_write_and_read_each_format() {
        let temp_dir = TempDir::new().unwrap();
        let dataset = sample_dataset();

        for format in [DatasetFormat::Bincode, DatasetFormat::Msgpack, DatasetFormat::Json] {
            let output = OutputConfig {
                path: temp_dir.path().join(format!("data.{}", format)),
                format,
                ..Default::default()
            };
            write_dataset(&dataset, &output).unwrap();

            let back = read_dataset(&output.path, format).unwrap();
            assert_eq!(back.len(), 1);
            let entry = back.get("SCEL1_1_1_1_0_0_0/0").unwrap();
            assert_eq!(entry.bonds.len(), 9);
            assert_eq!(entry.bonds["Ti-Mn first_near_site"].sites[0].distances.len(), 1);
            assert_eq!(entry.bonds["Na1-O"].summary.global_mean, None);
        }
    }

    #[test]
    fn test_json_nulls_and_keys() {
        let temp_dir = TempDir::new().unwrap();
        let output = OutputConfig {
            path: temp_dir.path().join("nested/data.json"),
            format: DatasetFormat::Json,
            pretty: true,
            manifest: None,
        };
        write_dataset(&sample_dataset(), &output).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output.path).unwrap()).unwrap();
        let entry = &value["SCEL1_1_1_1_0_0_0/0"];
        assert_eq!(entry["formula_units"], 2);
        assert!(entry["bonds"]["Na2-O"]["summary"]["global_mean"].is_null());
        assert_eq!(entry["bonds"]["Ti-O"]["coordination"], "Ti - O");
    }
}
