//! JSON sweep manifest
//!
//! Records where and when a sweep ran and the outcome of every job, so a
//! partially failed sweep can be inspected and resubmitted.

use crate::config::SweepConfig;
use crate::coordinator::SweepReport;
use crate::worker::JobOutcome;
use crate::Result;
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Job counts by outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCounts {
    pub total: usize,
    pub succeeded: usize,
    pub nonzero_exit: usize,
    pub skipped: usize,
    pub launch_failed: usize,
}

/// Complete sweep manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepManifest {
    pub hostname: Option<String>,
    /// RFC 3339 timestamp of manifest creation
    pub generated_at: String,
    pub command: String,
    pub workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub elapsed_secs: f64,
    pub counts: ManifestCounts,
    pub jobs: Vec<JobOutcome>,
}

impl SweepManifest {
    pub fn new(sweep: &SweepConfig, report: &SweepReport) -> Self {
        Self {
            hostname: get_hostname(),
            generated_at: Utc::now().to_rfc3339(),
            command: sweep.command_line(),
            workers: sweep.effective_workers(),
            rank: sweep.rank,
            elapsed_secs: report.elapsed.as_secs_f64(),
            counts: ManifestCounts {
                total: report.total(),
                succeeded: report.succeeded(),
                nonzero_exit: report.nonzero_exits(),
                skipped: report.skipped(),
                launch_failed: report.launch_failures(),
            },
            jobs: report.outcomes.clone(),
        }
    }
}

fn get_hostname() -> Option<String> {
    hostname::get().ok().and_then(|h| h.into_string().ok())
}

/// Manifest path for one rank of a multi-process sweep
///
/// `sweep.json` becomes `sweep.rank3.json`; threaded runs keep the path as given.
pub fn manifest_path(path: &Path, rank: Option<usize>) -> PathBuf {
    let Some(rank) = rank else {
        return path.to_path_buf();
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.rank{}.{}", stem, rank, ext.to_string_lossy()),
        None => format!("{}.rank{}", stem, rank),
    };
    path.with_file_name(name)
}

/// Write the manifest as pretty-printed JSON
pub fn write_manifest(path: &Path, manifest: &SweepManifest) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create manifest: {}", path.display()))?;

    serde_json::to_writer_pretty(BufWriter::new(file), manifest)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

    log::info!("Wrote sweep manifest to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Direction;
    use crate::worker::JobStatus;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn outcome(index: usize, status: JobStatus) -> JobOutcome {
        JobOutcome {
            rank: 0,
            direction: Direction::TUp,
            index,
            dir: PathBuf::from(format!("T_up.{}", index)),
            status,
        }
    }

    #[test]
    fn test_manifest_counts() {
        let report = SweepReport {
            outcomes: vec![
                outcome(0, JobStatus::Completed { exit_code: Some(0) }),
                outcome(1, JobStatus::Completed { exit_code: Some(2) }),
                outcome(2, JobStatus::Skipped),
                outcome(3, JobStatus::LaunchFailed {
                    message: "not found".to_string(),
                }),
            ],
            elapsed: Duration::from_millis(1500),
        };
        let sweep = SweepConfig {
            workers: Some(2),
            ..Default::default()
        };

        let manifest = SweepManifest::new(&sweep, &report);
        assert_eq!(
            manifest.counts,
            ManifestCounts {
                total: 4,
                succeeded: 1,
                nonzero_exit: 1,
                skipped: 1,
                launch_failed: 1,
            }
        );
        assert_eq!(manifest.workers, 2);
        assert_eq!(manifest.elapsed_secs, 1.5);
        assert_eq!(manifest.command, "casm monte -s input.json --verbosity quiet");
    }

    #[test]
    fn test_write_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sweep.json");
        let report = SweepReport {
            outcomes: vec![outcome(7, JobStatus::Skipped)],
            elapsed: Duration::from_secs(1),
        };

        write_manifest(&path, &SweepManifest::new(&SweepConfig::default(), &report)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["jobs"][0]["dir"], "T_up.7");
        assert_eq!(value["jobs"][0]["status"], "skipped");
        assert!(value.get("rank").is_none());
        assert!(value["generated_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_manifest_path_per_rank() {
        let path = Path::new("/scratch/sweep.json");
        assert_eq!(manifest_path(path, None), PathBuf::from("/scratch/sweep.json"));
        assert_eq!(manifest_path(path, Some(3)), PathBuf::from("/scratch/sweep.rank3.json"));
        assert_eq!(manifest_path(Path::new("manifest"), Some(0)), PathBuf::from("manifest.rank0"));
    }
}
