//! Sweep worker
//!
//! A [`Worker`] executes its share of the sweep strictly in order, one job
//! at a time: prepare the job directory, write the input document, run the
//! simulation inside the directory and wait for it. Workers share nothing
//! mutable; job directories are unique by construction.
//!
//! Simulation failures never stop a worker. They are recorded in the
//! returned [`JobOutcome`]s. Only I/O errors while preparing a job, or an
//! existing directory under [`ExistingJobPolicy::Fail`], abort the worker.

pub mod job;

pub use job::{build_job_config, default_driver, load_template, Conditions, JobConditions, SweepJob};

use crate::config::{Direction, ExistingJobPolicy};
use crate::engine::JobRunner;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Settings shared by all workers of a sweep
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Base job template
    pub template: Value,
    /// Directory the job directories are created in
    pub root: PathBuf,
    /// Name of the input file written into every job directory
    pub input_file: String,
    pub existing: ExistingJobPolicy,
}

/// How a job ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// The simulation ran; `exit_code` is `None` when it was killed by a signal
    Completed { exit_code: Option<i32> },
    /// The directory already existed and was left alone
    Skipped,
    /// The simulation could not be started
    LaunchFailed { message: String },
}

/// Result of one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub rank: usize,
    pub direction: Direction,
    pub index: usize,
    pub dir: PathBuf,
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobOutcome {
    /// True when the simulation ran and exited with code 0
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Completed { exit_code: Some(0) }
    }
}

/// Executes a sequence of jobs
#[derive(Debug, Clone, Copy)]
pub struct Worker<'a> {
    rank: usize,
    settings: &'a JobSettings,
}

impl<'a> Worker<'a> {
    pub fn new(rank: usize, settings: &'a JobSettings) -> Self {
        Self { rank, settings }
    }

    /// Run every job in order
    pub fn run(&self, jobs: &[SweepJob], runner: &dyn JobRunner) -> Result<Vec<JobOutcome>> {
        log::debug!("rank {}: {} jobs assigned", self.rank, jobs.len());

        jobs.iter().map(|job| self.run_job(job, runner)).collect()
    }

    /// Prepare and run a single job
    pub fn run_job(&self, job: &SweepJob, runner: &dyn JobRunner) -> Result<JobOutcome> {
        let dir = self.settings.root.join(job.dir_name());
        let outcome = |status: JobStatus| JobOutcome {
            rank: self.rank,
            direction: job.direction,
            index: job.index,
            dir: dir.clone(),
            status,
        };

        if dir.exists() {
            match self.settings.existing {
                ExistingJobPolicy::Skip => {
                    log::info!("rank {}: {} exists, skipping", self.rank, dir.display());
                    return Ok(outcome(JobStatus::Skipped));
                }
                ExistingJobPolicy::Fail => {
                    anyhow::bail!("Job directory already exists: {}", dir.display());
                }
                ExistingJobPolicy::Overwrite => {
                    log::warn!(
                        "rank {}: {} exists, overwriting {}",
                        self.rank,
                        dir.display(),
                        self.settings.input_file
                    );
                }
            }
        } else {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create job directory: {}", dir.display()))?;
        }

        let config = build_job_config(&self.settings.template, job);
        let input_path = dir.join(&self.settings.input_file);
        let contents = serde_json::to_string_pretty(&config)
            .context("Failed to serialize job input")?;
        fs::write(&input_path, contents)
            .with_context(|| format!("Failed to write job input: {}", input_path.display()))?;

        log::info!("rank {}: WORKING {} index {}", self.rank, dir.display(), job.index);

        let status = match runner.run(&dir) {
            Ok(status) => {
                if !status.success() {
                    log::warn!(
                        "rank {}: simulation in {} exited with {:?}",
                        self.rank,
                        dir.display(),
                        status.code
                    );
                }
                JobStatus::Completed { exit_code: status.code }
            }
            Err(e) => {
                log::warn!("rank {}: {:#}", self.rank, e);
                JobStatus::LaunchFailed {
                    message: format!("{:#}", e),
                }
            }
        };

        Ok(outcome(status))
    }
}
