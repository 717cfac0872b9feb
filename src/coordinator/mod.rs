//! Sweep coordinator
//!
//! Builds the sweep plan, hands every worker its assignment once and
//! collects the job outcomes.
//!
//! # Partitioning
//!
//! Both grids and their index sequences are split round-robin: element `i`
//! goes to worker `i % W`. Values and indices are partitioned the same way,
//! so each worker's local values stay aligned with their global indices and
//! job directory names never collide across workers.
//!
//! # Execution
//!
//! In thread mode the coordinator spawns `W` scoped worker threads, sends
//! each one its [`WorkerAssignment`] over a one-shot channel and joins them.
//! Under a parallel launcher every process builds the identical plan and runs
//! only the assignment of its own rank.

use crate::config::{Direction, Grid, SweepConfig, SweptDimension};
use crate::engine::JobRunner;
use crate::worker::{JobOutcome, JobSettings, JobStatus, SweepJob, Worker};
use crate::Result;
use anyhow::Context;
use crossbeam::channel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Split `seq` round-robin into `workers` sub-sequences
///
/// Element `i` lands in sub-sequence `i % workers`, preserving order within
/// each sub-sequence. `workers` is clamped to at least 1.
///
/// ```
/// use coordsweep::coordinator::partition;
///
/// let parts = partition(&[0, 1, 2, 3, 4], 2);
/// assert_eq!(parts, vec![vec![0, 2, 4], vec![1, 3]]);
/// ```
pub fn partition<T: Clone>(seq: &[T], workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1);
    let mut parts = vec![Vec::with_capacity(seq.len() / workers + 1); workers];
    for (i, item) in seq.iter().enumerate() {
        parts[i % workers].push(item.clone());
    }
    parts
}

/// Everything one worker needs to run its share of the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    pub rank: usize,
    pub directions: Vec<Direction>,
    pub temperature_grid: Grid,
    pub potential_grid: Grid,
    /// `(global index, value)` pairs of this worker's temperatures
    pub temperatures: Vec<(usize, f64)>,
    /// `(global index, value)` pairs of this worker's chemical potentials
    pub potentials: Vec<(usize, f64)>,
}

impl WorkerAssignment {
    /// Jobs in execution order: directions in configured order, then values
    /// in partition order
    pub fn jobs(&self) -> Vec<SweepJob> {
        let mut jobs = Vec::new();
        for &direction in &self.directions {
            // a temperature sweep holds the chemical potential and vice versa
            let (held, grid) = match direction.swept() {
                SweptDimension::Temperature => (&self.potentials, self.temperature_grid),
                SweptDimension::ChemicalPotential => (&self.temperatures, self.potential_grid),
            };
            jobs.extend(held.iter().map(|&(index, value)| SweepJob {
                direction,
                index,
                held: value,
                grid,
            }));
        }
        jobs
    }
}

/// Deterministic plan of the whole sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub assignments: Vec<WorkerAssignment>,
}

impl SweepPlan {
    /// Build the plan for `sweep` across its effective worker count
    pub fn new(sweep: &SweepConfig) -> Result<Self> {
        Self::with_workers(sweep, sweep.effective_workers())
    }

    /// Build the plan for an explicit worker count
    pub fn with_workers(sweep: &SweepConfig, workers: usize) -> Result<Self> {
        let workers = workers.max(1);

        let split = |grid: &Grid| -> Vec<Vec<(usize, f64)>> {
            let values = grid.values();
            let indices: Vec<usize> = (0..values.len()).collect();
            partition(&indices, workers)
                .into_iter()
                .zip(partition(&values, workers))
                .map(|(idx, vals)| idx.into_iter().zip(vals).collect())
                .collect()
        };
        let temperatures = split(&sweep.temperature_grid);
        let potentials = split(&sweep.potential_grid);

        let assignments = temperatures
            .into_iter()
            .zip(potentials)
            .enumerate()
            .map(|(rank, (temperatures, potentials))| WorkerAssignment {
                rank,
                directions: sweep.directions.clone(),
                temperature_grid: sweep.temperature_grid,
                potential_grid: sweep.potential_grid,
                temperatures,
                potentials,
            })
            .collect();

        let plan = Self { assignments };
        plan.check_unique_dirs()?;
        Ok(plan)
    }

    pub fn num_workers(&self) -> usize {
        self.assignments.len()
    }

    pub fn num_jobs(&self) -> usize {
        self.assignments.iter().map(|a| a.jobs().len()).sum()
    }

    pub fn assignment(&self, rank: usize) -> Option<&WorkerAssignment> {
        self.assignments.get(rank)
    }

    /// Every job of the sweep, rank by rank
    pub fn all_jobs(&self) -> Vec<(usize, SweepJob)> {
        self.assignments
            .iter()
            .flat_map(|a| a.jobs().into_iter().map(move |job| (a.rank, job)))
            .collect()
    }

    fn check_unique_dirs(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (rank, job) in self.all_jobs() {
            let name = job.dir_name();
            if !seen.insert(name.clone()) {
                anyhow::bail!("Job directory {} planned twice (rank {})", name, rank);
            }
        }
        Ok(())
    }
}

/// Outcomes of a finished sweep
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub outcomes: Vec<JobOutcome>,
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Jobs whose simulation exited with code 0
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Skipped))
    }

    /// Jobs whose simulation ran but did not exit with code 0
    pub fn nonzero_exits(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Completed { exit_code } if *exit_code != Some(0)))
    }

    pub fn launch_failures(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::LaunchFailed { .. }))
    }

    fn count(&self, pred: impl Fn(&JobStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Runs a sweep plan
pub struct SweepCoordinator<'a> {
    plan: SweepPlan,
    settings: JobSettings,
    runner: &'a dyn JobRunner,
}

impl<'a> SweepCoordinator<'a> {
    pub fn new(plan: SweepPlan, settings: JobSettings, runner: &'a dyn JobRunner) -> Self {
        Self { plan, settings, runner }
    }

    /// Run every assignment on its own worker thread
    pub fn run(&self) -> Result<SweepReport> {
        let start = Instant::now();
        log::info!(
            "Dispatching {} jobs to {} workers ({})",
            self.plan.num_jobs(),
            self.plan.num_workers(),
            self.runner.describe()
        );

        let outcomes = std::thread::scope(|scope| -> Result<Vec<JobOutcome>> {
            let mut senders = Vec::with_capacity(self.plan.num_workers());
            let mut handles = Vec::with_capacity(self.plan.num_workers());

            for rank in 0..self.plan.num_workers() {
                let (tx, rx) = channel::bounded::<WorkerAssignment>(1);
                let worker = Worker::new(rank, &self.settings);
                let runner = self.runner;

                handles.push(scope.spawn(move || -> Result<Vec<JobOutcome>> {
                    let assignment = rx
                        .recv()
                        .with_context(|| format!("rank {}: no assignment received", rank))?;
                    worker.run(&assignment.jobs(), runner)
                }));
                senders.push(tx);
            }

            // one-shot scatter; dropping the senders closes every channel
            for (tx, assignment) in senders.into_iter().zip(self.plan.assignments.iter().cloned()) {
                let rank = assignment.rank;
                tx.send(assignment)
                    .map_err(|_| anyhow::anyhow!("rank {} exited before receiving its assignment", rank))?;
            }

            let mut outcomes = Vec::new();
            for handle in handles {
                let worker_outcomes = handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("Worker thread panicked"))??;
                outcomes.extend(worker_outcomes);
            }
            Ok(outcomes)
        })?;

        Ok(SweepReport {
            outcomes,
            elapsed: start.elapsed(),
        })
    }

    /// Run only the assignment of `rank` on the calling thread
    pub fn run_rank(&self, rank: usize) -> Result<SweepReport> {
        let start = Instant::now();
        let assignment = self.plan.assignment(rank).ok_or_else(|| {
            anyhow::anyhow!("rank {} out of range for {} workers", rank, self.plan.num_workers())
        })?;

        let jobs = assignment.jobs();
        log::info!("rank {}: running {} jobs ({})", rank, jobs.len(), self.runner.describe());

        let outcomes = Worker::new(rank, &self.settings).run(&jobs, self.runner)?;
        Ok(SweepReport {
            outcomes,
            elapsed: start.elapsed(),
        })
    }
}
