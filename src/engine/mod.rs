//! Simulation launch abstraction
//!
//! A [`JobRunner`] starts the external Monte Carlo simulation for one prepared
//! job directory and blocks until it exits. Workers are agnostic to how the
//! simulation is launched, which lets the sweep run against the real
//! executable ([`command::CommandRunner`]), do nothing at all
//! ([`NoopRunner`], used by dry runs), or record invocations
//! ([`mock::RecordingRunner`], used by tests).
//!
//! # Example
//!
//! ```no_run
//! use coordsweep::engine::{JobRunner, command::CommandRunner};
//! use std::path::Path;
//!
//! let runner = CommandRunner::new("casm", vec!["monte".into(), "-s".into(), "input.json".into()]);
//! let status = runner.run(Path::new("T_up.0"))?;
//! println!("exit code: {:?}", status.code);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod command;
pub mod mock;

use crate::Result;
use std::path::Path;

/// Launcher for the external simulation
///
/// Runners are shared by reference between worker threads, so they must be
/// `Send + Sync`. A runner never changes the process-wide working directory;
/// the job directory is passed explicitly.
pub trait JobRunner: Send + Sync {
    /// Run the simulation inside `dir` and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns an error only when the simulation could not be started. A
    /// simulation that starts and then fails is reported through
    /// [`RunStatus`].
    fn run(&self, dir: &Path) -> Result<RunStatus>;

    /// Short description for logs and summaries
    fn describe(&self) -> String;
}

/// How a simulation process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runner that launches nothing and reports success
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunner;

impl JobRunner for NoopRunner {
    fn run(&self, _dir: &Path) -> Result<RunStatus> {
        Ok(RunStatus::exited(0))
    }

    fn describe(&self) -> String {
        "no-op (dry run)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status() {
        assert!(RunStatus::exited(0).success());
        assert!(!RunStatus::exited(3).success());
        assert!(!RunStatus { code: None }.success());
    }

    #[test]
    fn test_noop_runner() {
        let runner = NoopRunner;
        let status = runner.run(Path::new("does-not-exist")).unwrap();
        assert!(status.success());
    }
}
