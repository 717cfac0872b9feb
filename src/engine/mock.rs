//! Recording runner for testing
//!
//! [`RecordingRunner`] launches nothing. It remembers every directory it was
//! asked to run in, together with the input file it found there, and returns
//! a configurable exit code. Clones share the same record, so a test can
//! hand one clone to the sweep and inspect the other afterwards.
//!
//! # Example
//!
//! ```
//! use coordsweep::engine::{JobRunner, mock::RecordingRunner};
//! use std::path::Path;
//!
//! let runner = RecordingRunner::new("input.json");
//! runner.run(Path::new("xi_up.3")).unwrap();
//!
//! assert_eq!(runner.run_count(), 1);
//! assert!(runner.runs()[0].input.is_none());
//! ```

use super::{JobRunner, RunStatus};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub dir: PathBuf,
    /// Parsed input file, if one was present when the job ran
    pub input: Option<serde_json::Value>,
}

/// Runner that records invocations instead of launching a process
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    input_file: String,
    exit_code: Arc<Mutex<i32>>,
    should_fail: Arc<Mutex<bool>>,
    runs: Arc<Mutex<Vec<RunRecord>>>,
}

impl RecordingRunner {
    pub fn new(input_file: impl Into<String>) -> Self {
        Self {
            input_file: input_file.into(),
            exit_code: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Exit code reported for every run
    pub fn set_exit_code(&self, code: i32) {
        *self.exit_code.lock().unwrap() = code;
    }

    /// Make every launch fail
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// All recorded invocations, in call order
    pub fn runs(&self) -> Vec<RunRecord> {
        self.runs.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

impl JobRunner for RecordingRunner {
    fn run(&self, dir: &Path) -> Result<RunStatus> {
        if *self.should_fail.lock().unwrap() {
            anyhow::bail!("Mock launch failure in {}", dir.display());
        }

        let input = fs::read_to_string(dir.join(&self.input_file))
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok());

        self.runs.lock().unwrap().push(RunRecord {
            dir: dir.to_path_buf(),
            input,
        });

        Ok(RunStatus::exited(*self.exit_code.lock().unwrap()))
    }

    fn describe(&self) -> String {
        "recording runner".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_input_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("input.json"), r#"{"driver": {"mode": "incremental"}}"#).unwrap();

        let runner = RecordingRunner::new("input.json");
        let observer = runner.clone();
        runner.run(temp_dir.path()).unwrap();

        let runs = observer.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].dir, temp_dir.path());
        assert_eq!(runs[0].input.as_ref().unwrap()["driver"]["mode"], "incremental");
    }

    #[test]
    fn test_exit_code_and_failure() {
        let runner = RecordingRunner::new("input.json");
        runner.set_exit_code(2);
        assert_eq!(runner.run(Path::new("a")).unwrap().code, Some(2));

        runner.set_should_fail(true);
        assert!(runner.run(Path::new("b")).is_err());
        assert_eq!(runner.run_count(), 1);
    }
}
