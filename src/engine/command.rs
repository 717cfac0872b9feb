//! External process runner

use super::{JobRunner, RunStatus};
use crate::Result;
use anyhow::Context;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs a fixed command line with the job directory as working directory
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl JobRunner for CommandRunner {
    fn run(&self, dir: &Path) -> Result<RunStatus> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("Failed to launch '{}' in {}", self.program, dir.display()))?;

        Ok(RunStatus { code: status.code() })
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_runs_in_job_directory() {
        let temp_dir = TempDir::new().unwrap();
        let runner = CommandRunner::new("sh", vec!["-c".into(), "pwd > where.txt".into()]);

        let status = runner.run(temp_dir.path()).unwrap();
        assert!(status.success());

        let written = fs::read_to_string(temp_dir.path().join("where.txt")).unwrap();
        let expected = temp_dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(written.trim()).canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_nonzero_exit_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let runner = CommandRunner::new("sh", vec!["-c".into(), "exit 7".into()]);

        let status = runner.run(temp_dir.path()).unwrap();
        assert_eq!(status.code, Some(7));
    }

    #[test]
    fn test_missing_program_fails_to_launch() {
        let temp_dir = TempDir::new().unwrap();
        let runner = CommandRunner::new("coordsweep-no-such-program", Vec::new());

        assert!(runner.run(temp_dir.path()).is_err());
    }

    #[test]
    fn test_describe() {
        let runner = CommandRunner::new("casm", vec!["monte".into(), "--verbosity".into(), "quiet".into()]);
        assert_eq!(runner.describe(), "casm monte --verbosity quiet");
    }
}
