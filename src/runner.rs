//! External process execution.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::RunError;

/// Runs external CLI commands.
///
/// Every call blocks until the child exits; there is no timeout.
pub trait Runner {
    /// Returns true if `<tool> <probe_args>` starts and exits successfully.
    fn is_installed(&self, tool: &str, probe_args: &[&str]) -> bool;

    /// Runs with stdin/stdout/stderr inherited from this process.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), RunError>;

    /// Runs with output discarded, only the exit status matters.
    fn run(&self, program: &str, args: &[&str]) -> Result<(), RunError>;

    /// Runs and returns captured stdout.
    fn output(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, RunError>;
}

/// [`Runner`] backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn spawn_error(program: &str, source: std::io::Error) -> RunError {
        RunError::Spawn {
            program: program.to_string(),
            source,
        }
    }
}

impl Runner for SystemRunner {
    fn is_installed(&self, tool: &str, probe_args: &[&str]) -> bool {
        debug!("probing {} {}", tool, probe_args.join(" "));
        Command::new(tool)
            .args(probe_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), RunError> {
        debug!("running {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| Self::spawn_error(program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::exit(program, status.code(), b""))
        }
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<(), RunError> {
        debug!("running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RunError::exit(program, output.status.code(), &output.stderr))
        }
    }

    fn output(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, RunError> {
        debug!("capturing {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(program, e))?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(RunError::exit(program, output.status.code(), &output.stderr))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_not_installed() {
        assert!(!SystemRunner.is_installed("gswitch-definitely-not-a-real-tool", &["version"]));
    }

    #[test]
    fn test_probe_args_decide_success() {
        assert!(SystemRunner.is_installed("sh", &["-c", "exit 0"]));
        assert!(!SystemRunner.is_installed("sh", &["-c", "exit 1"]));
    }

    #[test]
    fn test_output_captures_stdout() {
        let out = SystemRunner
            .output("sh", &["-c", "printf '[]'"])
            .expect("sh should run");
        assert_eq!(out, b"[]");
    }

    #[test]
    fn test_run_reports_exit_code_and_stderr() {
        let err = SystemRunner
            .run("sh", &["-c", "echo denied >&2; exit 3"])
            .unwrap_err();
        match err {
            RunError::Exit { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "denied");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_spawn_failure() {
        let err = SystemRunner
            .run("gswitch-definitely-not-a-real-tool", &[])
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}
