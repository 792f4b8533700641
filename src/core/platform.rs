//! Cloud Foundry CLI wrapper
//!
//! Shells out to `cf` for every platform operation. All user input is passed
//! through std::process::Command args, never through a shell.

use std::process::{Command, Stdio};
use thiserror::Error;

use crate::core::process::{output_lines, TeeReaders};

/// Errors that can occur while running platform commands
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{cli} not found. Install the Cloud Foundry CLI from https://github.com/cloudfoundry/cli")]
    CliNotFound { cli: String },

    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The two ways of running a platform command
///
/// Both return the command's standard output split into lines.
pub trait PlatformCli {
    /// Run a command, echoing its output to the terminal
    fn run(&self, args: &[&str]) -> Result<Vec<String>, PlatformError>;

    /// Run a command without any terminal output
    fn run_quiet(&self, args: &[&str]) -> Result<Vec<String>, PlatformError>;
}

/// Runs commands through the `cf` executable
pub struct CfCli {
    program: String,
}

impl CfCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Format a command for display
    pub fn format_command(&self, args: &[&str]) -> String {
        if args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, args.join(" "))
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!(command = %self.format_command(args), "running platform command");
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn map_spawn_error(&self, e: std::io::Error) -> PlatformError {
        if e.kind() == std::io::ErrorKind::NotFound {
            PlatformError::CliNotFound {
                cli: self.program.clone(),
            }
        } else {
            PlatformError::IoError(e)
        }
    }
}

impl Default for CfCli {
    fn default() -> Self {
        Self::new("cf")
    }
}

impl PlatformCli for CfCli {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, PlatformError> {
        let mut child = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let readers = TeeReaders::attach(&mut child);
        let status = child.wait()?;
        let output = readers.finish(status)?;

        if output.status.success() {
            Ok(output_lines(&output.stdout))
        } else {
            Err(PlatformError::CommandFailed {
                message: format!("'{}' exited with {}", self.format_command(args), output.status),
            })
        }
    }

    fn run_quiet(&self, args: &[&str]) -> Result<Vec<String>, PlatformError> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.map_spawn_error(e))?;

        if output.status.success() {
            Ok(output_lines(&output.stdout))
        } else {
            // cf reports most failures on stdout after a FAILED line
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            Err(PlatformError::CommandFailed { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command() {
        let cli = CfCli::default();
        assert_eq!(cli.format_command(&["app", "demo", "--guid"]), "cf app demo --guid");
        assert_eq!(cli.format_command(&[]), "cf");
    }

    #[test]
    fn test_missing_cli_is_reported() {
        let cli = CfCli::new("tunnel-boot-no-such-cf-binary");
        let result = cli.run_quiet(&["env", "demo"]);
        assert!(matches!(result, Err(PlatformError::CliNotFound { .. })));

        let result = cli.run(&["push", "demo"]);
        assert!(matches!(result, Err(PlatformError::CliNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_quiet_returns_lines() {
        let cli = CfCli::new("sh");
        let lines = cli.run_quiet(&["-c", "echo first; echo second"]).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_quiet_failure_uses_stderr() {
        let cli = CfCli::new("sh");
        let err = cli.run_quiet(&["-c", "echo boom >&2; exit 3"]).unwrap_err();
        match err {
            PlatformError::CommandFailed { message } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_quiet_failure_falls_back_to_stdout() {
        let cli = CfCli::new("sh");
        let err = cli.run_quiet(&["-c", "echo FAILED; exit 1"]).unwrap_err();
        assert!(err.to_string().contains("FAILED"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_streams_and_captures() {
        let cli = CfCli::new("sh");
        let lines = cli.run(&["-c", "echo pushed"]).unwrap();
        assert_eq!(lines, vec!["pushed"]);

        let err = cli.run(&["-c", "exit 2"]).unwrap_err();
        assert!(matches!(err, PlatformError::CommandFailed { .. }));
    }
}
