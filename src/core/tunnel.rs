//! SSH reverse tunnel into a pushed tunnel application
//!
//! The tunnel runs `ssh -N -R` against the platform's SSH endpoint, fed the
//! one-time passcode through `sshpass`. Output is shown as it arrives and
//! also captured, so it can be summarized once the tunnel closes.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use thiserror::Error;

use crate::core::process::{CapturedOutput, TeeReaders};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("sshpass not found in PATH")]
    SshpassNotFound,

    #[error("Failed to start tunnel command: {0}")]
    Start(#[source] std::io::Error),

    #[error("Tunnel command failed: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Failed to capture tunnel output: {0}")]
    Capture(#[source] std::io::Error),
}

/// Everything needed to describe one reverse tunnel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelSpec {
    pub guid: String,
    pub code: String,
    pub ssh_host: String,
    pub ssh_port: u16,
    pub remote_port: u16,
    pub local_port: String,
}

impl TunnelSpec {
    /// `cf:<guid>/0@<host>`, addressing instance 0 of the application
    pub fn destination(&self) -> String {
        format!("cf:{}/0@{}", self.guid, self.ssh_host)
    }

    /// Remote forward spec: the application's port back to the local one
    pub fn remote_forward(&self) -> String {
        format!("*:{}:localhost:{}", self.remote_port, self.local_port)
    }

    pub fn ssh_args(&self) -> Vec<String> {
        vec![
            "-N".to_string(),
            "-p".to_string(),
            self.ssh_port.to_string(),
            self.destination(),
            "-R".to_string(),
            self.remote_forward(),
        ]
    }

    pub fn sshpass_args(&self) -> Vec<String> {
        let mut args = vec!["-p".to_string(), self.code.clone(), "ssh".to_string()];
        args.extend(self.ssh_args());
        args
    }

    /// The ssh command a user can run by hand, typing the passcode
    pub fn manual_command(&self) -> String {
        format!("ssh {}", self.ssh_args().join(" "))
    }

    pub fn sshpass_command(&self) -> String {
        format!("sshpass {}", self.sshpass_args().join(" "))
    }
}

/// Locate `sshpass` on the PATH
pub fn find_sshpass() -> Result<PathBuf, TunnelError> {
    which::which("sshpass").map_err(|_| TunnelError::SshpassNotFound)
}

/// Requests cancellation of a running tunnel; safe to trigger from a signal
/// handler
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Sender<()>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // The receiver is gone once the tunnel has finished
        let _ = self.tx.send(());
    }
}

/// Receiving side of a [`CancelHandle`]
#[derive(Debug)]
pub struct CancelSignal {
    rx: Receiver<()>,
}

pub fn cancel_channel() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = mpsc::channel();
    (CancelHandle { tx }, CancelSignal { rx })
}

/// How the tunnel process ended
#[derive(Debug)]
pub enum TunnelExit {
    /// The process exited on its own
    Exited(CapturedOutput),
    /// The process was killed after a cancellation request
    Cancelled(CapturedOutput),
}

impl TunnelExit {
    pub fn output(&self) -> &CapturedOutput {
        match self {
            TunnelExit::Exited(output) | TunnelExit::Cancelled(output) => output,
        }
    }
}

/// A tunnel process ready to run
pub struct Tunnel {
    program: PathBuf,
    args: Vec<String>,
}

impl Tunnel {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// A tunnel run through the given `sshpass` executable
    pub fn sshpass(sshpass: impl Into<PathBuf>, spec: &TunnelSpec) -> Self {
        Self::new(sshpass, spec.sshpass_args())
    }

    /// Start the process and block until it exits or `cancel` fires
    ///
    /// Without a cancel signal the process is simply waited on.
    pub fn run(&self, cancel: Option<&CancelSignal>) -> Result<TunnelExit, TunnelError> {
        tracing::debug!(program = %self.program.display(), "starting tunnel process");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(TunnelError::Start)?;

        let readers = TeeReaders::attach(&mut child);

        let mut cancelled = false;
        let status = match cancel {
            None => child.wait().map_err(TunnelError::Wait)?,
            Some(signal) => loop {
                if let Some(status) = child.try_wait().map_err(TunnelError::Wait)? {
                    break status;
                }
                match signal.rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) => {
                        tracing::warn!("cancellation requested, stopping tunnel process");
                        cancelled = true;
                        // Already exited if kill fails; wait reaps it either way
                        let _ = child.kill();
                        break child.wait().map_err(TunnelError::Wait)?;
                    }
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => {
                        break child.wait().map_err(TunnelError::Wait)?;
                    }
                }
            },
        };

        let output = readers.finish(status).map_err(TunnelError::Capture)?;
        tracing::debug!(status = %output.status, cancelled, "tunnel process ended");

        if cancelled {
            Ok(TunnelExit::Cancelled(output))
        } else {
            Ok(TunnelExit::Exited(output))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TunnelSpec {
        TunnelSpec {
            guid: "1234-abcd".to_string(),
            code: "s3cr3t".to_string(),
            ssh_host: "ssh.run.pivotal.io".to_string(),
            ssh_port: 2222,
            remote_port: 8080,
            local_port: "9000".to_string(),
        }
    }

    #[test]
    fn test_ssh_args() {
        assert_eq!(
            spec().ssh_args(),
            vec![
                "-N",
                "-p",
                "2222",
                "cf:1234-abcd/0@ssh.run.pivotal.io",
                "-R",
                "*:8080:localhost:9000"
            ]
        );
    }

    #[test]
    fn test_manual_command() {
        assert_eq!(
            spec().manual_command(),
            "ssh -N -p 2222 cf:1234-abcd/0@ssh.run.pivotal.io -R *:8080:localhost:9000"
        );
    }

    #[test]
    fn test_sshpass_command() {
        assert_eq!(
            spec().sshpass_command(),
            "sshpass -p s3cr3t ssh -N -p 2222 cf:1234-abcd/0@ssh.run.pivotal.io -R *:8080:localhost:9000"
        );
        assert_eq!(spec().sshpass_args()[..3], ["-p", "s3cr3t", "ssh"]);
    }

    #[test]
    fn test_cancel_after_finish_is_harmless() {
        let (handle, signal) = cancel_channel();
        drop(signal);
        handle.cancel();
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_output() {
        let tunnel = Tunnel::new("sh", vec!["-c".into(), "echo up; echo warn >&2".into()]);
        let exit = tunnel.run(None).unwrap();

        assert!(matches!(exit, TunnelExit::Exited(_)));
        assert_eq!(exit.output().stdout_lossy(), "up\n");
        assert_eq!(exit.output().stderr_lossy(), "warn\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_unused_cancel_signal() {
        let (_handle, signal) = cancel_channel();
        let tunnel = Tunnel::new("sh", vec!["-c".into(), "echo done".into()]);
        let exit = tunnel.run(Some(&signal)).unwrap();

        assert!(matches!(exit, TunnelExit::Exited(_)));
        assert_eq!(exit.output().stdout_lossy(), "done\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_kills_process() {
        let (handle, signal) = cancel_channel();
        handle.cancel();

        let tunnel = Tunnel::new("sh", vec!["-c".into(), "exec sleep 30".into()]);
        let started = std::time::Instant::now();
        let exit = tunnel.run(Some(&signal)).unwrap();

        assert!(matches!(exit, TunnelExit::Cancelled(_)));
        assert!(!exit.output().status.success());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_program() {
        let tunnel = Tunnel::new("tunnel-boot-no-such-program", Vec::new());
        assert!(matches!(tunnel.run(None), Err(TunnelError::Start(_))));
    }
}
