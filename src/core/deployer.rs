//! Platform operations used by the plugin commands
//!
//! Every operation delegates to a [`PlatformCli`]. Failures are passed to the
//! deployer's error handler; once the handler returns, the operation yields
//! an empty result.

use crate::core::platform::{PlatformCli, PlatformError};

/// Called with a short description of the failed operation and its cause
pub type ErrorHandler = Box<dyn Fn(&str, &PlatformError)>;

pub struct Deployer<P: PlatformCli> {
    cli: P,
    on_error: ErrorHandler,
}

impl<P: PlatformCli> Deployer<P> {
    pub fn new(cli: P, on_error: ErrorHandler) -> Self {
        Self { cli, on_error }
    }

    pub fn cli(&self) -> &P {
        &self.cli
    }

    /// Push an application, optionally from a manifest
    pub fn push_app(&self, app_name: &str, manifest_path: &str) {
        let mut args = vec!["push", app_name];
        if !manifest_path.is_empty() {
            args.extend(["-f", manifest_path]);
        }
        println!("Pushing {}", app_name);
        if let Err(e) = self.cli.run(&args) {
            (self.on_error)("Could not push new version", &e);
        }
    }

    /// Raw `cf env` output for an application
    pub fn get_env_vars(&self, app_name: &str) -> Vec<String> {
        self.cli.run_quiet(&["env", app_name]).unwrap_or_else(|e| {
            (self.on_error)("Could not get env vars", &e);
            Vec::new()
        })
    }

    /// A one-time ssh passcode
    pub fn get_ssh_code(&self) -> String {
        println!("Fetching ssh-code, command:\n  cf ssh-code");
        self.joined("Problem fetching an ssh-code", &["ssh-code"])
    }

    /// The guid of an application
    pub fn get_guid(&self, app_name: &str) -> String {
        println!("Fetching guid, command:\n  cf app {} --guid", app_name);
        self.joined("Problem fetching guid", &["app", app_name, "--guid"])
    }

    fn joined(&self, failure: &str, args: &[&str]) -> String {
        match self.cli.run_quiet(args) {
            Ok(lines) => lines.concat(),
            Err(e) => {
                (self.on_error)(failure, &e);
                String::new()
            }
        }
    }
}
