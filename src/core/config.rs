//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CF_COMMAND: &str = "cf";
pub const DEFAULT_SSH_HOST: &str = "ssh.run.pivotal.io";
pub const DEFAULT_SSH_PORT: u16 = 2222;
pub const DEFAULT_REMOTE_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

/// Values as they appear in a config file; anything unset falls through to
/// the next layer
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    cf_command: Option<String>,
    ssh_host: Option<String>,
    ssh_port: Option<u16>,
    remote_port: Option<u16>,
    tunnel_app_path: Option<PathBuf>,
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Executable used for platform commands
    pub cf_command: String,

    /// SSH endpoint of the platform
    pub ssh_host: String,

    /// Port of the platform's SSH endpoint
    pub ssh_port: u16,

    /// Port inside the tunnel application that forwards to the developer's
    /// machine
    pub remote_port: u16,

    /// Location of the packaged tunnel application
    pub tunnel_app_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cf_command: DEFAULT_CF_COMMAND.to_string(),
            ssh_host: DEFAULT_SSH_HOST.to_string(),
            ssh_port: DEFAULT_SSH_PORT,
            remote_port: DEFAULT_REMOTE_PORT,
            tunnel_app_path: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Built-in defaults
        let mut config = Config::default();

        // 2. Global user config (~/.config/tunnel-boot/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::read_file(&global_path)?);
            }
        }

        // 3. File named on the command line
        if let Some(path) = explicit {
            config.merge(Self::read_file(path)?);
        }

        // 4. Environment variables
        config.apply_env(|var| std::env::var(var).ok())?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tunnel-boot")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Merge a config file into this one (file values take precedence)
    fn merge(&mut self, other: ConfigFile) {
        if let Some(cf_command) = other.cf_command {
            self.cf_command = cf_command;
        }
        if let Some(ssh_host) = other.ssh_host {
            self.ssh_host = ssh_host;
        }
        if let Some(ssh_port) = other.ssh_port {
            self.ssh_port = ssh_port;
        }
        if let Some(remote_port) = other.remote_port {
            self.remote_port = remote_port;
        }
        if other.tunnel_app_path.is_some() {
            self.tunnel_app_path = other.tunnel_app_path;
        }
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cf_command) = lookup("TUNNEL_BOOT_CF_COMMAND") {
            self.cf_command = cf_command;
        }
        if let Some(ssh_host) = lookup("TUNNEL_BOOT_SSH_HOST") {
            self.ssh_host = ssh_host;
        }
        if let Some(port) = lookup("TUNNEL_BOOT_SSH_PORT") {
            self.ssh_port = parse_port("TUNNEL_BOOT_SSH_PORT", &port)?;
        }
        if let Some(port) = lookup("TUNNEL_BOOT_REMOTE_PORT") {
            self.remote_port = parse_port("TUNNEL_BOOT_REMOTE_PORT", &port)?;
        }
        if let Some(path) = lookup("TUNNEL_BOOT_APP_PATH") {
            self.tunnel_app_path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}
