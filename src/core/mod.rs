//! Core module - platform operations, parsing, and rendering

pub mod config;
pub mod deployer;
pub mod env_vars;
pub mod metadata;
pub mod platform;
pub mod process;
pub mod template;
pub mod tunnel;
pub mod version;

pub use config::{Config, ConfigError};
pub use deployer::{Deployer, ErrorHandler};
pub use env_vars::{extract_env_vars, EnvVars};
pub use metadata::{CommandInfo, PluginMetadata};
pub use platform::{CfCli, PlatformCli, PlatformError};
pub use template::{LaunchConfigContext, ManifestContext, TemplateError, TemplateGenerator};
pub use tunnel::{Tunnel, TunnelError, TunnelExit, TunnelSpec};
pub use version::{parse_plugin_version, PluginVersion, PLUGIN_VERSION};
