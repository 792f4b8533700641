//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, get_local_env::GetLocalEnvArgs, metadata::MetadataArgs,
    push_tunnel_app::PushTunnelAppArgs, start_tunnel::StartTunnelArgs,
};
use crate::core::version::PLUGIN_VERSION;

#[derive(Parser)]
#[command(name = "tunnel-boot")]
#[command(author, version = PLUGIN_VERSION, about = "Develop Spring Boot apps locally against a Cloud Foundry space")]
#[command(long_about = "A cf CLI plugin that pushes an ssh tunnel host application, copies its environment for local launches, and connects a local port to it through an ssh reverse tunnel.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (default: ~/.config/tunnel-boot/config.yaml)
    #[arg(long, global = true, env = "TUNNEL_BOOT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push an application to act as an ssh tunnel host
    #[command(visible_alias = "pta")]
    PushTunnelApp(PushTunnelAppArgs),

    /// Retrieve environment vars to specify for local app launching
    #[command(visible_alias = "gle")]
    GetLocalEnv(GetLocalEnvArgs),

    /// Create the ssh tunnel to connect a local port to the CF application
    #[command(visible_alias = "stun")]
    StartTunnel(StartTunnelArgs),

    /// Show plugin metadata (version, commands, options)
    Metadata(MetadataArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// Canonical name of the command, as used in help hints
    pub fn name(&self) -> &'static str {
        match self {
            Commands::PushTunnelApp(_) => "push-tunnel-app",
            Commands::GetLocalEnv(_) => "get-local-env",
            Commands::StartTunnel(_) => "start-tunnel",
            Commands::Metadata(_) => "metadata",
            Commands::Completions(_) => "completions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_alias_parses_to_command() {
        let cli = Cli::try_parse_from(["tunnel-boot", "stun", "myapp", "8080"]).unwrap();
        let command = cli.command.unwrap();
        assert_eq!(command.name(), "start-tunnel");
        match command {
            Commands::StartTunnel(args) => assert_eq!(args.args, vec!["myapp", "8080"]),
            _ => panic!("expected start-tunnel"),
        }
    }

    #[test]
    fn test_flags_mix_with_positionals() {
        let cli = Cli::try_parse_from([
            "tunnel-boot",
            "push-tunnel-app",
            "tunnel",
            "--services",
            "registry,config",
            "fortune-service",
        ])
        .unwrap();
        match cli.command.unwrap() {
            Commands::PushTunnelApp(args) => {
                assert_eq!(args.args, vec!["tunnel", "fortune-service"]);
                assert_eq!(args.services.as_deref(), Some("registry,config"));
            }
            _ => panic!("expected push-tunnel-app"),
        }
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::try_parse_from(["tunnel-boot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_verbose_after_command() {
        let cli = Cli::try_parse_from(["tunnel-boot", "gle", "myapp", "-v"]).unwrap();
        assert!(cli.global.verbose);
    }
}
