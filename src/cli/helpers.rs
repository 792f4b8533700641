//! Shared helper functions for CLI commands
//!
//! The failure handlers here end the process. They are handed to the core
//! components as callbacks so the components themselves never exit.

use clap::Parser;
use console::style;

use crate::cli::consumer::ArgConsumer;
use crate::cli::Cli;
use crate::core::config::Config;
use crate::core::deployer::Deployer;
use crate::core::platform::{CfCli, PlatformError};

/// Exit status for usage and runtime errors
pub const USAGE_EXIT_CODE: i32 = 1;

/// Exit status for a malformed build-time version
pub const BUILD_EXIT_CODE: i32 = 64;

/// Exit status when a running tunnel is interrupted
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Parse the command line, reporting usage errors with [`USAGE_EXIT_CODE`]
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(USAGE_EXIT_CODE);
        }
    }
}

/// Format a usage diagnostic with a pointer to the command's help
pub fn usage_message(message: &str, command: &str) -> String {
    format!("{} See 'tunnel-boot help {}'.", message, command)
}

/// Report a usage error and exit
pub fn diagnose_with_help(message: &str, command: &str) {
    eprintln!("{}", style(usage_message(message, command)).red());
    std::process::exit(USAGE_EXIT_CODE);
}

/// Report a malformed build-time version and exit
///
/// Uses a distinct status so a broken build can be told apart from misuse.
pub fn fail_installation(message: &str) {
    println!("{}", message);
    std::process::exit(BUILD_EXIT_CODE);
}

/// Report a failed platform command and exit
pub fn fatal_platform_error(message: &str, err: &PlatformError) {
    tracing::error!("{} - {}", message, err);
    std::process::exit(USAGE_EXIT_CODE);
}

/// Positional arguments of `command`, with the command name at index 0
pub fn positional_args(command: &str, args: &[String]) -> Vec<String> {
    std::iter::once(command.to_string())
        .chain(args.iter().cloned())
        .collect()
}

/// An argument consumer that reports usage errors and exits
pub fn arg_consumer(command: &str, args: &[String]) -> ArgConsumer<fn(&str, &str)> {
    ArgConsumer::new(
        positional_args(command, args),
        diagnose_with_help as fn(&str, &str),
    )
}

/// A deployer running the configured cf executable; platform failures are
/// fatal
pub fn deployer(config: &Config) -> Deployer<CfCli> {
    Deployer::new(
        CfCli::new(config.cf_command.clone()),
        Box::new(fatal_platform_error),
    )
}

/// Quote a value for use in a POSIX shell `NAME="value"` assignment
pub fn shell_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
