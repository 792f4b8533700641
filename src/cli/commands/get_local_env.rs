//! `tunnel-boot get-local-env` command - Copy an application's environment
//! for local launches

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{arg_consumer, deployer, shell_quote};
use crate::core::config::Config;
use crate::core::env_vars::{extract_env_vars, EnvVars};
use crate::core::template::{LaunchConfigContext, TemplateGenerator};

const COMMAND: &str = "get-local-env";

#[derive(clap::Args, Debug)]
pub struct GetLocalEnvArgs {
    /// APP_NAME
    #[arg(value_name = "APP_NAME")]
    pub args: Vec<String>,

    /// Produce a .launch file suitable for eclipse
    #[arg(long, alias = "celc")]
    pub create_eclipse_launch_config: bool,

    /// For eclipse config creation, the eclipse project name
    #[arg(long, value_name = "IDE_PROJECT_NAME")]
    pub project: Option<String>,

    /// For eclipse config creation, the application main class
    #[arg(long, value_name = "FQ_APP_CLASS_NAME")]
    pub application_main: Option<String>,

    /// For eclipse config creation, the local port number being tunneled to
    #[arg(long, value_name = "NNNN")]
    pub port: Option<u16>,

    /// For eclipse config creation, directory in which to create the .launch file
    #[arg(long, value_name = "FOLDER")]
    pub target_dir: Option<PathBuf>,
}

pub fn run(args: GetLocalEnvArgs, config: &Config) -> Result<()> {
    let mut consumer = arg_consumer(COMMAND, &args.args);
    let app_name = consumer.consume(1, "application name");
    consumer.check_all_consumed();

    let lines = deployer(config).get_env_vars(&app_name);
    let vars = extract_env_vars(&lines);
    tracing::debug!(count = vars.len(), "extracted environment variables");

    if args.create_eclipse_launch_config {
        let ctx = LaunchConfigContext {
            project_name: args.project.unwrap_or_default(),
            main_class: args.application_main.unwrap_or_default(),
            port: args.port.map(|p| p.to_string()).unwrap_or_default(),
            env_vars: vars,
        };
        produce_launch_config(&ctx, args.target_dir)
    } else {
        print!("{}", format_vars(&vars));
        Ok(())
    }
}

/// Listing of the variables, once as IDE entries and once as shell
/// assignments
pub fn format_vars(vars: &EnvVars) -> String {
    let mut out = String::from("Variables for use in your IDE:\n");
    for (name, value) in vars {
        out.push_str(&format!("{}={}\n", name, value));
    }
    out.push_str("Variables for use on the command line:\n");
    for (name, value) in vars {
        out.push_str(&format!("{}={}\n", name, shell_quote(value)));
    }
    out
}

fn produce_launch_config(ctx: &LaunchConfigContext, target_dir: Option<PathBuf>) -> Result<()> {
    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let xml = generator
        .render_launch_config(ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    match target_dir {
        Some(dir) => {
            let path = dir.join(ctx.file_name());
            std::fs::write(&path, xml).into_diagnostic()?;
            println!(
                "{} Created launch configuration {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", xml),
    }
    Ok(())
}
