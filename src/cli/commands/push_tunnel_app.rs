//! `tunnel-boot push-tunnel-app` command - Push the ssh tunnel host application

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::helpers::{arg_consumer, deployer};
use crate::core::config::Config;
use crate::core::template::{ManifestContext, TemplateGenerator};

const COMMAND: &str = "push-tunnel-app";
const STAGED_APP_NAME: &str = "tunnelapp.jar";

#[derive(clap::Args, Debug)]
pub struct PushTunnelAppArgs {
    /// CF_APP_NAME SPRING_APP_NAME
    #[arg(value_name = "CF_APP_NAME SPRING_APP_NAME")]
    pub args: Vec<String>,

    /// Comma separated list of services to bind to
    #[arg(long, short = 's')]
    pub services: Option<String>,

    /// Tunnel application jar to push (default: tunnel_app_path from config)
    #[arg(long, value_name = "JAR")]
    pub app_path: Option<PathBuf>,
}

pub fn run(args: PushTunnelAppArgs, config: &Config) -> Result<()> {
    let mut consumer = arg_consumer(COMMAND, &args.args);
    let cf_app_name = consumer.consume(1, "application name");
    let spring_app_name = consumer.consume(2, "spring application name");
    consumer.check_all_consumed();

    let source = args
        .app_path
        .clone()
        .or_else(|| config.tunnel_app_path.clone())
        .ok_or_else(|| {
            miette::miette!(
                help = "Pass --app-path, set TUNNEL_BOOT_APP_PATH, or set tunnel_app_path in the config file",
                "No tunnel application jar configured"
            )
        })?;

    println!(
        "Pushing tunnel hosting application: {}",
        style(&cf_app_name).cyan()
    );

    // Removed once the push has finished
    let temp_dir = tempfile::Builder::new()
        .prefix("tunnel-boot")
        .tempdir()
        .into_diagnostic()?;

    let app_path = stage_tunnel_app(&source, temp_dir.path())?;
    let manifest = ManifestContext::new(
        cf_app_name.as_str(),
        spring_app_name.as_str(),
        app_path.to_string_lossy(),
    )
    .with_services(args.services.as_deref().unwrap_or_default());
    let manifest_path = write_manifest(&manifest, temp_dir.path())?;

    deployer(config).push_app(&cf_app_name, &manifest_path.to_string_lossy());
    Ok(())
}

/// Copy the tunnel application next to the manifest that refers to it
fn stage_tunnel_app(source: &Path, dir: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(miette::miette!(
            "Tunnel application not found: {}",
            source.display()
        ));
    }
    let staged = dir.join(STAGED_APP_NAME);
    std::fs::copy(source, &staged).into_diagnostic()?;
    println!("Unpacked tunnel application to {}", staged.display());
    Ok(staged)
}

fn write_manifest(manifest: &ManifestContext, dir: &Path) -> Result<PathBuf> {
    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let contents = generator
        .render_manifest(manifest)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "Manifest to be used for deployment of tunnel application:\n{}",
        contents
    );
    let path = dir.join("manifest.yml");
    std::fs::write(&path, contents).into_diagnostic()?;
    tracing::debug!(path = %path.display(), "wrote manifest");
    Ok(path)
}
