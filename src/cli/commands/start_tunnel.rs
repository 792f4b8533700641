//! `tunnel-boot start-tunnel` command - Connect a local port to the tunnel
//! application

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{arg_consumer, deployer, INTERRUPTED_EXIT_CODE};
use crate::core::config::Config;
use crate::core::process::CapturedOutput;
use crate::core::tunnel::{cancel_channel, find_sshpass, Tunnel, TunnelExit, TunnelSpec};

const COMMAND: &str = "start-tunnel";

#[derive(clap::Args, Debug)]
pub struct StartTunnelArgs {
    /// CF_APP_NAME LOCAL_PORT
    #[arg(value_name = "CF_APP_NAME LOCAL_PORT")]
    pub args: Vec<String>,
}

pub fn run(args: StartTunnelArgs, config: &Config) -> Result<()> {
    let mut consumer = arg_consumer(COMMAND, &args.args);
    let app_name = consumer.consume(1, "application name");
    let local_port = consumer.consume(2, "local port");
    consumer.check_all_consumed();

    let deployer = deployer(config);
    let code = deployer.get_ssh_code();
    let guid = deployer.get_guid(&app_name);

    println!("The guid for the app is {}", guid);
    println!("The one time ssh code is {}", code);

    let spec = TunnelSpec {
        guid,
        code,
        ssh_host: config.ssh_host.clone(),
        ssh_port: config.ssh_port,
        remote_port: config.remote_port,
        local_port,
    };

    let sshpass = match find_sshpass() {
        Ok(path) => path,
        Err(e) => {
            println!("Unable to find sshpass, please install it and re-run or execute the following ssh command manually to start the tunnel");
            println!("  {}", spec.manual_command());
            println!("(supply the ssh code printed above, or create a new one via: cf ssh-code)");
            return Err(miette::miette!("{}", e));
        }
    };

    let (cancel, signal) = cancel_channel();
    ctrlc::set_handler(move || cancel.cancel()).into_diagnostic()?;

    println!(
        "Connecting tunnel, command:\n  {}",
        style(spec.sshpass_command()).yellow()
    );
    let exit = Tunnel::sshpass(sshpass, &spec)
        .run(Some(&signal))
        .map_err(|e| miette::miette!("{}", e))?;

    match exit {
        TunnelExit::Exited(output) => {
            if !output.status.success() {
                return Err(miette::miette!("Tunnel command failed with {}", output.status));
            }
            print!("{}", summary(&output));
            Ok(())
        }
        TunnelExit::Cancelled(output) => {
            print!("{}", summary(&output));
            eprintln!("{} Tunnel closed on interrupt", style("!").yellow());
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

/// Everything the tunnel printed, by stream
fn summary(output: &CapturedOutput) -> String {
    format!(
        "\nout:\n{}\nerr:\n{}\n",
        output.stdout_lossy(),
        output.stderr_lossy()
    )
}
