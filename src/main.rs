use miette::{IntoDiagnostic, Result};
use tunnel_boot::cli::helpers::{fail_installation, parse_cli};
use tunnel_boot::cli::Commands;
use tunnel_boot::core::{parse_plugin_version, Config, PLUGIN_VERSION};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = parse_cli();
    tunnel_boot::logging::init(cli.global.verbose);

    let version = parse_plugin_version(PLUGIN_VERSION, fail_installation);

    let Some(command) = cli.command else {
        println!("This program is a plugin which expects to be installed into the cf CLI. It is not intended to be run stand-alone.");
        println!("Plugin version: {}", version);
        return Ok(());
    };

    tracing::debug!(command = command.name(), "dispatching");

    match command {
        Commands::Metadata(args) => tunnel_boot::cli::commands::metadata::run(args, version),
        Commands::Completions(args) => tunnel_boot::cli::commands::completions::run(args),
        Commands::PushTunnelApp(args) => {
            let config = Config::load(cli.global.config.as_deref()).into_diagnostic()?;
            tunnel_boot::cli::commands::push_tunnel_app::run(args, &config)
        }
        Commands::GetLocalEnv(args) => {
            let config = Config::load(cli.global.config.as_deref()).into_diagnostic()?;
            tunnel_boot::cli::commands::get_local_env::run(args, &config)
        }
        Commands::StartTunnel(args) => {
            let config = Config::load(cli.global.config.as_deref()).into_diagnostic()?;
            tunnel_boot::cli::commands::start_tunnel::run(args, &config)
        }
    }
}
