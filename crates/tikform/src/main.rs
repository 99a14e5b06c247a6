mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands manage the file themselves
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "tikform", &mut std::io::stdout());
            Ok(())
        }

        Command::Schema(args) => commands::schema::handle(args, &cli.global),

        // Local commands read the manifest or state but never the router
        Command::Validate => {
            let cfg = config::load_config_or_default();
            commands::validate::handle(&cli.global, &cfg)
        }
        Command::State(args) => {
            let cfg = config::load_config_or_default();
            commands::state::handle(args, &cli.global, &cfg)
        }

        // All other commands require a router connection
        cmd => {
            let cfg = config::load_config_or_default();
            let provider = commands::util::connect(&cli.global, &cfg).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &provider, &cli.global, &cfg).await
        }
    }
}
