mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The daemon reports its lifecycle at info even without -v
    let floor = u8::from(matches!(cli.command, Command::Run(_)));
    init_tracing(cli.global.verbose.max(floor));

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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Run(args) => commands::run::handle(args, &cli.global).await,
        Command::Reconcile => commands::reconcile::handle(&cli.global).await,
        Command::Status => commands::status::handle(&cli.global).await,
        Command::Trigger(args) => commands::trigger::handle(args, &cli.global).await,
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
    }
}
