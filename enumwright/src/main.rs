mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use enumwright_core::error::Result;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` wins; otherwise the verbosity
/// flags pick the level.
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => commands::generate::run_default(cli),
        Some(Commands::Generate(args)) => commands::generate::run(cli, args.clone()),
        Some(Commands::Validate(args)) => commands::validate::run(cli, args.clone()),
        Some(Commands::Info(args)) => commands::info::run(cli, args.clone()),
        Some(Commands::Init(args)) => commands::init::run(cli, args.clone()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    debug!("Parsed command line: {:?}", cli);

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
