//! Contacts CLI - manage a CSV contact book from the command line.
//!
//! Each invocation loads the contacts file, runs one command through the
//! contacts engine, and saves the file when the command changed it.

mod cli;
mod commands;
mod config;
mod error;

use crate::cli::Cli;
use crate::commands::Session;
use crate::config::Config;
use crate::error::AppError;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the filter so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contacts_cli=info,contacts_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.log();
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let session = Session::new(config, cli.file, cli.backend, cli.json);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&session, cli.command, &mut out)
}
