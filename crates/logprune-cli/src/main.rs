//! Logprune CLI
//!
//! Prune old rows from append-only log tables.

use anyhow::{Context, Result};
use clap::Parser;
use logprune_core::db::DEFAULT_BUSY_TIMEOUT;
use logprune_core::error::exit_codes;
use logprune_core::{Config, PruneError, SqliteBackend};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use app::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<PruneError>()
            .map(PruneError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

/// `RUST_LOG` when set, `info` otherwise; `--verbose` raises everything to `debug`.
fn env_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    let backend = open_backend(&cli, &config)?;

    match cli.command {
        Commands::Prune(args) => commands::prune::run(args, &backend, &config, cli.format),
        Commands::Status(args) => commands::status::run(args, &backend, &config, cli.format),
    }
}

/// Open the database named by `--db`, or by the selected config profile.
fn open_backend(cli: &Cli, config: &Config) -> Result<SqliteBackend> {
    let (path, busy_timeout) = match &cli.db {
        Some(path) => (path.clone(), DEFAULT_BUSY_TIMEOUT),
        None => {
            let profile = config.profile(&cli.section)?;
            (profile.database.clone(), profile.busy_timeout())
        }
    };

    tracing::debug!(path = %path.display(), "opening database");
    let backend = SqliteBackend::open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    backend.initialize(busy_timeout)?;
    Ok(backend)
}
