//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logprune")]
#[command(
    author,
    version,
    about = "Prune old rows from append-only log tables without write-latency spikes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/logprune/config.yml)
    #[arg(long, global = true, env = "LOGPRUNE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Connection profile in the config file
    #[arg(short, long, global = true, default_value = logprune_core::config::DEFAULT_PROFILE)]
    pub section: String,

    /// Database file, bypassing the profile lookup
    #[arg(long, global = true, env = "LOGPRUNE_DB")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete rows older than the retention window
    Prune(PruneArgs),

    /// Show id range and edge timestamps without deleting anything
    Status(StatusArgs),
}

#[derive(Args)]
pub struct PruneArgs {
    /// Tables to prune, processed in order
    #[arg(required = true)]
    pub tables: Vec<String>,

    /// Days of rows to keep (0 deletes everything before today)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Initial number of rows per delete
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub blocksize: Option<u64>,

    /// Probe and pace without deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Integer primary key column
    #[arg(long)]
    pub id_column: Option<String>,

    /// Creation timestamp column
    #[arg(long)]
    pub timestamp_column: Option<String>,

    /// Continue with the next table after a failure
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Tables to inspect
    #[arg(required = true)]
    pub tables: Vec<String>,

    /// Days of rows to keep
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Integer primary key column
    #[arg(long)]
    pub id_column: Option<String>,

    /// Creation timestamp column
    #[arg(long)]
    pub timestamp_column: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
