//! Logprune Core Library
//!
//! Prunes old rows from append-only, auto-incrementing log tables without
//! long-held locks or write-latency spikes.
//!
//! # Features
//! - Retention boundary search by probing the right edge of each block
//! - Block size tuned continuously against observed delete latency
//! - Pacing between deletes proportional to their cost
//! - Dry-run mode that exercises the whole loop without mutating data

pub mod config;
pub mod db;
pub mod error;
pub mod prune;

pub use config::{Config, ProfileConfig, TableOverride};
pub use db::{Dialect, SqlBackend, SqlValue, SqliteBackend, TableSpec};
pub use error::{Error, PruneError, Result};
pub use prune::{
    cutoff_date, prune_table, IdRange, Pacing, PruneEvent, PruneJob, PruneObserver, PruneReport,
    RecordingSleeper, Sleeper, StopReason, ThreadSleeper, TracingObserver,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "logprune";
