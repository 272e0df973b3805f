//! Prune command

use super::table_spec;
use crate::app::{OutputFormat, PruneArgs};
use anyhow::Result;
use logprune_core::{Config, PruneError, PruneJob, PruneReport, SqliteBackend};

pub fn run(
    args: PruneArgs,
    backend: &SqliteBackend,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let mut reports = Vec::with_capacity(args.tables.len());
    let mut first_error: Option<PruneError> = None;

    for table in &args.tables {
        tracing::info!("Start deleting old logs from: {}", table);
        match prune_one(&args, table, backend, config) {
            Ok(report) => {
                if format == OutputFormat::Cli {
                    print_report(&report);
                }
                reports.push(report);
            }
            Err(e) if args.keep_going => {
                tracing::error!(table = %table, error = %e, "prune failed, continuing");
                eprintln!("{}: {}", table, e);
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error = Some(e);
                break;
            }
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn prune_one(
    args: &PruneArgs,
    table: &str,
    backend: &SqliteBackend,
    config: &Config,
) -> logprune_core::Result<PruneReport> {
    let spec = table_spec(
        config,
        table,
        args.id_column.as_deref(),
        args.timestamp_column.as_deref(),
    )?;
    let days = args
        .days
        .unwrap_or_else(|| config.retention_days_for(table));
    let block_size = args
        .blocksize
        .unwrap_or_else(|| config.block_size_for(table));

    PruneJob::new(spec, days)
        .with_block_size(block_size)
        .with_dry_run(args.dry_run)
        .run(backend)
}

fn print_report(report: &PruneReport) {
    let Some(range) = report.range else {
        println!("{}: empty, nothing to do", report.table);
        return;
    };
    let last_id = report.cursor.map(|c| c - 1).unwrap_or(range.min_id - 1);
    if report.dry_run && report.blocks_deleted == 0 {
        println!(
            "{}: dry run, nothing to delete before {} ({})",
            report.table,
            report.cutoff,
            report.stop.as_str()
        );
    } else if report.dry_run {
        println!(
            "{}: dry run, would delete ids {}..={} in {} blocks (before {}, {})",
            report.table,
            range.min_id,
            last_id,
            report.blocks_deleted,
            report.cutoff,
            report.stop.as_str()
        );
    } else {
        println!(
            "{}: deleted {} rows in {} blocks (before {}, {})",
            report.table,
            report.rows_deleted,
            report.blocks_deleted,
            report.cutoff,
            report.stop.as_str()
        );
    }
}
