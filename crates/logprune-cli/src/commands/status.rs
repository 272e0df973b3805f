//! Status command

use super::table_spec;
use crate::app::{OutputFormat, StatusArgs};
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use logprune_core::prune::{probe_boundary, scan_range};
use logprune_core::{cutoff_date, Config, IdRange, SqliteBackend};
use serde::Serialize;

/// Read-only view of a table's prunable state
#[derive(Debug, Serialize)]
struct TableStatus {
    table: String,
    cutoff: NaiveDate,
    range: Option<IdRange>,
    oldest: Option<NaiveDateTime>,
    newest: Option<NaiveDateTime>,
    /// The oldest row is before the cutoff, so a prune would delete something.
    has_expired_rows: bool,
}

pub fn run(
    args: StatusArgs,
    backend: &SqliteBackend,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let today = Local::now().date_naive();
    let mut statuses = Vec::with_capacity(args.tables.len());

    for table in &args.tables {
        let spec = table_spec(
            config,
            table,
            args.id_column.as_deref(),
            args.timestamp_column.as_deref(),
        )?;
        let days = args
            .days
            .unwrap_or_else(|| config.retention_days_for(table));
        let cutoff = cutoff_date(today, days);

        let mut status = TableStatus {
            table: table.clone(),
            cutoff,
            range: None,
            oldest: None,
            newest: None,
            has_expired_rows: false,
        };

        if let Some(range) = scan_range(backend, &spec)? {
            let oldest = probe_boundary(backend, &spec, range.min_id, cutoff)?;
            let newest = probe_boundary(backend, &spec, range.max_id, cutoff)?;
            status.range = Some(range);
            status.oldest = Some(oldest.created_at);
            status.newest = Some(newest.created_at);
            status.has_expired_rows = oldest.eligible;
        }

        statuses.push(status);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statuses)?),
        OutputFormat::Cli => {
            for status in &statuses {
                print_status(status);
            }
        }
    }

    Ok(())
}

fn print_status(status: &TableStatus) {
    println!("{}", status.table);
    match (status.range, status.oldest, status.newest) {
        (Some(range), Some(oldest), Some(newest)) => {
            println!("  ids:     {}..={}", range.min_id, range.max_id);
            println!("  oldest:  {}", oldest);
            println!("  newest:  {}", newest);
        }
        _ => println!("  (empty)"),
    }
    println!("  cutoff:  {}", status.cutoff);
    println!(
        "  expired: {}",
        if status.has_expired_rows { "yes" } else { "no" }
    );
}
