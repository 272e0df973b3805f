//! Adaptive batched pruning of append-only log tables
//!
//! A run walks the primary-key range from the smallest id upward. Each
//! iteration proposes a block `[cursor, cursor + block_size - 1]`, probes the
//! timestamp of its right edge, and either deletes everything up to that edge
//! or halves the block and probes again. Executed deletes are timed: the
//! latency tunes the next block size and sets the pause before it.
//!
//! The search for the boundary is one-sided: after an overshoot the block is
//! only halved from the same start, never bisected back upward, so the final
//! delete may stop short of the exact boundary row.

mod boundary;
mod controller;
mod events;
mod executor;
mod pacing;
mod range;

pub use boundary::{decode_timestamp, probe_boundary, Probe};
pub use controller::{
    grow, shrink, AdaptiveBatch, Adjustment, Block, FAST_DELETE, GROWTH_FACTOR, SHRINK_FACTOR,
    SLOW_DELETE,
};
pub use events::{PruneEvent, PruneObserver, TracingObserver};
pub use executor::{delete_through, Deletion};
pub use pacing::{Pacing, RecordingSleeper, Sleeper, ThreadSleeper};
pub use range::{scan_range, IdRange};

use crate::db::{SqlBackend, TableSpec};
use crate::error::{PruneError, Result};
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::time::Instant;

/// Initial block size when none is configured.
pub const DEFAULT_BLOCK_SIZE: u64 = 500;

/// Retention window when none is configured.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Everything one run against one table needs.
#[derive(Debug, Clone)]
pub struct PruneJob {
    pub table: TableSpec,
    /// Rows whose timestamp date is strictly before this are eligible.
    pub cutoff: NaiveDate,
    pub initial_block_size: u64,
    pub dry_run: bool,
    pub pacing: Pacing,
}

impl PruneJob {
    /// Job keeping the last `retention_days` days, counted from today
    /// (`0` removes everything before today).
    pub fn new(table: TableSpec, retention_days: u32) -> Self {
        Self {
            table,
            cutoff: cutoff_date(Local::now().date_naive(), retention_days),
            initial_block_size: DEFAULT_BLOCK_SIZE,
            dry_run: false,
            pacing: Pacing::default(),
        }
    }

    pub fn with_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.initial_block_size = block_size;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run with real sleeps, logging progress through `tracing`.
    pub fn run<B>(&self, backend: &B) -> Result<PruneReport>
    where
        B: SqlBackend + ?Sized,
    {
        prune_table(backend, self, &mut TracingObserver, &mut ThreadSleeper)
    }
}

/// `today - retention_days`, clamped at the earliest representable date.
pub fn cutoff_date(today: NaiveDate, retention_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(retention_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EmptyTable,
    /// The cursor reached the largest id.
    RangeExhausted,
    /// Narrowing shrank the block to zero: the rest is inside the window.
    BlockSizeCollapsed,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::EmptyTable => "empty table",
            StopReason::RangeExhausted => "range exhausted",
            StopReason::BlockSizeCollapsed => "reached retention boundary",
        }
    }
}

/// Summary of one table's run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PruneReport {
    pub table: String,
    pub cutoff: NaiveDate,
    pub dry_run: bool,
    pub range: Option<IdRange>,
    pub blocks_deleted: u64,
    /// Rows reported deleted by the database; zero in dry-run mode.
    pub rows_deleted: u64,
    pub probes: u64,
    pub narrowings: u64,
    pub final_block_size: u64,
    /// First id not confirmed deleted.
    pub cursor: Option<i64>,
    pub stop: StopReason,
    pub elapsed_ms: u64,
}

/// Prune one table.
///
/// Errors are fatal for this table; blocks deleted before the error stay
/// deleted, and a rerun resumes from the new smallest id.
pub fn prune_table<B, O, S>(
    backend: &B,
    job: &PruneJob,
    observer: &mut O,
    sleeper: &mut S,
) -> Result<PruneReport>
where
    B: SqlBackend + ?Sized,
    O: PruneObserver + ?Sized,
    S: Sleeper + ?Sized,
{
    if job.initial_block_size == 0 {
        return Err(PruneError::InvalidInput(
            "initial block size must be positive".to_string(),
        ));
    }

    let started = Instant::now();
    observer.on_event(&PruneEvent::Started {
        table: job.table.name.clone(),
        cutoff: job.cutoff,
        dry_run: job.dry_run,
    });

    let mut report = PruneReport {
        table: job.table.name.clone(),
        cutoff: job.cutoff,
        dry_run: job.dry_run,
        range: None,
        blocks_deleted: 0,
        rows_deleted: 0,
        probes: 0,
        narrowings: 0,
        final_block_size: job.initial_block_size,
        cursor: None,
        stop: StopReason::EmptyTable,
        elapsed_ms: 0,
    };

    let Some(range) = scan_range(backend, &job.table)? else {
        observer.on_event(&PruneEvent::EmptyTable);
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        observer.on_event(&PruneEvent::Completed(report.clone()));
        return Ok(report);
    };
    observer.on_event(&PruneEvent::RangeDiscovered(range));
    report.range = Some(range);

    let mut batch = AdaptiveBatch::new(job.initial_block_size);
    let mut cursor = range.min_id;

    while cursor < range.max_id && !batch.is_exhausted() {
        let block = batch.propose(cursor, range.max_id);
        let probe = probe_boundary(backend, &job.table, block.end_id, job.cutoff)?;
        report.probes += 1;

        if !probe.eligible {
            let block_size = batch.narrow();
            report.narrowings += 1;
            observer.on_event(&PruneEvent::BoundaryNarrowed {
                end_id: block.end_id,
                created_at: probe.created_at,
                block_size,
            });
            continue;
        }

        let block_size = batch.block_size();
        let deletion = delete_through(
            backend,
            &job.table,
            block.end_id,
            job.dry_run,
            &job.pacing,
            sleeper,
        )?;
        report.blocks_deleted += 1;
        report.rows_deleted += deletion.rows;
        observer.on_event(&PruneEvent::BlockDeleted {
            start_id: block.start_id,
            end_id: block.end_id,
            created_at: probe.created_at,
            block_size,
            rows: deletion.rows,
            elapsed: deletion.elapsed,
        });

        match batch.record_delete(deletion.elapsed) {
            Some(Adjustment::Increased(block_size)) => {
                observer.on_event(&PruneEvent::BlockSizeIncreased { block_size })
            }
            Some(Adjustment::Decreased(block_size)) => {
                observer.on_event(&PruneEvent::BlockSizeDecreased { block_size })
            }
            None => {}
        }

        let pause = job.pacing.delay_for(deletion.elapsed);
        observer.on_event(&PruneEvent::Paced { duration: pause });
        sleeper.sleep(pause);

        cursor = block.end_id.saturating_add(1);
    }

    report.cursor = Some(cursor);
    report.final_block_size = batch.block_size();
    report.stop = if batch.is_exhausted() {
        StopReason::BlockSizeCollapsed
    } else {
        StopReason::RangeExhausted
    };
    report.elapsed_ms = started.elapsed().as_millis() as u64;
    observer.on_event(&PruneEvent::Completed(report.clone()));
    Ok(report)
}
