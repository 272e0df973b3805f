//! Structured progress events

use super::range::IdRange;
use super::PruneReport;
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum PruneEvent {
    Started {
        table: String,
        cutoff: NaiveDate,
        dry_run: bool,
    },
    RangeDiscovered(IdRange),
    EmptyTable,
    /// Probe at `end_id` was not before the cutoff; the block was halved.
    BoundaryNarrowed {
        end_id: i64,
        created_at: NaiveDateTime,
        block_size: u64,
    },
    BlockDeleted {
        start_id: i64,
        end_id: i64,
        created_at: NaiveDateTime,
        block_size: u64,
        rows: u64,
        elapsed: Duration,
    },
    BlockSizeIncreased {
        block_size: u64,
    },
    BlockSizeDecreased {
        block_size: u64,
    },
    Paced {
        duration: Duration,
    },
    Completed(PruneReport),
}

/// Receives events as a run progresses.
pub trait PruneObserver {
    fn on_event(&mut self, event: &PruneEvent);
}

/// Collects events in memory.
impl PruneObserver for Vec<PruneEvent> {
    fn on_event(&mut self, event: &PruneEvent) {
        self.push(event.clone());
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PruneObserver for TracingObserver {
    fn on_event(&mut self, event: &PruneEvent) {
        match event {
            PruneEvent::Started {
                table,
                cutoff,
                dry_run,
            } => {
                tracing::info!(
                    table = %table,
                    cutoff = %cutoff,
                    dry_run,
                    "delete records before {}",
                    cutoff
                );
            }
            PruneEvent::RangeDiscovered(range) => {
                tracing::info!(min_id = range.min_id, max_id = range.max_id, "id range");
            }
            PruneEvent::EmptyTable => {
                tracing::info!("table is empty, nothing to prune");
            }
            PruneEvent::BoundaryNarrowed {
                end_id,
                created_at,
                block_size,
            } => {
                tracing::debug!(
                    end_id,
                    created_at = %created_at,
                    block_size,
                    "past cutoff, narrowing block"
                );
            }
            PruneEvent::BlockDeleted {
                start_id,
                end_id,
                created_at,
                block_size,
                rows,
                elapsed,
            } => {
                tracing::info!(
                    block_size,
                    rows,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "deleting {}-{} ({})",
                    start_id,
                    end_id,
                    created_at
                );
            }
            PruneEvent::BlockSizeIncreased { block_size } => {
                tracing::info!("increase blocksize to {}", block_size);
            }
            PruneEvent::BlockSizeDecreased { block_size } => {
                tracing::info!("decrease blocksize to {}", block_size);
            }
            PruneEvent::Paced { duration } => {
                tracing::debug!(pause_ms = duration.as_millis() as u64, "pacing");
            }
            PruneEvent::Completed(report) => {
                tracing::info!(
                    table = %report.table,
                    blocks = report.blocks_deleted,
                    rows = report.rows_deleted,
                    stop = ?report.stop,
                    dry_run = report.dry_run,
                    "prune complete"
                );
            }
        }
    }
}
