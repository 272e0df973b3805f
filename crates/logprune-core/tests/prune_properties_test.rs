//! Property tests for the pruning loop

use chrono::NaiveDate;
use logprune_core::db::{SqliteBackend, TableSpec};
use logprune_core::prune::{prune_table, PruneEvent, PruneJob, PruneReport, RecordingSleeper};
use proptest::prelude::*;

const CUTOFF: &str = "2024-06-01";

/// Table with ids 1..=rows; ids up to `expired` are before the cutoff.
fn fixture(rows: i64, expired: i64) -> SqliteBackend {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let conn = backend.connection();
    conn.execute(
        "CREATE TABLE log (id INTEGER PRIMARY KEY, created_at TEXT NOT NULL)",
        [],
    )
    .unwrap();
    let mut stmt = conn
        .prepare("INSERT INTO log (id, created_at) VALUES (?1, ?2)")
        .unwrap();
    for id in 1..=rows {
        let at = if id <= expired {
            "2024-05-01 10:00:00"
        } else {
            "2024-06-01 00:00:00"
        };
        stmt.execute((id, at)).unwrap();
    }
    drop(stmt);
    backend
}

fn job(block_size: u64) -> PruneJob {
    PruneJob::new(TableSpec::new("log").unwrap(), 30)
        .with_cutoff(NaiveDate::parse_from_str(CUTOFF, "%Y-%m-%d").unwrap())
        .with_block_size(block_size)
}

/// Run without collecting events or sleeping.
fn run_quiet(backend: &SqliteBackend, job: &PruneJob) -> logprune_core::Result<PruneReport> {
    prune_table(backend, job, &mut Vec::<PruneEvent>::new(), &mut RecordingSleeper::new())
}

fn remaining_ids(backend: &SqliteBackend) -> Vec<i64> {
    let conn = backend.connection();
    let mut stmt = conn.prepare("SELECT id FROM log ORDER BY id").unwrap();
    let ids = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<i64>, _>>()
        .unwrap();
    ids
}

fn scenario() -> impl Strategy<Value = (i64, i64, u64)> {
    (1i64..300)
        .prop_flat_map(|rows| (Just(rows), 0..=rows, 1u64..400))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_blocks_are_contiguous_and_increasing((rows, expired, block_size) in scenario()) {
        let backend = fixture(rows, expired);
        let mut events: Vec<PruneEvent> = Vec::new();
        let mut sleeper = RecordingSleeper::new();
        prune_table(&backend, &job(block_size), &mut events, &mut sleeper).unwrap();

        let mut next_start = 1;
        for event in &events {
            if let PruneEvent::BlockDeleted { start_id, end_id, .. } = event {
                prop_assert_eq!(*start_id, next_start);
                prop_assert!(end_id >= start_id);
                prop_assert!(*end_id <= expired);
                next_start = end_id + 1;
            }
        }
    }

    #[test]
    fn prop_narrowing_strictly_shrinks((rows, expired, block_size) in scenario()) {
        let backend = fixture(rows, expired);
        let mut events: Vec<PruneEvent> = Vec::new();
        let mut sleeper = RecordingSleeper::new();
        let report = prune_table(&backend, &job(block_size), &mut events, &mut sleeper).unwrap();

        let mut size = block_size;
        for event in &events {
            match event {
                PruneEvent::BoundaryNarrowed { block_size, .. } => {
                    prop_assert!(*block_size < size);
                    size = *block_size;
                }
                PruneEvent::BlockSizeIncreased { block_size }
                | PruneEvent::BlockSizeDecreased { block_size } => size = *block_size,
                _ => {}
            }
        }
        prop_assert_eq!(size, report.final_block_size);
    }

    #[test]
    fn prop_only_expired_rows_deleted((rows, expired, block_size) in scenario()) {
        let backend = fixture(rows, expired);
        run_quiet(&backend, &job(block_size)).unwrap();

        let remaining = remaining_ids(&backend);
        let fresh: Vec<i64> = remaining.iter().copied().filter(|id| *id > expired).collect();
        prop_assert_eq!(fresh.len() as i64, rows - expired);

        // the row at max_id is only removed when a block's right edge reaches it
        let stale: Vec<i64> = remaining.iter().copied().filter(|id| *id <= expired).collect();
        prop_assert!(stale.is_empty() || stale == vec![rows]);
    }

    #[test]
    fn prop_second_run_is_noop((rows, expired, block_size) in scenario()) {
        let backend = fixture(rows, expired);
        run_quiet(&backend, &job(block_size)).unwrap();
        let before = remaining_ids(&backend);

        let report = run_quiet(&backend, &job(block_size)).unwrap();
        prop_assert_eq!(report.blocks_deleted, 0);
        prop_assert_eq!(remaining_ids(&backend), before);
    }
}
