//! Block deletion

use super::pacing::{Pacing, Sleeper};
use crate::db::{SqlBackend, TableSpec};
use crate::error::{PruneError, Result};
use std::time::{Duration, Instant};

/// Outcome of one executed (or simulated) delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    pub rows: u64,
    pub elapsed: Duration,
}

/// Delete every remaining row with primary key <= `end_id`, timing the
/// statement.
///
/// In dry-run mode nothing is sent to the database; `pacing.dry_run_latency`
/// is slept and reported instead so the controller and pacing still run.
/// A failed statement is not retried.
pub fn delete_through<B, S>(
    backend: &B,
    table: &TableSpec,
    end_id: i64,
    dry_run: bool,
    pacing: &Pacing,
    sleeper: &mut S,
) -> Result<Deletion>
where
    B: SqlBackend + ?Sized,
    S: Sleeper + ?Sized,
{
    let sql = backend.dialect().delete_through_sql(table, end_id);

    if dry_run {
        tracing::debug!(sql = %sql, "dry run, skipping delete");
        sleeper.sleep(pacing.dry_run_latency);
        return Ok(Deletion {
            rows: 0,
            elapsed: pacing.dry_run_latency,
        });
    }

    tracing::debug!(sql = %sql, "executing delete");
    let started = Instant::now();
    let rows = backend
        .execute(&sql)
        .map_err(|e| PruneError::Execution {
            table: table.name.clone(),
            end_id,
            message: e.to_string(),
        })?;

    Ok(Deletion {
        rows,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteBackend;
    use crate::prune::pacing::RecordingSleeper;

    fn backend() -> SqliteBackend {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend
            .connection()
            .execute_batch(
                "CREATE TABLE log (id INTEGER PRIMARY KEY, created_at TEXT);
                 INSERT INTO log (id, created_at) VALUES
                    (1, '2024-01-01'), (2, '2024-01-01'), (3, '2024-01-01');",
            )
            .unwrap();
        backend
    }

    fn count(backend: &SqliteBackend) -> i64 {
        backend
            .connection()
            .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_delete_through() {
        let backend = backend();
        let table = TableSpec::new("log").unwrap();
        let mut sleeper = RecordingSleeper::new();

        let deletion =
            delete_through(&backend, &table, 2, false, &Pacing::default(), &mut sleeper).unwrap();
        assert_eq!(deletion.rows, 2);
        assert_eq!(count(&backend), 1);
        assert!(sleeper.slept.is_empty());
    }

    #[test]
    fn test_dry_run_simulates_latency() {
        let backend = backend();
        let table = TableSpec::new("log").unwrap();
        let mut sleeper = RecordingSleeper::new();
        let pacing = Pacing::default();

        let deletion = delete_through(&backend, &table, 3, true, &pacing, &mut sleeper).unwrap();
        assert_eq!(deletion.rows, 0);
        assert_eq!(deletion.elapsed, Duration::from_millis(50));
        assert_eq!(sleeper.slept, vec![Duration::from_millis(50)]);
        assert_eq!(count(&backend), 3);
    }

    #[test]
    fn test_failed_delete_is_execution_error() {
        let backend = backend();
        backend
            .connection()
            .execute_batch(
                "CREATE TRIGGER no_delete BEFORE DELETE ON log
                 BEGIN SELECT RAISE(ABORT, 'rows are locked'); END;",
            )
            .unwrap();
        let table = TableSpec::new("log").unwrap();
        let mut sleeper = RecordingSleeper::new();

        let err = delete_through(&backend, &table, 2, false, &Pacing::default(), &mut sleeper)
            .unwrap_err();
        match err {
            PruneError::Execution { end_id, message, .. } => {
                assert_eq!(end_id, 2);
                assert!(message.contains("rows are locked"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count(&backend), 3);
    }
}
