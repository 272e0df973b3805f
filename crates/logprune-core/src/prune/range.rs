//! Primary-key range discovery

use crate::db::{SqlBackend, SqlValue, TableSpec};
use crate::error::{PruneError, Result};
use serde::Serialize;

/// Inclusive id bounds of a table, read once at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRange {
    pub min_id: i64,
    pub max_id: i64,
}

/// Read `MIN(id), MAX(id)`. An empty table yields `None`.
pub fn scan_range<B>(backend: &B, table: &TableSpec) -> Result<Option<IdRange>>
where
    B: SqlBackend + ?Sized,
{
    let range_error = |reason: String| PruneError::Range {
        table: table.name.clone(),
        reason,
    };

    let sql = backend.dialect().id_range_sql(table);
    let row = backend
        .fetch_row(&sql)
        .map_err(|e| range_error(e.to_string()))?
        .ok_or_else(|| range_error("range query returned no row".to_string()))?;

    match row.as_slice() {
        [SqlValue::Null, SqlValue::Null] => Ok(None),
        [SqlValue::Integer(min_id), SqlValue::Integer(max_id)] if min_id <= max_id => {
            Ok(Some(IdRange {
                min_id: *min_id,
                max_id: *max_id,
            }))
        }
        [min, max] => Err(range_error(format!(
            "column {} is not an integer key (min={}, max={})",
            table.id_column, min, max
        ))),
        other => Err(range_error(format!(
            "expected 2 columns, got {}",
            other.len()
        ))),
    }
}
