//! Retention boundary probing
//!
//! Only the right edge of a candidate block is inspected. This relies on the
//! timestamp being non-decreasing with the id, which holds for append-only
//! log tables.

use crate::db::{SqlBackend, SqlValue, TableSpec};
use crate::error::{PruneError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Result of probing a single id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub id: i64,
    pub created_at: NaiveDateTime,
    /// The row was created strictly before the cutoff date.
    pub eligible: bool,
}

/// Look up the timestamp of row `id` and compare its date to `cutoff`.
///
/// A missing row or a NULL timestamp is a data-integrity violation and fails
/// with [`PruneError::MissingTimestamp`].
pub fn probe_boundary<B>(
    backend: &B,
    table: &TableSpec,
    id: i64,
    cutoff: NaiveDate,
) -> Result<Probe>
where
    B: SqlBackend + ?Sized,
{
    let sql = backend.dialect().timestamp_at_sql(table, id);
    let value = backend
        .fetch_row(&sql)?
        .and_then(|row| row.into_iter().next())
        .unwrap_or(SqlValue::Null);

    if value.is_null() {
        return Err(PruneError::MissingTimestamp {
            table: table.name.clone(),
            id,
        });
    }

    let created_at = decode_timestamp(&value).ok_or_else(|| PruneError::InvalidTimestamp {
        table: table.name.clone(),
        id,
        value: value.to_string(),
    })?;

    Ok(Probe {
        id,
        created_at,
        eligible: created_at.date() < cutoff,
    })
}

/// Decode a stored timestamp: SQL datetime text, RFC 3339, a bare date, or
/// Unix epoch seconds.
pub fn decode_timestamp(value: &SqlValue) -> Option<NaiveDateTime> {
    match value {
        SqlValue::Text(s) => parse_timestamp_text(s.trim()),
        SqlValue::Integer(secs) => DateTime::from_timestamp(*secs, 0).map(|dt| dt.naive_utc()),
        SqlValue::Null | SqlValue::Real(_) => None,
    }
}

fn parse_timestamp_text(s: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
