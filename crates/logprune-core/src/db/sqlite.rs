//! SQLite backend

use super::{Dialect, SqlBackend, SqlValue};
use crate::error::Result;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Default time to wait on a locked database before a statement fails.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// [`SqlBackend`] over a single rusqlite connection
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open an existing database file. Never creates it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply connection-scoped settings. Persistent pragmas such as
    /// `journal_mode` stay as the owning application set them.
    pub fn initialize(&self, busy_timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(busy_timeout)?;
        Ok(())
    }

    /// Underlying connection, for fixtures and ad-hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn to_sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Real(f),
        ValueRef::Text(s) => SqlValue::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).to_string()),
    }
}

impl SqlBackend for SqliteBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn fetch_row(&self, sql: &str) -> Result<Option<Vec<SqlValue>>> {
        tracing::trace!(sql, "fetch_row");
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => {
                let mut values = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    values.push(to_sql_value(row.get_ref(idx)?));
                }
                Ok(Some(values))
            }
            None => Ok(None),
        }
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        tracing::trace!(sql, "execute");
        let affected = self.conn.execute(sql, [])?;
        Ok(affected as u64)
    }
}
