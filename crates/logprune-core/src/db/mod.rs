//! Database layer for logprune
//!
//! The pruning engine only needs two capabilities from a connection: fetch a
//! single row, and execute a statement reporting rows affected. Everything
//! dialect specific (quoting, the delete modifier) lives in [`Dialect`].

mod dialect;
mod sqlite;
mod table;

pub use dialect::Dialect;
pub use sqlite::{SqliteBackend, DEFAULT_BUSY_TIMEOUT};
pub use table::{validate_identifier, TableSpec, DEFAULT_ID_COLUMN, DEFAULT_TIMESTAMP_COLUMN};

use crate::error::Result;
use std::fmt;

/// A single column value as returned by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Blocking SQL execution capability used by the pruner.
///
/// Implementations own their connection; calls are strictly sequential.
pub trait SqlBackend {
    /// Dialect used to render statements for this backend.
    fn dialect(&self) -> Dialect;

    /// Run a query and return its first row, or `None` if it produced no rows.
    fn fetch_row(&self, sql: &str) -> Result<Option<Vec<SqlValue>>>;

    /// Execute a statement and return the number of rows it affected.
    fn execute(&self, sql: &str) -> Result<u64>;
}
