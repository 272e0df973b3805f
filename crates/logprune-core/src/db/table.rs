//! Target table description

use crate::error::{PruneError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$").unwrap();
}

pub const DEFAULT_ID_COLUMN: &str = "id";
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "created_at";

/// A log table with a monotonic integer primary key and a creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub id_column: String,
    pub timestamp_column: String,
}

impl TableSpec {
    /// Table using the conventional `id` / `created_at` columns.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_columns(name, DEFAULT_ID_COLUMN, DEFAULT_TIMESTAMP_COLUMN)
    }

    pub fn with_columns(
        name: impl Into<String>,
        id_column: impl Into<String>,
        timestamp_column: impl Into<String>,
    ) -> Result<Self> {
        let spec = Self {
            name: name.into(),
            id_column: id_column.into(),
            timestamp_column: timestamp_column.into(),
        };
        validate_identifier(&spec.name)?;
        validate_identifier(&spec.id_column)?;
        validate_identifier(&spec.timestamp_column)?;
        Ok(spec)
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reject anything that is not a plain (optionally schema-qualified) identifier.
pub fn validate_identifier(ident: &str) -> Result<()> {
    if IDENTIFIER.is_match(ident) {
        Ok(())
    } else {
        Err(PruneError::InvalidIdentifier(ident.to_string()))
    }
}
