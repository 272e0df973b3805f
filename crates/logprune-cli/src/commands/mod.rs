//! CLI command handlers

pub mod prune;
pub mod status;

use logprune_core::{Config, Result, TableSpec};

/// Resolve column names for `table`: flag, then config, then the defaults.
pub(crate) fn table_spec(
    config: &Config,
    table: &str,
    id_column: Option<&str>,
    timestamp_column: Option<&str>,
) -> Result<TableSpec> {
    let overrides = config.table(table);
    TableSpec::with_columns(
        table,
        id_column.unwrap_or(overrides.id_column()),
        timestamp_column.unwrap_or(overrides.timestamp_column()),
    )
}
