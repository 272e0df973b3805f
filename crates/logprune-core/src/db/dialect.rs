//! SQL rendering for the statements the pruner issues

use super::TableSpec;

/// SQL dialect of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
    /// Not returned by any bundled backend; for external [`SqlBackend`]
    /// implementations over a MySQL driver.
    ///
    /// [`SqlBackend`]: super::SqlBackend
    Mysql,
}

impl Dialect {
    /// Quote a (possibly schema-qualified) identifier that already passed validation.
    pub fn quote(&self, ident: &str) -> String {
        let q = match self {
            Dialect::Sqlite => '"',
            Dialect::Mysql => '`',
        };
        ident
            .split('.')
            .map(|part| format!("{q}{part}{q}"))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn id_range_sql(&self, table: &TableSpec) -> String {
        let id = self.quote(&table.id_column);
        format!(
            "SELECT MIN({id}), MAX({id}) FROM {}",
            self.quote(&table.name)
        )
    }

    pub fn timestamp_at_sql(&self, table: &TableSpec, id: i64) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = {}",
            self.quote(&table.timestamp_column),
            self.quote(&table.name),
            self.quote(&table.id_column),
            id
        )
    }

    /// Delete every remaining row with primary key <= `end_id`.
    ///
    /// MySQL gets `LOW_PRIORITY` so the delete yields to concurrent readers;
    /// SQLite has no equivalent modifier.
    pub fn delete_through_sql(&self, table: &TableSpec, end_id: i64) -> String {
        let modifier = match self {
            Dialect::Sqlite => "",
            Dialect::Mysql => "LOW_PRIORITY ",
        };
        format!(
            "DELETE {modifier}FROM {} WHERE {} <= {}",
            self.quote(&table.name),
            self.quote(&table.id_column),
            end_id
        )
    }
}
