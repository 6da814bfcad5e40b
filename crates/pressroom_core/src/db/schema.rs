//! Table bootstrap and teardown.
//!
//! # Invariants
//! - `ensure_tables` is idempotent.
//! - Table names reach SQL only through the closed `Table` enum.

use super::DbResult;
use log::info;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables owned by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Authors,
    Magazines,
    Articles,
}

impl Table {
    /// All tables in creation order.
    pub const ALL: [Table; 3] = [Table::Authors, Table::Magazines, Table::Articles];

    pub fn name(self) -> &'static str {
        match self {
            Self::Authors => "authors",
            Self::Magazines => "magazines",
            Self::Articles => "articles",
        }
    }
}

/// Creates every missing table (and its indexes).
pub fn ensure_tables(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    info!("event=schema_ensure module=db status=ok");
    Ok(())
}

/// Drops one table if it exists. Rows referencing it are left untouched.
pub fn drop_table(conn: &Connection, table: Table) -> DbResult<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", table.name()))?;
    info!("event=schema_drop module=db status=ok table={}", table.name());
    Ok(())
}

pub fn table_exists(conn: &Connection, table: Table) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table.name()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Counts rows in an existing table.
pub fn row_count(conn: &Connection, table: Table) -> DbResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {};", table.name()),
        [],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}
