//! SQLite connection provider and schema bootstrap.
//!
//! # Responsibility
//! - Hand out short-lived SQLite connections, one per persistence operation.
//! - Create and drop the `authors`, `magazines` and `articles` tables.
//!
//! # Invariants
//! - Connections are never pooled; callers drop them when the operation ends.
//! - Foreign keys are plain integers. No `REFERENCES` clause is declared and
//!   `PRAGMA foreign_keys` stays off, so deleting an author or magazine can
//!   leave dangling article rows.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod provider;
pub mod schema;

pub use provider::{ConnectionProvider, StorageLocation};
pub use schema::{drop_table, ensure_tables, row_count, table_exists, Table};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Storage location cannot be used to open a database.
    InvalidLocation(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidLocation(message) => write!(f, "invalid storage location: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidLocation(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
