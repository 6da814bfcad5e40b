//! Author, magazine and article entities.
//!
//! # Responsibility
//! - Validate field values on construction and on every mutation.
//! - Persist entities through a caller-supplied `ConnectionProvider`.
//! - Compute relationship views with plain SQL joins.
//!
//! # Invariants
//! - `id` is `None` until the first successful save and is only ever
//!   assigned by storage.
//! - Invalid values never reach storage and are never partially applied.
//! - Read paths re-validate stored rows and surface violations as
//!   `ModelError::InvalidData`.
//! - `delete` consumes the entity handle.
//!
//! # Lookup policy
//! - `get_by_id` returns `Ok(None)` on a miss.
//! - `fetch_from_db` (reload into an existing instance), `fetch_author` and
//!   `fetch_magazine` fail with `ModelError::NotFound`.

use crate::db::{self, ConnectionProvider, DbError, Table};
use rusqlite::{Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod author;
pub mod magazine;
pub mod validation;

use validation::{StateError, ValidationError};

/// Storage-assigned primary key.
pub type RowId = i64;

pub type ModelResult<T> = Result<T, ModelError>;

/// Error for entity validation, lifecycle and persistence operations.
#[derive(Debug)]
pub enum ModelError {
    Validation(ValidationError),
    State(StateError),
    NotFound {
        entity: &'static str,
        id: RowId,
    },
    /// The operation needs a storage id the entity does not have yet.
    NotPersisted {
        entity: &'static str,
    },
    InvalidData(String),
    Db(DbError),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::State(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NotPersisted { entity } => write!(f, "{entity} has not been saved yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::NotPersisted { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for ModelError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StateError> for ModelError {
    fn from(value: StateError) -> Self {
        Self::State(value)
    }
}

impl From<DbError> for ModelError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ModelError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a rule violation found in a stored row to `InvalidData`.
pub(crate) fn invalid_row(table: &str, id: RowId, err: impl Display) -> ModelError {
    ModelError::InvalidData(format!("{table} row {id}: {err}"))
}

/// Returns the id of a persisted entity or `NotPersisted`.
pub(crate) fn require_id(entity: &'static str, id: Option<RowId>) -> ModelResult<RowId> {
    id.ok_or(ModelError::NotPersisted { entity })
}

/// Runs a single-row query on a fresh connection.
pub(crate) fn query_one<T, P, F>(
    provider: &ConnectionProvider,
    sql: &str,
    params: P,
    parse: F,
) -> ModelResult<Option<T>>
where
    P: Params,
    F: Fn(&Row<'_>) -> ModelResult<T>,
{
    let conn = provider.acquire()?;
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse(row)?));
    }

    Ok(None)
}

/// Runs a multi-row query on a fresh connection.
pub(crate) fn query_all<T, P, F>(
    provider: &ConnectionProvider,
    sql: &str,
    params: P,
    parse: F,
) -> ModelResult<Vec<T>>
where
    P: Params,
    F: Fn(&Row<'_>) -> ModelResult<T>,
{
    let conn = provider.acquire()?;
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }

    Ok(items)
}

pub(crate) fn delete_row(
    provider: &ConnectionProvider,
    table: Table,
    entity: &'static str,
    id: RowId,
) -> ModelResult<()> {
    let conn = provider.acquire()?;
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", table.name()),
        [id],
    )?;

    if changed == 0 {
        return Err(ModelError::NotFound { entity, id });
    }

    Ok(())
}

/// Backs every entity's `create_table`: ensures the whole schema.
pub(crate) fn create_tables(provider: &ConnectionProvider) -> ModelResult<()> {
    let conn = provider.acquire()?;
    db::ensure_tables(&conn)?;
    Ok(())
}

pub(crate) fn drop_entity_table(provider: &ConnectionProvider, table: Table) -> ModelResult<()> {
    let conn = provider.acquire()?;
    db::drop_table(&conn, table)?;
    Ok(())
}
