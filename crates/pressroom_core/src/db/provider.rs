//! Per-operation connection acquisition.
//!
//! # Responsibility
//! - Resolve a configured storage location into fresh SQLite handles.
//! - Keep in-memory databases alive across short-lived handles.
//!
//! # Invariants
//! - Every `acquire` opens a new handle; nothing is cached or pooled.
//! - A handle is closed when dropped, on success and error paths alike.

use super::{DbError, DbResult};
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// SQLite database file, created on first open.
    File(PathBuf),
    /// Private in-memory database owned by one provider.
    Memory,
}

/// Opens one SQLite connection per persistence operation.
///
/// Passed explicitly into every entity operation; there is no process-wide
/// default provider.
#[derive(Debug)]
pub struct ConnectionProvider {
    location: StorageLocation,
    target: String,
    // Shared-cache memory databases vanish with their last connection.
    _anchor: Option<Connection>,
}

impl ConnectionProvider {
    /// Builds a provider for the given location.
    ///
    /// # Errors
    /// - `DbError::InvalidLocation` when a file path is empty.
    /// - `DbError::Sqlite` when the in-memory anchor cannot be opened.
    pub fn new(location: StorageLocation) -> DbResult<Self> {
        match &location {
            StorageLocation::File(path) => {
                if path.as_os_str().is_empty() {
                    return Err(DbError::InvalidLocation(
                        "database path cannot be empty".to_string(),
                    ));
                }
                let target = path.to_string_lossy().into_owned();
                Ok(Self {
                    location,
                    target,
                    _anchor: None,
                })
            }
            StorageLocation::Memory => {
                let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
                let target = format!(
                    "file:pressroom-mem-{}-{seq}?mode=memory&cache=shared",
                    std::process::id()
                );
                let anchor = open_handle(&target, "memory")?;
                Ok(Self {
                    location,
                    target,
                    _anchor: Some(anchor),
                })
            }
        }
    }

    /// Shorthand for a file-backed provider.
    pub fn file(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::new(StorageLocation::File(path.as_ref().to_path_buf()))
    }

    /// Shorthand for a private in-memory provider.
    pub fn in_memory() -> DbResult<Self> {
        Self::new(StorageLocation::Memory)
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Opens a fresh connection for a single operation.
    ///
    /// The caller owns the handle and releases it by dropping it.
    pub fn acquire(&self) -> DbResult<Connection> {
        let mode = match self.location {
            StorageLocation::File(_) => "file",
            StorageLocation::Memory => "memory",
        };
        open_handle(&self.target, mode)
    }
}

fn open_handle(target: &str, mode: &str) -> DbResult<Connection> {
    let started_at = Instant::now();
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(target, flags)
        .and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|()| conn));

    match conn {
        Ok(conn) => {
            debug!(
                "event=db_acquire module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_acquire module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}
