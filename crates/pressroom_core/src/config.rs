//! Startup configuration.
//!
//! # Responsibility
//! - Resolve storage location and logging settings once at startup.
//! - Act as the single place where a `ConnectionProvider` is built.
//!
//! # Invariants
//! - Nothing here is global; callers own the returned `CoreConfig`.

use crate::db::{ConnectionProvider, DbResult, StorageLocation};
use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PRESSROOM_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PRESSROOM_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PRESSROOM_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "pressroom.sqlite3";
/// `PRESSROOM_DB_PATH` value selecting a private in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageLocation,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let storage = match read(DB_PATH_ENV) {
            Some(path) if path == MEMORY_DB_PATH => StorageLocation::Memory,
            Some(path) => StorageLocation::File(PathBuf::from(path)),
            None => StorageLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME)),
        };

        Self {
            storage,
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn connection_provider(&self) -> DbResult<ConnectionProvider> {
        ConnectionProvider::new(self.storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::db::StorageLocation;
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(
            config.storage,
            StorageLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME))
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (DB_PATH_ENV, "/var/lib/pressroom/data.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/pressroom"),
        ]);
        assert_eq!(
            config.storage,
            StorageLocation::File(PathBuf::from("/var/lib/pressroom/data.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/pressroom")));
    }

    #[test]
    fn memory_marker_and_blank_values() {
        let config = config_from(&[(DB_PATH_ENV, ":memory:"), (LOG_DIR_ENV, "   ")]);
        assert_eq!(config.storage, StorageLocation::Memory);
        assert_eq!(config.log_dir, None);
    }
}
