//! Persistence core for authors, magazines and articles.
//! Entities validate themselves and talk to SQLite through a
//! caller-supplied `ConnectionProvider`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;

pub use config::CoreConfig;
pub use db::{ConnectionProvider, DbError, DbResult, StorageLocation, Table};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::Article;
pub use model::author::Author;
pub use model::magazine::{Magazine, FREQUENT_CONTRIBUTOR_THRESHOLD};
pub use model::validation::{StateError, ValidationError};
pub use model::{ModelError, ModelResult, RowId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
