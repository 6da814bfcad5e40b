//! Storage status probe.
//!
//! # Responsibility
//! - Resolve configuration from `PRESSROOM_*` environment variables.
//! - Make sure the schema exists and print one row count per table.
//!
//! Never writes entity rows.

use log::info;
use pressroom_core::db::{ensure_tables, row_count};
use pressroom_core::{core_version, init_logging, CoreConfig, StorageLocation, Table};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("pressroom: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let provider = config
        .connection_provider()
        .map_err(|err| err.to_string())?;
    let conn = provider.acquire().map_err(|err| err.to_string())?;
    ensure_tables(&conn).map_err(|err| err.to_string())?;

    println!("pressroom_core version={}", core_version());
    match provider.location() {
        StorageLocation::File(path) => println!("storage=file path={}", path.display()),
        StorageLocation::Memory => println!("storage=memory"),
    }
    for table in Table::ALL {
        let count = row_count(&conn, table).map_err(|err| err.to_string())?;
        println!("table={} rows={count}", table.name());
    }

    info!("event=status_probe module=cli status=ok");
    Ok(())
}
