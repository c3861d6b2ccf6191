//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections from storage configuration.
//! - Configure connection pragmas required by integrity enforcement.
//! - Apply the declared schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`; without it the declared
//!   cascade/restrict policies are not enforced by SQLite.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::StorageConfig;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

/// Opens the configured database file and applies all pending migrations.
///
/// Shared cache mode is requested when the configuration asks for it.
///
/// # Side effects
/// - Creates the database file when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StorageConfig) -> DbResult<Connection> {
    let mut flags = OpenFlags::default();
    if config.shared_cache {
        flags |= OpenFlags::SQLITE_OPEN_SHARED_CACHE;
    }

    open_with("file", || {
        Connection::open_with_flags(&config.database_path, flags)
    })
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// Intended for tests and tooling; integrity pragmas match file databases.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = open()
        .map_err(Into::into)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }

    result
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
