//! SQLite connection pooling.
//!
//! Pools are `r2d2` pools over [`SqliteConnectionManager`]. Every connection a
//! file-backed pool opens gets the store's busy timeout and WAL journaling
//! before it is handed out.

use std::path::Path;
use std::time::Duration;

pub use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// Pool of SQLite connections shared by every clone of a store.
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Open a pool of `size` connections to the database file at `path`.
///
/// Blocks until every connection is open, so a bad path fails here rather
/// than on the first request. `busy_timeout` also bounds how long a caller
/// waits for a free connection.
pub fn open_file_pool(path: &Path, size: usize, busy_timeout: Duration) -> Result<SqlitePool> {
    let max_size = checked_size(size)?;
    let manager = SqliteConnectionManager::file(path)
        .with_init(move |conn| configure_connection(conn, busy_timeout));

    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(busy_timeout)
        .build(manager)?;
    Ok(pool)
}

/// A single-connection pool over a private in-memory database.
pub fn open_memory_pool() -> Result<SqlitePool> {
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(SqliteConnectionManager::memory())?;
    Ok(pool)
}

fn checked_size(size: usize) -> Result<u32> {
    match u32::try_from(size) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidPoolSize { size }),
    }
}

fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!(journal_mode = %mode, "configured database connection");
    Ok(())
}
