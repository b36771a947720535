//! PRAGMA configuration applied to every connection.

use rusqlite::Connection;

use reqscan_core::errors::StorageError;

use crate::to_storage_err;

/// WAL journal, NORMAL sync, 5s busy timeout.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -16000;
        ",
    )
    .map_err(to_storage_err)
}

/// Read-side pragmas; the journal mode is owned by the writer.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -16000;
        ",
    )
    .map_err(to_storage_err)
}

/// True when the connection runs in WAL mode. In-memory databases report
/// `memory` instead.
pub fn is_wal_mode(conn: &Connection) -> Result<bool, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_storage_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
