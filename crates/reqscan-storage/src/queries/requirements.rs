//! Queries for the requirements table.

use rusqlite::{params, Connection, Row};

use reqscan_core::errors::StorageError;

use crate::to_storage_err;

/// One stored requirement row, cells as entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementRow {
    pub row_id: i64,
    pub req_id: String,
    pub text: String,
    pub priority: String,
    pub progress: String,
    pub chapter: String,
    pub version: String,
    pub comment: String,
    pub last_modified: String,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RequirementRow> {
    Ok(RequirementRow {
        row_id: row.get(0)?,
        req_id: row.get(1)?,
        text: row.get(2)?,
        priority: row.get(3)?,
        progress: row.get(4)?,
        chapter: row.get(5)?,
        version: row.get(6)?,
        comment: row.get(7)?,
        last_modified: row.get(8)?,
    })
}

/// All rows in insertion order.
pub fn all(conn: &Connection) -> Result<Vec<RequirementRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT row_id, req_id, text, priority, progress, chapter, version, comment, last_modified
             FROM requirements ORDER BY row_id ASC",
        )
        .map_err(to_storage_err)?;
    let rows = stmt.query_map([], map_row).map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Insert a row; `row_id` is ignored. Returns the new row id.
pub fn insert(conn: &Connection, row: &RequirementRow) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO requirements (req_id, text, priority, progress, chapter, version, comment, last_modified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            row.req_id,
            row.text,
            row.priority,
            row.progress,
            row.chapter,
            row.version,
            row.comment,
            row.last_modified,
        ])
    })
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite priority, comment and stamp of one row. Text is never touched.
pub fn annotate(
    conn: &Connection,
    row_id: i64,
    priority: &str,
    comment: &str,
    last_modified: &str,
) -> Result<(), StorageError> {
    let changed = conn
        .execute(
            "UPDATE requirements SET priority = ?1, comment = ?2, last_modified = ?3 WHERE row_id = ?4",
            params![priority, comment, last_modified, row_id],
        )
        .map_err(to_storage_err)?;
    if changed == 0 {
        return Err(StorageError::NotFound {
            what: format!("requirement row {row_id}"),
        });
    }
    Ok(())
}

/// Identifiers used by more than one row, sorted.
pub fn duplicate_ids(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT req_id FROM requirements WHERE req_id <> ''
             GROUP BY req_id HAVING COUNT(*) > 1 ORDER BY req_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM requirements", [], |row| row.get(0))
        .map_err(to_storage_err)
}
