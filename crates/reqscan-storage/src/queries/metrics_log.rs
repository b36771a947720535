//! Queries for the metrics_log table, an append-only run history.

use rusqlite::{params, Connection, Row};

use reqscan_core::errors::StorageError;
use reqscan_core::traits::MetricsEntry;
use reqscan_core::types::MetricsLogRow;

use crate::to_storage_err;

const COLUMNS: &str = "id, timestamp, version, commit_label, sheets_scanned, total_rows, \
     max_cols, total_cells, scan_duration_ms, undocumented_count, implemented_pct, grade, score";

fn map_entry(row: &Row<'_>) -> rusqlite::Result<MetricsEntry> {
    Ok(MetricsEntry {
        run_id: row.get(0)?,
        row: MetricsLogRow {
            timestamp: row.get(1)?,
            version: row.get(2)?,
            commit_label: row.get(3)?,
            sheets_scanned: row.get::<_, i64>(4)? as usize,
            total_rows: row.get::<_, i64>(5)? as usize,
            max_cols: row.get::<_, i64>(6)? as usize,
            total_cells: row.get::<_, i64>(7)? as usize,
            scan_duration_ms: row.get::<_, i64>(8)? as u64,
            undocumented_count: row.get::<_, i64>(9)? as usize,
            implemented_pct: row.get(10)?,
            grade: row.get(11)?,
            score: row.get::<_, i64>(12)?.clamp(0, 100) as u8,
        },
    })
}

/// Append a row. Returns the new run id.
pub fn insert(conn: &Connection, row: &MetricsLogRow) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO metrics_log (timestamp, version, commit_label, sheets_scanned, total_rows,
            max_cols, total_cells, scan_duration_ms, undocumented_count, implemented_pct, grade, score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            row.timestamp,
            row.version,
            row.commit_label,
            row.sheets_scanned as i64,
            row.total_rows as i64,
            row.max_cols as i64,
            row.total_cells as i64,
            row.scan_duration_ms as i64,
            row.undocumented_count as i64,
            row.implemented_pct,
            row.grade,
            row.score as i64,
        ])
    })
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// Row with the highest run id.
pub fn latest(conn: &Connection) -> Result<Option<MetricsEntry>, StorageError> {
    let sql = format!("SELECT {COLUMNS} FROM metrics_log ORDER BY id DESC LIMIT 1");
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    let mut rows = stmt.query_map([], map_entry).map_err(to_storage_err)?;
    rows.next().transpose().map_err(to_storage_err)
}

/// Rows with `timestamp >= since`, oldest first.
pub fn since(conn: &Connection, since: &str) -> Result<Vec<MetricsEntry>, StorageError> {
    let sql = format!("SELECT {COLUMNS} FROM metrics_log WHERE timestamp >= ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![since], map_entry)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// The latest `limit` rows, oldest first.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<MetricsEntry>, StorageError> {
    let sql = format!(
        "SELECT * FROM (SELECT {COLUMNS} FROM metrics_log ORDER BY id DESC LIMIT ?1) ORDER BY id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![limit as i64], map_entry)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM metrics_log", [], |row| row.get(0))
        .map_err(to_storage_err)
}
