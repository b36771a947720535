//! Metrics log: append-only ids, latest, since, trend, file persistence.

use std::sync::Arc;

use reqscan_core::traits::MetricsLog;
use reqscan_core::types::MetricsLogRow;
use reqscan_storage::migrations::run_migrations;
use reqscan_storage::queries::metrics_log;
use reqscan_storage::{DatabaseManager, SqliteMetricsLog};
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn row(timestamp: &str, score: u8) -> MetricsLogRow {
    MetricsLogRow {
        timestamp: timestamp.to_string(),
        version: "0.1.0".to_string(),
        commit_label: "main".to_string(),
        sheets_scanned: 12,
        total_rows: 4_000,
        max_cols: 18,
        total_cells: 40_000,
        scan_duration_ms: 1_234,
        undocumented_count: 3,
        implemented_pct: 42.5,
        grade: "D".to_string(),
        score,
    }
}

#[test]
fn insert_and_latest_roundtrip() {
    let conn = setup_db();
    assert!(metrics_log::latest(&conn).unwrap().is_none());

    let id = metrics_log::insert(&conn, &row("2026-03-01T10:00:00Z", 64)).unwrap();
    let latest = metrics_log::latest(&conn).unwrap().unwrap();
    assert_eq!(latest.run_id, id);
    assert_eq!(latest.row, row("2026-03-01T10:00:00Z", 64));
}

#[test]
fn run_ids_increase_and_latest_is_highest_id() {
    let conn = setup_db();
    // Timestamps deliberately out of order: latest follows the id.
    let a = metrics_log::insert(&conn, &row("2026-03-02T00:00:00Z", 60)).unwrap();
    let b = metrics_log::insert(&conn, &row("2026-03-01T00:00:00Z", 61)).unwrap();
    assert!(b > a);
    assert_eq!(metrics_log::latest(&conn).unwrap().unwrap().run_id, b);
    assert_eq!(metrics_log::count(&conn).unwrap(), 2);
}

#[test]
fn since_filters_by_timestamp_oldest_first() {
    let conn = setup_db();
    for (day, score) in [(1, 50), (5, 55), (9, 60)] {
        metrics_log::insert(&conn, &row(&format!("2026-03-0{day}T00:00:00Z"), score)).unwrap();
    }
    let rows = metrics_log::since(&conn, "2026-03-05T00:00:00Z").unwrap();
    let scores: Vec<u8> = rows.iter().map(|e| e.row.score).collect();
    assert_eq!(scores, vec![55, 60]);
    assert!(metrics_log::since(&conn, "2027-01-01T00:00:00Z").unwrap().is_empty());
}

#[test]
fn sqlite_log_trend_reports_deltas() {
    let log = SqliteMetricsLog::open_in_memory().unwrap();
    log.append(&row("2026-03-01T00:00:00Z", 70)).unwrap();
    log.append(&row("2026-03-02T00:00:00Z", 74)).unwrap();
    log.append(&row("2026-03-03T00:00:00Z", 71)).unwrap();

    let trend = log.trend(10).unwrap();
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0].delta, None);
    assert_eq!(trend[1].delta, Some(4));
    assert_eq!(trend[2].delta, Some(-3));
    assert_eq!(log.trend(1).unwrap()[0].score, 71);
    assert_eq!(log.count().unwrap(), 3);
}

#[test]
fn file_backed_log_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    let first_id = {
        let log = SqliteMetricsLog::new(Arc::new(DatabaseManager::open(&path).unwrap()));
        log.append(&row("2026-03-01T00:00:00Z", 80)).unwrap()
    };

    let log = SqliteMetricsLog::new(Arc::new(DatabaseManager::open(&path).unwrap()));
    let second_id = log.append(&row("2026-03-02T00:00:00Z", 82)).unwrap();
    assert!(second_id > first_id);
    let latest = log.latest().unwrap().unwrap();
    assert_eq!(latest.run_id, second_id);
    assert_eq!(latest.row.score, 82);
}
