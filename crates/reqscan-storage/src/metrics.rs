//! Historical metrics log: SQLite-backed and in-memory implementations.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use reqscan_core::errors::StorageError;
use reqscan_core::traits::{MetricsEntry, MetricsLog};
use reqscan_core::types::MetricsLogRow;

use crate::connection::DatabaseManager;
use crate::queries::metrics_log;

/// One point of the score trend, with the change from the previous point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub run_id: i64,
    pub timestamp: String,
    pub score: u8,
    pub grade: String,
    /// `None` for the first point.
    pub delta: Option<i32>,
}

fn to_trend(entries: Vec<MetricsEntry>) -> Vec<TrendPoint> {
    let mut previous: Option<u8> = None;
    entries
        .into_iter()
        .map(|e| {
            let delta = previous.map(|p| i32::from(e.row.score) - i32::from(p));
            previous = Some(e.row.score);
            TrendPoint {
                run_id: e.run_id,
                timestamp: e.row.timestamp,
                score: e.row.score,
                grade: e.row.grade,
                delta,
            }
        })
        .collect()
}

pub struct SqliteMetricsLog {
    db: Arc<DatabaseManager>,
}

impl SqliteMetricsLog {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(DatabaseManager::open_in_memory()?)))
    }

    pub fn count(&self) -> Result<i64, StorageError> {
        self.db.with_reader(metrics_log::count)
    }

    /// The latest `limit` runs, oldest first.
    pub fn trend(&self, limit: usize) -> Result<Vec<TrendPoint>, StorageError> {
        let entries = self.db.with_reader(|conn| metrics_log::recent(conn, limit))?;
        Ok(to_trend(entries))
    }
}

impl MetricsLog for SqliteMetricsLog {
    fn append(&self, row: &MetricsLogRow) -> Result<i64, StorageError> {
        let run_id = self.db.with_writer(|conn| metrics_log::insert(conn, row))?;
        tracing::debug!(run_id, score = row.score, "metrics row appended");
        Ok(run_id)
    }

    fn latest(&self) -> Result<Option<MetricsEntry>, StorageError> {
        self.db.with_reader(metrics_log::latest)
    }

    fn since(&self, since: &str) -> Result<Vec<MetricsEntry>, StorageError> {
        self.db.with_reader(|conn| metrics_log::since(conn, since))
    }
}

/// Same contract as [`SqliteMetricsLog`], held in a vector.
#[derive(Debug, Default)]
pub struct InMemoryMetricsLog {
    entries: Mutex<Vec<MetricsEntry>>,
}

impl InMemoryMetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, Vec<MetricsEntry>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::LockPoisoned {
            what: "in-memory metrics log".to_string(),
        })
    }

    pub fn count(&self) -> Result<i64, StorageError> {
        Ok(self.entries()?.len() as i64)
    }

    pub fn trend(&self, limit: usize) -> Result<Vec<TrendPoint>, StorageError> {
        let entries = self.entries()?;
        let start = entries.len().saturating_sub(limit);
        Ok(to_trend(entries[start..].to_vec()))
    }
}

impl MetricsLog for InMemoryMetricsLog {
    fn append(&self, row: &MetricsLogRow) -> Result<i64, StorageError> {
        let mut entries = self.entries()?;
        let run_id = entries.last().map_or(1, |e| e.run_id + 1);
        entries.push(MetricsEntry {
            run_id,
            row: row.clone(),
        });
        Ok(run_id)
    }

    fn latest(&self) -> Result<Option<MetricsEntry>, StorageError> {
        Ok(self.entries()?.last().cloned())
    }

    fn since(&self, since: &str) -> Result<Vec<MetricsEntry>, StorageError> {
        Ok(self
            .entries()?
            .iter()
            .filter(|e| e.row.timestamp.as_str() >= since)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(timestamp: &str, score: u8) -> MetricsLogRow {
        MetricsLogRow {
            timestamp: timestamp.to_string(),
            score,
            grade: "C".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn trend_deltas_follow_run_order() {
        let log = InMemoryMetricsLog::new();
        log.append(&row("2026-01-01T00:00:00Z", 70)).unwrap();
        log.append(&row("2026-01-02T00:00:00Z", 75)).unwrap();
        log.append(&row("2026-01-03T00:00:00Z", 72)).unwrap();

        let trend = log.trend(2).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].run_id, 2);
        assert_eq!(trend[0].delta, None);
        assert_eq!(trend[1].delta, Some(-3));
    }

    #[test]
    fn in_memory_latest_and_since() {
        let log = InMemoryMetricsLog::new();
        assert!(log.latest().unwrap().is_none());
        let first = log.append(&row("2026-01-01T00:00:00Z", 60)).unwrap();
        let second = log.append(&row("2026-02-01T00:00:00Z", 61)).unwrap();
        assert!(second > first);
        assert_eq!(log.latest().unwrap().unwrap().run_id, second);
        assert_eq!(log.since("2026-01-15T00:00:00Z").unwrap().len(), 1);
        assert_eq!(log.count().unwrap(), 2);
    }
}
