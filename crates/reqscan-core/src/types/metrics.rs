//! Run-level metrics: scan performance, health, and the history row.

use serde::{Deserialize, Serialize};

/// Size and timing of the snapshot scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub sheets_scanned: usize,
    pub total_rows: usize,
    pub max_cols: usize,
    pub total_cells: usize,
    pub scan_duration_ms: u64,
    pub average_rows_per_sheet: f64,
    pub is_large_dataset: bool,
}

/// Composite 0–100 health score with letter grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub score: u8,
    pub grade: char,
    pub implemented_pct: f64,
    pub undocumented_count: usize,
}

/// One append-only row of the historical metrics log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsLogRow {
    /// RFC 3339 timestamp; lexicographic order equals time order.
    pub timestamp: String,
    pub version: String,
    pub commit_label: String,
    pub sheets_scanned: usize,
    pub total_rows: usize,
    pub max_cols: usize,
    pub total_cells: usize,
    pub scan_duration_ms: u64,
    pub undocumented_count: usize,
    pub implemented_pct: f64,
    pub grade: String,
    pub score: u8,
}
