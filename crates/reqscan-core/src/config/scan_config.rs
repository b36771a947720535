//! Snapshot collection configuration, including large-dataset cutoffs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Sheets fetched per batch. Default: 15.
    pub batch_size: Option<usize>,
    /// Pause between sheet batches in milliseconds. Default: 20.
    pub batch_pause_ms: Option<u64>,
    /// Header names kept per sheet. Default: 10.
    pub max_header_preview: Option<usize>,
    /// Rows sampled per column for type inference. Default: 50.
    pub sample_rows: Option<usize>,
    /// Sheet count at which a dataset counts as large. Default: 25.
    pub large_sheets: Option<usize>,
    /// Column count at which a dataset counts as large. Default: 60.
    pub large_max_cols: Option<usize>,
    /// Total row count at which a dataset counts as large. Default: 30000.
    pub large_total_rows: Option<usize>,
}

impl ScanConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(15)
    }

    pub fn effective_batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms.unwrap_or(20))
    }

    pub fn effective_max_header_preview(&self) -> usize {
        self.max_header_preview.unwrap_or(10)
    }

    pub fn effective_sample_rows(&self) -> usize {
        self.sample_rows.unwrap_or(50)
    }

    pub fn effective_large_sheets(&self) -> usize {
        self.large_sheets.unwrap_or(25)
    }

    pub fn effective_large_max_cols(&self) -> usize {
        self.large_max_cols.unwrap_or(60)
    }

    pub fn effective_large_total_rows(&self) -> usize {
        self.large_total_rows.unwrap_or(30_000)
    }

    /// Large when any single cutoff is reached.
    pub fn is_large(&self, sheets: usize, max_cols: usize, total_rows: usize) -> bool {
        sheets >= self.effective_large_sheets()
            || max_cols >= self.effective_large_max_cols()
            || total_rows >= self.effective_large_total_rows()
    }
}
