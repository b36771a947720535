//! Requirement store ingest and metrics history configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// Write candidates back to the requirement store. Default: false.
    pub enabled: Option<bool>,
    /// Rows committed per transaction. Default: 400.
    pub batch_size: Option<usize>,
    /// Maximum candidates kept after scoring. Default: 300.
    pub top_n: Option<usize>,
}

impl IngestConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(400)
    }

    pub fn effective_top_n(&self) -> usize {
        self.top_n.unwrap_or(300)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryConfig {
    /// Engine version recorded in each metrics row. Default: crate version.
    pub version: Option<String>,
    /// Free-form commit label recorded in each metrics row.
    pub commit_label: Option<String>,
}

impl HistoryConfig {
    pub fn effective_version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    pub fn effective_commit_label(&self) -> String {
        self.commit_label.clone().unwrap_or_default()
    }
}
