//! Deduplication engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DedupConfig {
    /// Candidates per batch. Default: 400.
    pub batch_size: Option<usize>,
    /// Pause after this many batches. Default: 3.
    pub yield_every: Option<usize>,
    /// Length of the pause in milliseconds. Default: 20.
    pub yield_pause_ms: Option<u64>,
}

impl DedupConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(400)
    }

    pub fn effective_yield_every(&self) -> usize {
        self.yield_every.unwrap_or(3)
    }

    pub fn effective_yield_pause(&self) -> Duration {
        Duration::from_millis(self.yield_pause_ms.unwrap_or(20))
    }
}
