//! Event payload types.

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub artifact: String,
    pub version: String,
}

/// Payload for `on_snapshot_progress`.
#[derive(Debug, Clone)]
pub struct SnapshotProgressEvent {
    pub sheets_scanned: usize,
    pub sheets_total: usize,
}

/// Payload for `on_dedup_progress`.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Payload for `on_rule_failed`.
#[derive(Debug, Clone)]
pub struct RuleFailedEvent {
    pub rule: String,
    pub message: String,
}

/// Payload for `on_config_warning`.
#[derive(Debug, Clone)]
pub struct ConfigWarningEvent {
    pub field: String,
    pub message: String,
}

/// Payload for `on_run_complete`.
#[derive(Debug, Clone)]
pub struct RunCompleteEvent {
    pub candidates_kept: usize,
    pub findings: usize,
    pub score: u8,
    pub grade: char,
    pub cancelled: bool,
    pub duration_ms: u64,
}
