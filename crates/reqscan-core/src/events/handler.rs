//! Event handler trait. Every method defaults to a no-op so handlers only
//! implement what they care about.

use super::types::*;

pub trait ReqscanEventHandler: Send + Sync {
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_snapshot_progress(&self, _event: &SnapshotProgressEvent) {}
    fn on_dedup_progress(&self, _event: &DedupProgressEvent) {}
    fn on_rule_failed(&self, _event: &RuleFailedEvent) {}
    fn on_config_warning(&self, _event: &ConfigWarningEvent) {}
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}
}
