//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::ReqscanEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ReqscanEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn ReqscanEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ReqscanEventHandler)>(&self, event: &'static str, f: F) {
        for (index, handler) in self.handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event, handler = index, "event handler panicked");
            }
        }
    }

    pub fn emit_run_started(&self, event: &RunStartedEvent) {
        self.emit("run_started", |h| h.on_run_started(event));
    }

    pub fn emit_snapshot_progress(&self, event: &SnapshotProgressEvent) {
        self.emit("snapshot_progress", |h| h.on_snapshot_progress(event));
    }

    pub fn emit_dedup_progress(&self, event: &DedupProgressEvent) {
        self.emit("dedup_progress", |h| h.on_dedup_progress(event));
    }

    pub fn emit_rule_failed(&self, event: &RuleFailedEvent) {
        self.emit("rule_failed", |h| h.on_rule_failed(event));
    }

    pub fn emit_config_warning(&self, event: &ConfigWarningEvent) {
        self.emit("config_warning", |h| h.on_config_warning(event));
    }

    pub fn emit_run_complete(&self, event: &RunCompleteEvent) {
        self.emit("run_complete", |h| h.on_run_complete(event));
    }
}
