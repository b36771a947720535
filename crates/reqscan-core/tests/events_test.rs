//! Event dispatch: delivery, counting, and panic isolation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqscan_core::events::*;

struct CountingHandler {
    progress: AtomicUsize,
    completed: AtomicUsize,
}

impl CountingHandler {
    fn new() -> Self {
        Self {
            progress: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }
}

impl ReqscanEventHandler for CountingHandler {
    fn on_dedup_progress(&self, _event: &DedupProgressEvent) {
        self.progress.fetch_add(1, Ordering::SeqCst);
    }

    fn on_run_complete(&self, _event: &RunCompleteEvent) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

struct PanickingHandler;

impl ReqscanEventHandler for PanickingHandler {
    fn on_dedup_progress(&self, _event: &DedupProgressEvent) {
        panic!("handler blew up");
    }
}

fn progress(processed: usize) -> DedupProgressEvent {
    DedupProgressEvent {
        processed,
        total: 10,
        percent: (processed * 10) as u8,
    }
}

#[test]
fn empty_dispatcher_is_a_no_op() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_dedup_progress(&progress(1));
}

#[test]
fn every_handler_receives_every_event() {
    let a = Arc::new(CountingHandler::new());
    let b = Arc::new(CountingHandler::new());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());

    dispatcher.emit_dedup_progress(&progress(5));
    dispatcher.emit_dedup_progress(&progress(10));
    dispatcher.emit_run_complete(&RunCompleteEvent {
        candidates_kept: 3,
        findings: 0,
        score: 90,
        grade: 'A',
        cancelled: false,
        duration_ms: 12,
    });

    assert_eq!(a.progress.load(Ordering::SeqCst), 2);
    assert_eq!(b.progress.load(Ordering::SeqCst), 2);
    assert_eq!(a.completed.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_handler_does_not_block_later_handlers() {
    let counter = Arc::new(CountingHandler::new());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(PanickingHandler));
    dispatcher.register(counter.clone());

    dispatcher.emit_dedup_progress(&progress(3));

    assert_eq!(counter.progress.load(Ordering::SeqCst), 1);
}
