//! Snapshot collection: batching, type inference, routine merging, large
//! dataset detection, and early stop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use reqscan_analysis::snapshot::{collect_snapshot, JsonSnapshotSource, SnapshotCollector};
use reqscan_core::config::ReqscanConfig;
use reqscan_core::events::{EventDispatcher, ReqscanEventHandler, SnapshotProgressEvent};
use reqscan_core::traits::{Cancellable, CancellationToken, RunBudget};
use reqscan_core::types::{
    ArtifactSnapshot, ColumnType, EventKind, MenuBinding, Routine, ScheduledJob, SnapshotMetadata,
    TabularSheet, Visibility,
};

fn config(batch_size: usize) -> ReqscanConfig {
    let mut config = ReqscanConfig::default();
    config.scan.batch_size = Some(batch_size);
    config.scan.batch_pause_ms = Some(0);
    config
}

fn sheet(name: &str, rows: usize, cols: usize) -> TabularSheet {
    TabularSheet {
        name: name.into(),
        row_count: rows,
        column_count: cols,
        headers: (0..cols).map(|i| format!("Col{i}")).collect(),
        ..Default::default()
    }
}

fn snapshot(sheets: usize) -> ArtifactSnapshot {
    ArtifactSnapshot {
        metadata: SnapshotMetadata {
            name: "Regnskap".into(),
            ..Default::default()
        },
        scheduled_jobs: vec![ScheduledJob {
            handler: " nightlyClose ".into(),
            event_kind: EventKind::Clock,
            origin: "clock".into(),
        }],
        menu_bindings: vec![
            MenuBinding {
                title: "Lukk periode".into(),
                handler: "closePeriod".into(),
                ..Default::default()
            },
            MenuBinding {
                title: "Lukk igjen".into(),
                handler: "closePeriod".into(),
                ..Default::default()
            },
        ],
        tabular_sheets: (0..sheets).map(|i| sheet(&format!("Ark{i}"), 10, 3)).collect(),
        routines: vec![
            Routine {
                name: "closePeriod".into(),
                visibility: Visibility::Private,
            },
            Routine::public("helper"),
        ],
    }
}

struct ProgressCounter(AtomicUsize);

impl ReqscanEventHandler for ProgressCounter {
    fn on_snapshot_progress(&self, _event: &SnapshotProgressEvent) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn one_progress_event_per_batch() {
    let counter = Arc::new(ProgressCounter(AtomicUsize::new(0)));
    let mut events = EventDispatcher::new();
    events.register(counter.clone());

    let config = config(2);
    let budget = RunBudget::unbounded();
    let source = JsonSnapshotSource::from_snapshot(snapshot(5));
    let collected = SnapshotCollector::new(&config, &budget)
        .with_events(&events)
        .collect(&source)
        .unwrap();

    assert!(collected.is_clean());
    assert_eq!(collected.data.snapshot.tabular_sheets.len(), 5);
    assert!(!collected.data.cancelled);
    assert_eq!(counter.0.load(Ordering::SeqCst), 3);
}

#[test]
fn metrics_describe_the_scanned_sheets() {
    let config = config(15);
    let source = JsonSnapshotSource::from_snapshot(snapshot(4));
    let collected = collect_snapshot(&source, &config, &RunBudget::unbounded())
        .unwrap()
        .data;
    let m = collected.metrics;
    assert_eq!(m.sheets_scanned, 4);
    assert_eq!(m.total_rows, 40);
    assert_eq!(m.max_cols, 3);
    assert_eq!(m.total_cells, 120);
    assert_eq!(m.average_rows_per_sheet, 10.0);
    assert!(!m.is_large_dataset);
}

#[test]
fn any_threshold_marks_a_large_dataset() {
    let mut config = config(15);
    config.scan.large_total_rows = Some(40);
    let source = JsonSnapshotSource::from_snapshot(snapshot(4));
    let collected = collect_snapshot(&source, &config, &RunBudget::unbounded())
        .unwrap()
        .data;
    assert!(collected.metrics.is_large_dataset);
}

#[test]
fn handlers_are_merged_into_routines_once() {
    let config = config(15);
    let source = JsonSnapshotSource::from_snapshot(snapshot(1));
    let routines = collect_snapshot(&source, &config, &RunBudget::unbounded())
        .unwrap()
        .data
        .snapshot
        .routines;
    let names: Vec<&str> = routines.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["closePeriod", "helper", "nightlyClose"]);
    // The declared entry wins over the handler-derived one.
    assert_eq!(routines[0].visibility, Visibility::Private);
}

#[test]
fn headers_are_cut_and_types_inferred() {
    let mut config = config(15);
    config.scan.max_header_preview = Some(2);
    let mut snap = snapshot(0);
    snap.tabular_sheets = vec![sheet("Medlemmer", 3, 4)];
    let source = JsonSnapshotSource::from_snapshot(snap).with_samples(
        "Medlemmer",
        vec![
            vec![json!("2024-05-01"), json!(null)],
            vec![json!("ola@example.no"), json!("kari@example.no")],
            vec![json!(true)],
            vec![json!(1)],
        ],
    );
    let collected = collect_snapshot(&source, &config, &RunBudget::unbounded())
        .unwrap()
        .data;
    let sheet = &collected.snapshot.tabular_sheets[0];
    assert_eq!(sheet.headers, vec!["Col0", "Col1"]);
    assert_eq!(sheet.column_types, vec![ColumnType::Date, ColumnType::Email]);
}

#[test]
fn exhausted_budget_stops_before_the_first_batch() {
    let config = config(2);
    let token = CancellationToken::new();
    token.cancel();
    let budget = RunBudget::unbounded().with_token(token);
    let source = JsonSnapshotSource::from_snapshot(snapshot(5));
    let collected = collect_snapshot(&source, &config, &budget).unwrap().data;
    assert!(collected.cancelled);
    assert!(collected.snapshot.tabular_sheets.is_empty());
    // Non-sheet sections are still collected.
    assert_eq!(collected.snapshot.menu_bindings.len(), 2);
}

#[test]
fn cancellation_mid_scan_keeps_whole_batches() {
    struct CancelAfterFirst(CancellationToken);

    impl ReqscanEventHandler for CancelAfterFirst {
        fn on_snapshot_progress(&self, _event: &SnapshotProgressEvent) {
            self.0.cancel();
        }
    }

    let token = CancellationToken::new();
    let mut events = EventDispatcher::new();
    events.register(Arc::new(CancelAfterFirst(token.clone())));

    let config = config(2);
    let budget = RunBudget::unbounded().with_token(token);
    let source = JsonSnapshotSource::from_snapshot(snapshot(5));
    let collected = SnapshotCollector::new(&config, &budget)
        .with_events(&events)
        .collect(&source)
        .unwrap()
        .data;
    assert!(collected.cancelled);
    let names: Vec<&str> = collected
        .snapshot
        .tabular_sheets
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ark0", "Ark1"]);
}

#[test]
fn snapshot_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let mut value = serde_json::to_value(snapshot(2)).unwrap();
    value["columnSamples"] = json!({"Ark0": [["12,5"], ["ja"]]});
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let source = JsonSnapshotSource::from_path(&path).unwrap();
    let collected = collect_snapshot(&source, &config(15), &RunBudget::unbounded())
        .unwrap()
        .data;
    assert_eq!(collected.snapshot.metadata.name, "Regnskap");
    assert_eq!(collected.snapshot.tabular_sheets.len(), 2);
    assert_eq!(collected.snapshot.tabular_sheets[0].column_types[1], ColumnType::Boolean);
}
