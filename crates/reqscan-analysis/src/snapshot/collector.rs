//! Batched snapshot collection with per-item failure isolation.
//!
//! Only a missing metadata section is fatal. Every other section or sheet
//! that fails is skipped, logged, and recorded as a non-fatal error.

use std::time::Instant;

use reqscan_core::config::ReqscanConfig;
use reqscan_core::errors::{PipelineError, PipelineResult};
use reqscan_core::events::{EventDispatcher, SnapshotProgressEvent};
use reqscan_core::traits::{IntrospectionSource, RunBudget};
use reqscan_core::types::collections::FxHashSet;
use reqscan_core::types::{ArtifactSnapshot, PerformanceMetrics, Routine, TabularSheet};

use super::column_types::infer_column_type;
use super::headers::{find_header_duplicates, HeaderDuplicate};

#[derive(Debug, Clone, Default)]
pub struct CollectedSnapshot {
    pub snapshot: ArtifactSnapshot,
    pub metrics: PerformanceMetrics,
    pub header_duplicates: Vec<HeaderDuplicate>,
    /// The budget ran out between sheet batches.
    pub cancelled: bool,
}

pub struct SnapshotCollector<'a> {
    config: &'a ReqscanConfig,
    budget: &'a RunBudget,
    events: Option<&'a EventDispatcher>,
}

impl<'a> SnapshotCollector<'a> {
    pub fn new(config: &'a ReqscanConfig, budget: &'a RunBudget) -> Self {
        Self {
            config,
            budget,
            events: None,
        }
    }

    pub fn with_events(mut self, events: &'a EventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    pub fn collect(
        &self,
        source: &dyn IntrospectionSource,
    ) -> Result<PipelineResult<CollectedSnapshot>, PipelineError> {
        let started = Instant::now();

        let metadata = source.metadata().map_err(|e| PipelineError::SourceUnavailable {
            message: e.to_string(),
        })?;

        let mut result = PipelineResult::new(CollectedSnapshot::default());

        let scheduled_jobs = source.scheduled_jobs().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "scheduled jobs unavailable");
            result.add_error(e);
            Vec::new()
        });
        let menu_bindings = source.menu_bindings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "menu bindings unavailable");
            result.add_error(e);
            Vec::new()
        });
        let declared_routines = source.routines().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "routines unavailable");
            result.add_error(e);
            Vec::new()
        });
        let sheet_names = source.sheet_names().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "sheet list unavailable");
            result.add_error(e);
            Vec::new()
        });

        let (sheets, cancelled) = self.collect_sheets(source, &sheet_names, &mut result);

        let mut snapshot = ArtifactSnapshot {
            metadata,
            scheduled_jobs,
            menu_bindings,
            tabular_sheets: sheets,
            routines: Vec::new(),
        };
        snapshot.routines = merge_routines(declared_routines, &snapshot);

        let metrics = self.performance_metrics(&snapshot, started);
        if metrics.is_large_dataset {
            tracing::info!(
                sheets = metrics.sheets_scanned,
                total_rows = metrics.total_rows,
                max_cols = metrics.max_cols,
                "large dataset"
            );
        }

        result.data = CollectedSnapshot {
            header_duplicates: find_header_duplicates(&snapshot),
            snapshot,
            metrics,
            cancelled,
        };
        Ok(result)
    }

    fn collect_sheets(
        &self,
        source: &dyn IntrospectionSource,
        names: &[String],
        result: &mut PipelineResult<CollectedSnapshot>,
    ) -> (Vec<TabularSheet>, bool) {
        let batch_size = self.config.scan.effective_batch_size();
        let pause = self.config.scan.effective_batch_pause();
        let max_headers = self.config.scan.effective_max_header_preview();
        let sample_rows = self.config.scan.effective_sample_rows();

        let mut sheets = Vec::with_capacity(names.len());
        let batches: Vec<&[String]> = names.chunks(batch_size).collect();
        for (index, batch) in batches.iter().enumerate() {
            if self.budget.should_stop() {
                tracing::info!(scanned = sheets.len(), total = names.len(), "sheet scan stopped early");
                return (sheets, true);
            }
            if index > 0 && !pause.is_zero() {
                std::thread::sleep(pause);
            }

            for name in batch.iter() {
                match source.sheet(name) {
                    Ok(mut sheet) => {
                        sheet.headers.truncate(max_headers);
                        if sheet.column_types.is_empty() && !sheet.headers.is_empty() {
                            self.infer_types(source, &mut sheet, sample_rows, result);
                        }
                        sheet.column_types.truncate(sheet.headers.len());
                        sheets.push(sheet);
                    }
                    Err(e) => {
                        tracing::warn!(sheet = %name, error = %e, "skipping sheet");
                        result.add_error(e);
                    }
                }
            }

            if let Some(events) = self.events {
                events.emit_snapshot_progress(&SnapshotProgressEvent {
                    sheets_scanned: sheets.len(),
                    sheets_total: names.len(),
                });
            }
        }
        (sheets, false)
    }

    fn infer_types(
        &self,
        source: &dyn IntrospectionSource,
        sheet: &mut TabularSheet,
        sample_rows: usize,
        result: &mut PipelineResult<CollectedSnapshot>,
    ) {
        match source.column_samples(&sheet.name, sample_rows) {
            Ok(columns) if !columns.is_empty() => {
                sheet.column_types = columns
                    .iter()
                    .take(sheet.headers.len())
                    .map(|samples| infer_column_type(samples))
                    .collect();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(sheet = %sheet.name, error = %e, "no column samples");
                result.add_error(e);
            }
        }
    }

    fn performance_metrics(&self, snapshot: &ArtifactSnapshot, started: Instant) -> PerformanceMetrics {
        let sheets = &snapshot.tabular_sheets;
        let total_rows = snapshot.total_rows();
        let max_cols = snapshot.max_cols();
        let sheets_scanned = sheets.len();
        PerformanceMetrics {
            sheets_scanned,
            total_rows,
            max_cols,
            total_cells: sheets.iter().map(|s| s.row_count * s.column_count).sum(),
            scan_duration_ms: started.elapsed().as_millis() as u64,
            average_rows_per_sheet: if sheets_scanned == 0 {
                0.0
            } else {
                total_rows as f64 / sheets_scanned as f64
            },
            is_large_dataset: self.config.scan.is_large(sheets_scanned, max_cols, total_rows),
        }
    }
}

/// Declared routines first, then trigger and menu handlers not already
/// present. The first occurrence of a name wins.
fn merge_routines(declared: Vec<Routine>, snapshot: &ArtifactSnapshot) -> Vec<Routine> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let handlers = snapshot
        .scheduled_jobs
        .iter()
        .map(|j| j.handler.as_str())
        .chain(snapshot.menu_bindings.iter().map(|m| m.handler.as_str()))
        .map(|h| Routine::public(h.trim()));

    declared
        .into_iter()
        .chain(handlers)
        .filter(|r| !r.name.is_empty() && seen.insert(r.name.clone()))
        .collect()
}

/// Collect with default pacing and no event handlers.
pub fn collect_snapshot(
    source: &dyn IntrospectionSource,
    config: &ReqscanConfig,
    budget: &RunBudget,
) -> Result<PipelineResult<CollectedSnapshot>, PipelineError> {
    SnapshotCollector::new(config, budget).collect(source)
}
