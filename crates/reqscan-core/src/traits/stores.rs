//! External collaborators: introspection source, requirement store,
//! metrics log, and document sink.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineResult, SinkError, SourceError, StorageError};
use crate::types::{
    CandidateRecord, MenuBinding, MetricsLogRow, PriorityLabels, RequirementRecord, Routine,
    ScheduledJob, SnapshotMetadata, TabularSheet,
};

/// Read-only view of the artifact under analysis.
///
/// Every section can fail independently; only `metadata` failing is fatal
/// for a run.
pub trait IntrospectionSource {
    fn metadata(&self) -> Result<SnapshotMetadata, SourceError>;

    fn scheduled_jobs(&self) -> Result<Vec<ScheduledJob>, SourceError>;

    fn menu_bindings(&self) -> Result<Vec<MenuBinding>, SourceError>;

    fn sheet_names(&self) -> Result<Vec<String>, SourceError>;

    fn sheet(&self, name: &str) -> Result<TabularSheet, SourceError>;

    /// Sample cell values per column, used for type inference when the
    /// source does not report column types itself.
    fn column_samples(
        &self,
        _sheet: &str,
        _max_rows: usize,
    ) -> Result<Vec<Vec<serde_json::Value>>, SourceError> {
        Ok(Vec::new())
    }

    fn routines(&self) -> Result<Vec<Routine>, SourceError>;
}

/// Options for writing candidates back to the requirement store.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub top_n: usize,
    pub labels: PriorityLabels,
    pub version: String,
    /// Stamp written to the last-modified column.
    pub timestamp: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 400,
            top_n: 300,
            labels: PriorityLabels::default(),
            version: String::new(),
            timestamp: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Identifiers present more than once after the ingest.
    pub duplicate_ids: Vec<String>,
}

/// Tabular store of existing requirements.
pub trait RequirementStore {
    /// Read all valid records. Invalid rows are skipped and reported as
    /// non-fatal errors.
    fn read_all(&self) -> Result<PipelineResult<Vec<RequirementRecord>>, StorageError>;

    /// Append new candidates and annotate exact matches.
    fn ingest(
        &self,
        candidates: &[CandidateRecord],
        options: &IngestOptions,
    ) -> Result<IngestSummary, StorageError>;
}

/// A metrics row together with its monotonically increasing run id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEntry {
    pub run_id: i64,
    pub row: MetricsLogRow,
}

/// Append-only log of run summaries.
pub trait MetricsLog {
    /// Append a row, returning its run id.
    fn append(&self, row: &MetricsLogRow) -> Result<i64, StorageError>;

    /// The most recently appended row.
    fn latest(&self) -> Result<Option<MetricsEntry>, StorageError>;

    /// All rows with `timestamp >= since`, oldest first.
    fn since(&self, since: &str) -> Result<Vec<MetricsEntry>, StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReceipt {
    pub location: String,
    pub bytes: usize,
    /// Hex digest of the written content.
    pub content_hash: String,
}

/// Destination of the long-form report. Every write fully replaces prior
/// content.
pub trait DocumentSink {
    fn replace(&self, title: &str, body: &str) -> Result<DocumentReceipt, SinkError>;
}
