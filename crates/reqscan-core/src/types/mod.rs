//! Data model shared by every reqscan crate.

pub mod candidate;
pub mod collections;
pub mod finding;
pub mod metrics;
pub mod requirement;
pub mod snapshot;

pub use candidate::{CandidateRecord, Evidence, SourceKind};
pub use finding::RuleFinding;
pub use metrics::{HealthSummary, MetricsLogRow, PerformanceMetrics};
pub use requirement::{Priority, PriorityLabels, RequirementRecord};
pub use snapshot::{
    ArtifactSnapshot, ColumnType, EventKind, MenuBinding, Routine, ScheduledJob,
    SnapshotMetadata, TabularSheet, Visibility,
};
