//! Capability traits at the seams between the engine and its collaborators.

pub mod cancellation;
pub mod stores;

pub use cancellation::{Cancellable, CancellationToken, RunBudget};
pub use stores::{
    DocumentReceipt, DocumentSink, IngestOptions, IngestSummary, IntrospectionSource,
    MetricsEntry, MetricsLog, RequirementStore,
};
