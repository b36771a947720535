//! Building the per-run artifact snapshot from an introspection source.

pub mod collector;
pub mod column_types;
pub mod headers;
pub mod json_source;

pub use collector::{collect_snapshot, CollectedSnapshot, SnapshotCollector};
pub use column_types::infer_column_type;
pub use headers::{find_header_duplicates, HeaderDuplicate};
pub use json_source::JsonSnapshotSource;
