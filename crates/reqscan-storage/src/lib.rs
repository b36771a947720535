//! reqscan-storage: SQLite-backed metrics history and requirement store,
//! plus a file document sink.

pub mod connection;
pub mod documents;
pub mod metrics;
pub mod migrations;
pub mod queries;
pub mod requirements;

pub use connection::DatabaseManager;
pub use documents::FileDocumentSink;
pub use metrics::{InMemoryMetricsLog, SqliteMetricsLog, TrendPoint};
pub use requirements::SqliteRequirementStore;

use reqscan_core::errors::StorageError;

pub(crate) fn to_storage_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
