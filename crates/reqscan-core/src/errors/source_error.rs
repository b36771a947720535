//! Introspection source errors.

use super::error_code::{self, ReqscanErrorCode};

/// A sub-query against the introspection source could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source section {section} unavailable: {message}")]
    SectionUnavailable { section: String, message: String },

    #[error("Sheet {name} unavailable: {message}")]
    SheetUnavailable { name: String, message: String },

    #[error("Failed to read snapshot {path}: {message}")]
    SnapshotUnreadable { path: String, message: String },
}

impl ReqscanErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        error_code::SOURCE_UNAVAILABLE
    }
}
