//! Storage errors.

use super::error_code::{self, ReqscanErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration {version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Lock poisoned: {what}")]
    LockPoisoned { what: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ReqscanErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
