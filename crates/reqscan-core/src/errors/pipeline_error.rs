//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, ReqscanErrorCode};
use super::{ConfigError, InputValidationError, RuleError, SinkError, SourceError, StorageError};

/// Errors that can occur during a run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputValidationError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// The introspection source could not provide even its metadata.
    #[error("Introspection source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Run cancelled")]
    Cancelled,
}

impl ReqscanErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Input(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Sink(e) => e.error_code(),
            Self::SourceUnavailable { .. } => error_code::SOURCE_UNAVAILABLE,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a run step that accumulates non-fatal errors.
/// Allows partial results to be returned even when some items fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected along the way.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Moves the collected errors of `other` into `self`, returning its data.
    pub fn absorb<U: Default>(&mut self, other: PipelineResult<U>) -> U {
        self.errors.extend(other.errors);
        other.data
    }
}
