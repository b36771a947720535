//! Configuration errors.

use super::error_code::{self, ReqscanErrorCode};

/// Errors raised while loading or validating configuration.
///
/// Resolution never fails a run on these: they are downgraded to
/// `ConfigWarning`s and the compiled default is used instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not readable: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },
}

impl ReqscanErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
