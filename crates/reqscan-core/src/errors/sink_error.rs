//! Document sink errors.

use super::error_code::{self, ReqscanErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write document {target}: {message}")]
    WriteFailed { target: String, message: String },
}

impl ReqscanErrorCode for SinkError {
    fn error_code(&self) -> &'static str {
        error_code::SINK_ERROR
    }
}
