//! Input validation errors, raised at API boundaries.

use super::error_code::{self, ReqscanErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum InputValidationError {
    #[error("Threshold {value} is outside [0, 1]")]
    ThresholdOutOfRange { value: f64 },

    #[error("Batch size must be greater than 0")]
    ZeroBatchSize,

    #[error("Requirement {id}: progress {raw:?} is not a number in [0, 100]")]
    InvalidProgress { id: String, raw: String },

    #[error("Requirement row {row}: {message}")]
    MalformedRecord { row: usize, message: String },
}

impl ReqscanErrorCode for InputValidationError {
    fn error_code(&self) -> &'static str {
        error_code::INPUT_INVALID
    }
}
