//! Error handling for reqscan.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod input_error;
pub mod pipeline_error;
pub mod rule_error;
pub mod sink_error;
pub mod source_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::ReqscanErrorCode;
pub use input_error::InputValidationError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use rule_error::RuleError;
pub use sink_error::SinkError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
