//! Stable string codes for every reqscan error.

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INPUT_INVALID: &str = "INPUT_INVALID";
pub const SOURCE_UNAVAILABLE: &str = "SOURCE_UNAVAILABLE";
pub const RULE_FAILED: &str = "RULE_FAILED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const SINK_ERROR: &str = "SINK_ERROR";
pub const CANCELLED: &str = "CANCELLED";

/// Maps an error to a stable, machine-readable code.
pub trait ReqscanErrorCode {
    fn error_code(&self) -> &'static str;
}
