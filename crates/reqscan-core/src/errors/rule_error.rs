//! Rule plugin errors.

use super::error_code::{self, ReqscanErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Rule {rule} failed: {message}")]
    Failed { rule: String, message: String },

    #[error("Rule {rule} panicked: {message}")]
    Panicked { rule: String, message: String },
}

impl RuleError {
    /// Name of the rule that failed.
    pub fn rule(&self) -> &str {
        match self {
            Self::Failed { rule, .. } | Self::Panicked { rule, .. } => rule,
        }
    }
}

impl ReqscanErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        error_code::RULE_FAILED
    }
}
