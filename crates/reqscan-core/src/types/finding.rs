//! Output of static-analysis rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFinding {
    pub rule_name: String,
    #[serde(rename = "type")]
    pub finding_type: String,
    pub subjects: Vec<String>,
    pub note: String,
}
