//! Gap analysis and rule plugin configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GapConfig {
    /// Jaccard score at which a routine counts as covered by a text. Default: 0.60.
    pub coverage_threshold: Option<f64>,
    /// Routine names exempt from the undocumented check, in addition to the
    /// built-in lifecycle hooks.
    #[serde(default)]
    pub extra_exempt: Vec<String>,
}

impl GapConfig {
    pub fn effective_coverage_threshold(&self) -> f64 {
        self.coverage_threshold.unwrap_or(0.60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Jaccard score at which two routine names are near-duplicates. Default: 0.95.
    pub near_duplicate_threshold: Option<f64>,
    /// Names of built-in rules to skip.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl RulesConfig {
    pub fn effective_near_duplicate_threshold(&self) -> f64 {
        self.near_duplicate_threshold.unwrap_or(0.95)
    }

    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled.iter().any(|d| d == rule)
    }
}
