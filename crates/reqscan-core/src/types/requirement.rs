//! Existing requirement records and priority tiers.

use serde::{Deserialize, Serialize};

/// Priority tier of a requirement or candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Must,
    Should,
    Could,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::Could => "COULD",
        }
    }

    /// Parse a canonical name or a localized label (`MÅ`, `BØR`, `KAN`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "MUST" | "MÅ" | "MA" => Some(Self::Must),
            "SHOULD" | "BØR" | "BOR" => Some(Self::Should),
            "COULD" | "KAN" | "MAY" => Some(Self::Could),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display labels for the three priority tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLabels {
    pub must: String,
    pub should: String,
    pub could: String,
}

impl PriorityLabels {
    pub fn norwegian() -> Self {
        Self {
            must: "MÅ".to_string(),
            should: "BØR".to_string(),
            could: "KAN".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            must: "MUST".to_string(),
            should: "SHOULD".to_string(),
            could: "COULD".to_string(),
        }
    }

    pub fn label(&self, priority: Priority) -> &str {
        match priority {
            Priority::Must => &self.must,
            Priority::Should => &self.should,
            Priority::Could => &self.could,
        }
    }
}

impl Default for PriorityLabels {
    fn default() -> Self {
        Self::norwegian()
    }
}

/// A requirement already present in the requirement store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRecord {
    /// `<chapter-code>-<sequence>`, e.g. `K5-012`.
    pub id: String,
    pub text: String,
    pub priority: Priority,
    /// In `[0, 100]`.
    pub progress_percent: f64,
    pub chapter: String,
}

impl RequirementRecord {
    pub fn is_unimplemented(&self) -> bool {
        self.progress_percent <= 0.0
    }

    pub fn is_implemented(&self) -> bool {
        self.progress_percent >= 100.0
    }
}
