//! Auto-generated requirement candidates.

use serde::{Deserialize, Serialize};

use super::requirement::Priority;

/// Which structural fact produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    ScheduledJob,
    MenuBinding,
    DataField,
    Heuristic,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScheduledJob => "scheduledJob",
            Self::MenuBinding => "menuBinding",
            Self::DataField => "dataField",
            Self::Heuristic => "heuristic",
        }
    }
}

/// Provenance of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Evidence {
    Handler { handler: String, event: String },
    Menu { title: String, handler: String },
    Field { sheet: String, field: String },
    Keyword { keyword: String, area: String },
}

impl Evidence {
    /// Short human-readable summary for reports and ingest comments.
    pub fn summary(&self) -> String {
        match self {
            Self::Handler { handler, event } => format!("{event} → {handler}"),
            Self::Menu { title, handler } => format!("{title} → {handler}"),
            Self::Field { sheet, field } => format!("{sheet}.{field}"),
            Self::Keyword { keyword, area } => format!("{area} ({keyword})"),
        }
    }
}

/// A not-yet-confirmed requirement statement.
///
/// Never mutated after deduplication; the dedup engine drops records
/// instead of rewriting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub text: String,
    pub source_kind: SourceKind,
    pub auto_priority: Priority,
    pub evidence: Evidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CandidateRecord {
    pub fn new(
        text: impl Into<String>,
        source_kind: SourceKind,
        auto_priority: Priority,
        evidence: Evidence,
    ) -> Self {
        Self {
            text: text.into(),
            source_kind,
            auto_priority,
            evidence,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
