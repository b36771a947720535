//! Immutable per-run picture of the analyzed artifact.

use serde::{Deserialize, Serialize};

/// Everything the introspection layer reported for one run.
/// Built once by the snapshot collector and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactSnapshot {
    pub metadata: SnapshotMetadata,
    pub scheduled_jobs: Vec<ScheduledJob>,
    pub menu_bindings: Vec<MenuBinding>,
    pub tabular_sheets: Vec<TabularSheet>,
    pub routines: Vec<Routine>,
}

impl ArtifactSnapshot {
    /// Concatenation of all routine names, used by heuristic candidates.
    pub fn routine_corpus(&self) -> String {
        self.routines
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn total_rows(&self) -> usize {
        self.tabular_sheets.iter().map(|s| s.row_count).sum()
    }

    pub fn max_cols(&self) -> usize {
        self.tabular_sheets
            .iter()
            .map(|s| s.column_count)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub name: String,
    pub identifier: String,
    /// RFC 3339 timestamp of the snapshot.
    pub timestamp: String,
    pub timezone: String,
    pub actor: String,
}

/// What causes a scheduled job to fire.
///
/// Serialized as its label. Any label is accepted on input; see
/// [`EventKind::from_label`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Clock,
    FormSubmit,
    Open,
    Edit,
    Change,
    Other(String),
}

impl EventKind {
    /// Classify a host event label by substring, case-insensitively:
    /// `CLOCK` or `TIME`, then `FORM`, `OPEN`, `EDIT`, `CHANGE`. Anything
    /// else is kept verbatim in `Other`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        let upper = trimmed.to_uppercase();
        if upper.contains("CLOCK") || upper.contains("TIME") {
            Self::Clock
        } else if upper.contains("FORM") {
            Self::FormSubmit
        } else if upper.contains("OPEN") {
            Self::Open
        } else if upper.contains("EDIT") {
            Self::Edit
        } else if upper.contains("CHANGE") {
            Self::Change
        } else {
            Self::Other(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Clock => "CLOCK",
            Self::FormSubmit => "FORM_SUBMIT",
            Self::Open => "OPEN",
            Self::Edit => "EDIT",
            Self::Change => "CHANGE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EventKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.label().to_string()
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduledJob {
    pub handler: String,
    pub event_kind: EventKind,
    /// Where the trigger is attached (spreadsheet, form, clock).
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuBinding {
    pub title: String,
    pub handler: String,
    pub sheet: Option<String>,
    pub role: Option<String>,
    pub active: bool,
}

impl Default for MenuBinding {
    fn default() -> Self {
        Self {
            title: String::new(),
            handler: String::new(),
            sheet: None,
            role: None,
            active: true,
        }
    }
}

/// Inferred type of a sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Date,
    Number,
    Boolean,
    Email,
    Url,
    String,
    Empty,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Email => "email",
            Self::Url => "url",
            Self::String => "string",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabularSheet {
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub hidden: bool,
    /// Header names, possibly truncated to the preview width.
    pub headers: Vec<String>,
    /// Inferred type per header, index-aligned with `headers` when present.
    pub column_types: Vec<ColumnType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Routine {
    pub name: String,
    pub visibility: Visibility,
}

impl Routine {
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
        }
    }
}
