//! Introspection source backed by a serialized snapshot file.
//!
//! The file is an `ArtifactSnapshot` in JSON with an optional
//! `columnSamples` map of sheet name → columns → sample values.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use reqscan_core::errors::SourceError;
use reqscan_core::traits::IntrospectionSource;
use reqscan_core::types::collections::FxHashMap;
use reqscan_core::types::{
    ArtifactSnapshot, MenuBinding, Routine, ScheduledJob, SnapshotMetadata, TabularSheet,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SnapshotFile {
    #[serde(flatten)]
    snapshot: ArtifactSnapshot,
    column_samples: FxHashMap<String, Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Default)]
pub struct JsonSnapshotSource {
    snapshot: ArtifactSnapshot,
    column_samples: FxHashMap<String, Vec<Vec<Value>>>,
}

impl JsonSnapshotSource {
    pub fn from_snapshot(snapshot: ArtifactSnapshot) -> Self {
        Self {
            snapshot,
            column_samples: FxHashMap::default(),
        }
    }

    pub fn with_samples(mut self, sheet: impl Into<String>, columns: Vec<Vec<Value>>) -> Self {
        self.column_samples.insert(sheet.into(), columns);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Self::parse(json, "<string>")
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::SnapshotUnreadable {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &display)
    }

    fn parse(json: &str, origin: &str) -> Result<Self, SourceError> {
        let file: SnapshotFile =
            serde_json::from_str(json).map_err(|e| SourceError::SnapshotUnreadable {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            snapshot: file.snapshot,
            column_samples: file.column_samples,
        })
    }
}

impl IntrospectionSource for JsonSnapshotSource {
    fn metadata(&self) -> Result<SnapshotMetadata, SourceError> {
        Ok(self.snapshot.metadata.clone())
    }

    fn scheduled_jobs(&self) -> Result<Vec<ScheduledJob>, SourceError> {
        Ok(self.snapshot.scheduled_jobs.clone())
    }

    fn menu_bindings(&self) -> Result<Vec<MenuBinding>, SourceError> {
        Ok(self.snapshot.menu_bindings.clone())
    }

    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self
            .snapshot
            .tabular_sheets
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    fn sheet(&self, name: &str) -> Result<TabularSheet, SourceError> {
        self.snapshot
            .tabular_sheets
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| SourceError::SheetUnavailable {
                name: name.to_string(),
                message: "not in snapshot".to_string(),
            })
    }

    fn column_samples(&self, sheet: &str, max_rows: usize) -> Result<Vec<Vec<Value>>, SourceError> {
        Ok(self
            .column_samples
            .get(sheet)
            .map(|columns| {
                columns
                    .iter()
                    .map(|c| c.iter().take(max_rows).cloned().collect())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn routines(&self) -> Result<Vec<Routine>, SourceError> {
        Ok(self.snapshot.routines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_snapshot_with_samples() {
        let json = r#"{
            "metadata": {"name": "Styre", "identifier": "abc", "timestamp": "2026-01-01T00:00:00Z"},
            "scheduledJobs": [{"handler": "nightly", "eventKind": "CLOCK", "origin": "clock"}],
            "tabularSheets": [{"name": "Budsjett", "rowCount": 10, "columnCount": 2, "headers": ["Dato", "Beløp"]}],
            "routines": [{"name": "nightly"}],
            "columnSamples": {"Budsjett": [["2024-01-01"], [12.5]]}
        }"#;
        let source = JsonSnapshotSource::from_json(json).unwrap();
        assert_eq!(source.metadata().unwrap().name, "Styre");
        assert_eq!(source.sheet_names().unwrap(), vec!["Budsjett"]);
        assert_eq!(source.sheet("Budsjett").unwrap().row_count, 10);
        assert_eq!(source.column_samples("Budsjett", 5).unwrap().len(), 2);
        assert!(source.sheet("Nope").is_err());
    }

    #[test]
    fn host_trigger_labels_are_accepted() {
        use reqscan_core::types::EventKind;

        let json = r#"{
            "metadata": {"name": "Styre"},
            "scheduledJobs": [
                {"handler": "onSubmit", "eventKind": "ON_FORM_SUBMIT"},
                {"handler": "nightly", "eventKind": "TIME_DRIVEN"},
                {"handler": "opened", "eventKind": "ON_OPEN"},
                {"handler": "calendarSync", "eventKind": "ON_EVENT_UPDATED"}
            ]
        }"#;
        let source = JsonSnapshotSource::from_json(json).unwrap();
        let kinds: Vec<EventKind> = source
            .scheduled_jobs()
            .unwrap()
            .into_iter()
            .map(|j| j.event_kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::FormSubmit,
                EventKind::Clock,
                EventKind::Open,
                EventKind::Other("ON_EVENT_UPDATED".into()),
            ]
        );
    }

    #[test]
    fn invalid_json_is_a_source_error() {
        assert!(JsonSnapshotSource::from_json("{not json").is_err());
    }
}
