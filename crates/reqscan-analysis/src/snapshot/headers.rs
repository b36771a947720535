//! Header names shared by more than one sheet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use reqscan_core::types::ArtifactSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDuplicate {
    /// Header as first seen.
    pub header: String,
    /// Sheets using it, in snapshot order.
    pub sheets: Vec<String>,
}

/// Headers are compared trimmed and case-insensitively. Output is sorted by
/// normalized header.
pub fn find_header_duplicates(snapshot: &ArtifactSnapshot) -> Vec<HeaderDuplicate> {
    let mut by_header: BTreeMap<String, HeaderDuplicate> = BTreeMap::new();
    for sheet in &snapshot.tabular_sheets {
        for header in &sheet.headers {
            let trimmed = header.trim();
            if trimmed.is_empty() {
                continue;
            }
            let entry = by_header
                .entry(trimmed.to_lowercase())
                .or_insert_with(|| HeaderDuplicate {
                    header: trimmed.to_string(),
                    sheets: Vec::new(),
                });
            if !entry.sheets.contains(&sheet.name) {
                entry.sheets.push(sheet.name.clone());
            }
        }
    }
    by_header
        .into_values()
        .filter(|d| d.sheets.len() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqscan_core::types::TabularSheet;

    fn sheet(name: &str, headers: &[&str]) -> TabularSheet {
        TabularSheet {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn finds_case_insensitive_duplicates_across_sheets() {
        let snapshot = ArtifactSnapshot {
            tabular_sheets: vec![
                sheet("Budsjett", &["Dato", "Beløp", "Dato"]),
                sheet("Oppgaver", &["dato ", "Status"]),
                sheet("Logg", &["Status", ""]),
            ],
            ..Default::default()
        };
        let dups = find_header_duplicates(&snapshot);
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].header, "Dato");
        assert_eq!(dups[0].sheets, vec!["Budsjett", "Oppgaver"]);
        assert_eq!(dups[1].sheets, vec!["Oppgaver", "Logg"]);
    }
}
