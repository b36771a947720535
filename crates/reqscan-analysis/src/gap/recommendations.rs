//! Ranked remediation recommendations from a fixed weight table.

use serde::{Deserialize, Serialize};

use reqscan_core::config::ReportLanguage;

use super::analyzer::GapReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ZeroProgressMust,
    Undocumented,
    ZeroProgress,
    Partial,
    DuplicateHeaders,
}

impl RecommendationKind {
    /// Rank weight; higher is more urgent.
    pub fn weight(self) -> u32 {
        match self {
            Self::ZeroProgressMust => 100,
            Self::Undocumented => 80,
            Self::ZeroProgress => 70,
            Self::Partial => 60,
            Self::DuplicateHeaders => 40,
        }
    }

    fn message(self, language: ReportLanguage, count: usize) -> String {
        match (language, self) {
            (ReportLanguage::No, Self::ZeroProgressMust) => {
                format!("Start med {count} MÅ-krav uten fremdrift.")
            }
            (ReportLanguage::No, Self::Undocumented) => {
                format!("Dokumenter {count} funksjoner uten krav.")
            }
            (ReportLanguage::No, Self::ZeroProgress) => {
                format!("Planlegg {count} krav med 0 % fremdrift.")
            }
            (ReportLanguage::No, Self::Partial) => {
                format!("Fullfør {count} delvis implementerte krav for rask gevinst.")
            }
            (ReportLanguage::No, Self::DuplicateHeaders) => {
                format!("Rydd opp i {count} duplikate kolonnenavn på tvers av ark.")
            }
            (ReportLanguage::En, Self::ZeroProgressMust) => {
                format!("Start with {count} MUST requirements that have no progress.")
            }
            (ReportLanguage::En, Self::Undocumented) => {
                format!("Document {count} routines that have no requirement.")
            }
            (ReportLanguage::En, Self::ZeroProgress) => {
                format!("Plan {count} requirements at 0 % progress.")
            }
            (ReportLanguage::En, Self::Partial) => {
                format!("Finish {count} partially implemented requirements for quick wins.")
            }
            (ReportLanguage::En, Self::DuplicateHeaders) => {
                format!("Clean up {count} column headers duplicated across sheets.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub weight: u32,
    pub count: usize,
    pub message: String,
}

/// Recommendations for every non-empty gap class, heaviest first.
///
/// Zero-progress MUST requirements are listed on their own and excluded
/// from the generic zero-progress count.
pub fn recommend(
    report: &GapReport,
    duplicate_header_count: usize,
    language: ReportLanguage,
) -> Vec<Recommendation> {
    let must_zero = report.zero_progress_must_count();
    let counts = [
        (RecommendationKind::ZeroProgressMust, must_zero),
        (
            RecommendationKind::Undocumented,
            report.undocumented_routines.len(),
        ),
        (
            RecommendationKind::ZeroProgress,
            report.unimplemented_requirements.len() - must_zero,
        ),
        (RecommendationKind::Partial, report.partial_requirements.len()),
        (RecommendationKind::DuplicateHeaders, duplicate_header_count),
    ];

    let mut out: Vec<Recommendation> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| Recommendation {
            kind,
            weight: kind.weight(),
            count,
            message: kind.message(language, count),
        })
        .collect();
    out.sort_by(|a, b| b.weight.cmp(&a.weight));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqscan_core::types::{Priority, RequirementRecord};

    fn req(priority: Priority, progress: f64) -> RequirementRecord {
        RequirementRecord {
            id: "K1-001".into(),
            text: "t".into(),
            priority,
            progress_percent: progress,
            chapter: "1".into(),
        }
    }

    #[test]
    fn ordered_by_weight_and_empty_classes_omitted() {
        let report = GapReport {
            unimplemented_requirements: vec![req(Priority::Must, 0.0), req(Priority::Could, 0.0)],
            partial_requirements: vec![req(Priority::Should, 40.0)],
            undocumented_routines: vec![],
            ..Default::default()
        };
        let recs = recommend(&report, 2, ReportLanguage::En);
        let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::ZeroProgressMust,
                RecommendationKind::ZeroProgress,
                RecommendationKind::Partial,
                RecommendationKind::DuplicateHeaders,
            ]
        );
        assert_eq!(recs[1].count, 1);
    }

    #[test]
    fn clean_report_has_no_recommendations() {
        assert!(recommend(&GapReport::default(), 0, ReportLanguage::No).is_empty());
    }
}
