//! Localizable statement templates per source kind.

use reqscan_core::config::ReportLanguage;
use reqscan_core::types::{EventKind, ScheduledJob};

use super::heuristics::HeuristicRule;

/// Renders candidate statements. Implement this to replace the wording;
/// priority assignment stays with the generator.
pub trait CandidateTemplates {
    fn scheduled_job(&self, job: &ScheduledJob) -> String;
    fn menu_binding(&self, title: &str, handler: &str) -> String;
    fn data_field(&self, field: &str, sheet: &str) -> String;
    fn heuristic(&self, rule: &HeuristicRule) -> String;
}

/// Norwegian and English built-in wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinTemplates {
    pub language: ReportLanguage,
}

impl BuiltinTemplates {
    pub fn new(language: ReportLanguage) -> Self {
        Self { language }
    }
}

impl CandidateTemplates for BuiltinTemplates {
    fn scheduled_job(&self, job: &ScheduledJob) -> String {
        let h = &job.handler;
        match (self.language, &job.event_kind) {
            (ReportLanguage::No, EventKind::Clock) => {
                format!("Systemet skal periodisk kjøre «{h}» (tidsstyrt).")
            }
            (ReportLanguage::No, EventKind::Edit) => {
                format!("Systemet skal reagere på endringer i regneark via «{h}».")
            }
            (ReportLanguage::No, EventKind::Open) => {
                format!("Systemet skal utføre oppgaver ved åpning via «{h}».")
            }
            (ReportLanguage::No, EventKind::FormSubmit) => {
                format!("Systemet skal behandle innsendinger via «{h}».")
            }
            (ReportLanguage::No, kind @ (EventKind::Change | EventKind::Other(_))) => {
                let e = kind.label();
                format!("Systemet skal håndtere hendelse «{e}» via «{h}».")
            }
            (ReportLanguage::En, EventKind::Clock) => {
                format!("System shall periodically run “{h}” (time-driven).")
            }
            (ReportLanguage::En, EventKind::Edit) => {
                format!("System shall react to spreadsheet edits via “{h}”.")
            }
            (ReportLanguage::En, EventKind::Open) => {
                format!("System shall perform tasks on open via “{h}”.")
            }
            (ReportLanguage::En, EventKind::FormSubmit) => {
                format!("System shall handle form submissions via “{h}”.")
            }
            (ReportLanguage::En, kind @ (EventKind::Change | EventKind::Other(_))) => {
                let e = kind.label();
                format!("System shall handle event “{e}” via “{h}”.")
            }
        }
    }

    fn menu_binding(&self, title: &str, handler: &str) -> String {
        match self.language {
            ReportLanguage::No => {
                format!("Systemet skal tilby menykommando «{title}» som kaller «{handler}».")
            }
            ReportLanguage::En => {
                format!("System shall provide menu command “{title}” calling “{handler}”.")
            }
        }
    }

    fn data_field(&self, field: &str, sheet: &str) -> String {
        match self.language {
            ReportLanguage::No => {
                format!("Systemet skal forvalte datafelt «{field}» i arket «{sheet}».")
            }
            ReportLanguage::En => {
                format!("System shall manage data field “{field}” in sheet “{sheet}”.")
            }
        }
    }

    fn heuristic(&self, rule: &HeuristicRule) -> String {
        match self.language {
            ReportLanguage::No => rule.text_no.to_string(),
            ReportLanguage::En => rule.text_en.to_string(),
        }
    }
}
