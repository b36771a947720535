//! Keyword heuristics over the routine-name corpus.

use reqscan_core::types::Priority;

/// A keyword rule that proposes one domain requirement when any of its
/// keywords occurs among the routine-name tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicRule {
    pub area: &'static str,
    pub keywords: &'static [&'static str],
    pub priority: Priority,
    pub text_no: &'static str,
    pub text_en: &'static str,
}

pub const BUILTIN_HEURISTICS: &[HeuristicRule] = &[
    HeuristicRule {
        area: "HMS",
        keywords: &["hms"],
        priority: Priority::Must,
        text_no: "Systemet skal sikre at HMS-planer genereres, varsles og synkroniseres i kalender.",
        text_en: "System shall ensure HSE plans are generated, notified and synchronized to the calendar.",
    },
    HeuristicRule {
        area: "Tasks",
        keywords: &["vaktmester", "caretaker"],
        priority: Priority::Should,
        text_no: "Systemet skal la vaktmester motta, oppdatere og ferdigstille oppgaver.",
        text_en: "System shall let the caretaker receive, update and complete tasks.",
    },
    HeuristicRule {
        area: "Budget",
        keywords: &["budget", "budsjett"],
        priority: Priority::Should,
        text_no: "Systemet skal støtte budsjetthåndtering med validering, import og rapportering.",
        text_en: "System shall support budget management with validation, import and reporting.",
    },
    HeuristicRule {
        area: "Møter",
        keywords: &["vote", "voter", "stemme"],
        priority: Priority::Should,
        text_no: "Systemet skal støtte digital stemmegivning med oppsummering og låsing av vedtak.",
        text_en: "System shall support digital voting with tallying and locking of decisions.",
    },
    HeuristicRule {
        area: "Møter",
        keywords: &["meeting", "møte", "moter"],
        priority: Priority::Should,
        text_no: "Systemet skal forvalte møter, agenda og protokoll for godkjenning.",
        text_en: "System shall manage meetings, agendas and minutes for approval.",
    },
    HeuristicRule {
        area: "Security",
        keywords: &["rbac", "role", "permission", "tilgang"],
        priority: Priority::Must,
        text_no: "Systemet skal håndheve rollebasert tilgangsstyring (RBAC) for brukerhandlinger.",
        text_en: "System shall enforce role-based access control (RBAC) for user actions.",
    },
];
