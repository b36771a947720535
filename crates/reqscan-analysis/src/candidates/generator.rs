//! Structural facts → requirement candidates.

use reqscan_core::config::ReqscanConfig;
use reqscan_core::types::collections::FxHashSet;
use reqscan_core::types::{
    ArtifactSnapshot, CandidateRecord, EventKind, Evidence, Priority, SourceKind,
};

use super::heuristics::{HeuristicRule, BUILTIN_HEURISTICS};
use super::sanitize::sanitize_text;
use super::templates::{BuiltinTemplates, CandidateTemplates};
use crate::text::TokenCache;

/// Priority tier for a scheduled job by what triggers it.
pub fn job_priority(kind: &EventKind) -> Priority {
    match kind {
        EventKind::Clock => Priority::Must,
        EventKind::FormSubmit | EventKind::Open | EventKind::Edit => Priority::Should,
        EventKind::Change | EventKind::Other(_) => Priority::Could,
    }
}

/// Pure function of a snapshot: the same snapshot always yields the same
/// candidates in the same order (jobs, menus, fields, heuristics).
pub struct CandidateGenerator<'a> {
    templates: &'a dyn CandidateTemplates,
    heuristics: &'a [HeuristicRule],
    max_header_preview: usize,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(templates: &'a dyn CandidateTemplates, max_header_preview: usize) -> Self {
        Self {
            templates,
            heuristics: BUILTIN_HEURISTICS,
            max_header_preview,
        }
    }

    pub fn with_heuristics(mut self, heuristics: &'a [HeuristicRule]) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn generate(&self, snapshot: &ArtifactSnapshot, cache: &TokenCache) -> Vec<CandidateRecord> {
        let mut out = Vec::new();
        self.from_jobs(snapshot, &mut out);
        self.from_menus(snapshot, &mut out);
        self.from_fields(snapshot, &mut out);
        self.from_heuristics(snapshot, cache, &mut out);
        out.retain(|c| !c.text.is_empty());
        tracing::debug!(count = out.len(), "generated candidates");
        out
    }

    fn from_jobs(&self, snapshot: &ArtifactSnapshot, out: &mut Vec<CandidateRecord>) {
        for job in &snapshot.scheduled_jobs {
            if job.handler.trim().is_empty() {
                continue;
            }
            out.push(CandidateRecord::new(
                sanitize_text(&self.templates.scheduled_job(job)),
                SourceKind::ScheduledJob,
                job_priority(&job.event_kind),
                Evidence::Handler {
                    handler: job.handler.clone(),
                    event: job.event_kind.label().to_string(),
                },
            ));
        }
    }

    fn from_menus(&self, snapshot: &ArtifactSnapshot, out: &mut Vec<CandidateRecord>) {
        for menu in &snapshot.menu_bindings {
            if menu.handler.trim().is_empty() {
                continue;
            }
            out.push(CandidateRecord::new(
                sanitize_text(&self.templates.menu_binding(&menu.title, &menu.handler)),
                SourceKind::MenuBinding,
                Priority::Should,
                Evidence::Menu {
                    title: menu.title.clone(),
                    handler: menu.handler.clone(),
                },
            ));
        }
    }

    fn from_fields(&self, snapshot: &ArtifactSnapshot, out: &mut Vec<CandidateRecord>) {
        for sheet in &snapshot.tabular_sheets {
            let mut seen: FxHashSet<String> = FxHashSet::default();
            for header in sheet.headers.iter().take(self.max_header_preview) {
                let field = header.trim();
                if field.is_empty() || !seen.insert(field.to_lowercase()) {
                    continue;
                }
                out.push(CandidateRecord::new(
                    sanitize_text(&self.templates.data_field(field, &sheet.name)),
                    SourceKind::DataField,
                    Priority::Should,
                    Evidence::Field {
                        sheet: sheet.name.clone(),
                        field: field.to_string(),
                    },
                ));
            }
        }
    }

    /// Each rule fires at most once, on the first keyword found.
    fn from_heuristics(
        &self,
        snapshot: &ArtifactSnapshot,
        cache: &TokenCache,
        out: &mut Vec<CandidateRecord>,
    ) {
        let corpus = snapshot.routine_corpus();
        let corpus_tokens = cache.tokens(&corpus);
        let vocabulary: FxHashSet<&str> = corpus_tokens.iter().map(String::as_str).collect();
        if vocabulary.is_empty() {
            return;
        }

        for rule in self.heuristics {
            let hit = rule.keywords.iter().find(|kw| {
                let kw_tokens = cache.tokens(kw);
                !kw_tokens.is_empty() && kw_tokens.iter().all(|t| vocabulary.contains(t.as_str()))
            });
            if let Some(keyword) = hit {
                out.push(CandidateRecord::new(
                    sanitize_text(&self.templates.heuristic(rule)),
                    SourceKind::Heuristic,
                    rule.priority,
                    Evidence::Keyword {
                        keyword: keyword.to_string(),
                        area: rule.area.to_string(),
                    },
                ));
            }
        }
    }
}

/// Generate candidates with the built-in templates in the configured
/// language.
pub fn generate_candidates(
    snapshot: &ArtifactSnapshot,
    config: &ReqscanConfig,
    cache: &TokenCache,
) -> Vec<CandidateRecord> {
    let templates = BuiltinTemplates::new(config.report.effective_language());
    CandidateGenerator::new(&templates, config.scan.effective_max_header_preview())
        .generate(snapshot, cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqscan_core::types::{MenuBinding, Routine, ScheduledJob, TabularSheet};

    fn snapshot() -> ArtifactSnapshot {
        ArtifactSnapshot {
            scheduled_jobs: vec![
                ScheduledJob {
                    handler: "nightlySync".into(),
                    event_kind: EventKind::Clock,
                    origin: "clock".into(),
                },
                ScheduledJob {
                    handler: "onFormSubmit".into(),
                    event_kind: EventKind::FormSubmit,
                    origin: "form".into(),
                },
                ScheduledJob {
                    handler: "".into(),
                    event_kind: EventKind::Open,
                    origin: "sheet".into(),
                },
                ScheduledJob {
                    handler: "watch".into(),
                    event_kind: EventKind::Other("ON_SELECTION".into()),
                    origin: "sheet".into(),
                },
            ],
            menu_bindings: vec![
                MenuBinding {
                    title: "Eksporter".into(),
                    handler: "exportReport".into(),
                    ..Default::default()
                },
                MenuBinding {
                    title: "Tom".into(),
                    handler: " ".into(),
                    ..Default::default()
                },
            ],
            tabular_sheets: vec![TabularSheet {
                name: "Budsjett".into(),
                headers: vec!["Dato".into(), "Beløp".into(), "dato".into(), "".into()],
                ..Default::default()
            }],
            routines: vec![Routine::public("assignUserRoles"), Routine::public("hmsPlan")],
            ..Default::default()
        }
    }

    #[test]
    fn priorities_follow_trigger_kind() {
        let cache = TokenCache::default();
        let out = generate_candidates(&snapshot(), &ReqscanConfig::default(), &cache);
        let jobs: Vec<_> = out
            .iter()
            .filter(|c| c.source_kind == SourceKind::ScheduledJob)
            .collect();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].auto_priority, Priority::Must);
        assert_eq!(jobs[0].text, "Systemet skal periodisk kjøre «nightlySync» (tidsstyrt).");
        assert_eq!(jobs[1].auto_priority, Priority::Should);
        assert_eq!(jobs[2].auto_priority, Priority::Could);
        assert!(jobs[2].text.contains("ON_SELECTION"));
    }

    #[test]
    fn menus_without_handler_are_skipped() {
        let cache = TokenCache::default();
        let out = generate_candidates(&snapshot(), &ReqscanConfig::default(), &cache);
        let menus: Vec<_> = out
            .iter()
            .filter(|c| c.source_kind == SourceKind::MenuBinding)
            .collect();
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].auto_priority, Priority::Should);
    }

    #[test]
    fn one_field_candidate_per_distinct_header() {
        let cache = TokenCache::default();
        let out = generate_candidates(&snapshot(), &ReqscanConfig::default(), &cache);
        let fields: Vec<_> = out
            .iter()
            .filter(|c| c.source_kind == SourceKind::DataField)
            .collect();
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn header_preview_caps_fields() {
        let cache = TokenCache::default();
        let templates = BuiltinTemplates::default();
        let out = CandidateGenerator::new(&templates, 1).generate(&snapshot(), &cache);
        assert_eq!(
            out.iter().filter(|c| c.source_kind == SourceKind::DataField).count(),
            1
        );
    }

    #[test]
    fn heuristics_fire_once_each() {
        let cache = TokenCache::default();
        let mut snap = snapshot();
        snap.routines.push(Routine::public("editRole"));
        let out = generate_candidates(&snap, &ReqscanConfig::default(), &cache);
        let heuristics: Vec<_> = out
            .iter()
            .filter(|c| c.source_kind == SourceKind::Heuristic)
            .collect();
        assert_eq!(heuristics.len(), 2);
        assert!(heuristics.iter().any(|c| c.auto_priority == Priority::Must
            && c.text.contains("RBAC")));
        assert!(heuristics.iter().any(|c| c.text.contains("HMS")));
    }
}
