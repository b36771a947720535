//! Markdown report document.

use std::fmt::Write as _;

use reqscan_core::config::{ReportConfig, ReportLanguage};
use reqscan_core::types::{
    ArtifactSnapshot, CandidateRecord, HealthSummary, PerformanceMetrics, PriorityLabels,
    RequirementRecord, RuleFinding,
};

use crate::gap::{GapReport, Recommendation};
use crate::snapshot::HeaderDuplicate;
use crate::text::TokenCache;

use super::mermaid::{build_dependency_graph, GraphLimits};

/// Everything one report renders from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub snapshot: &'a ArtifactSnapshot,
    pub metrics: &'a PerformanceMetrics,
    pub requirements: &'a [RequirementRecord],
    pub candidates: &'a [CandidateRecord],
    pub gap: &'a GapReport,
    pub health: &'a HealthSummary,
    pub findings: &'a [RuleFinding],
    pub recommendations: &'a [Recommendation],
    pub header_duplicates: &'a [HeaderDuplicate],
    pub cancelled: bool,
    pub generated_at: &'a str,
    pub version: &'a str,
}

struct Labels {
    generated: &'static str,
    artifact: &'static str,
    cancelled: &'static str,
    requirements: &'static str,
    existing: &'static str,
    suggested: &'static str,
    none: &'static str,
    gap: &'static str,
    unimplemented: &'static str,
    undocumented: &'static str,
    coverage: &'static str,
    findings: &'static str,
    recommendations: &'static str,
    dependencies: &'static str,
    triggers: &'static str,
    menus: &'static str,
    sheets: &'static str,
    graph: &'static str,
    requirement_columns: &'static str,
    candidate_columns: &'static str,
    more: &'static str,
}

const LABELS_NO: Labels = Labels {
    generated: "Generert",
    artifact: "Artefakt",
    cancelled: "⚠️ Kjøringen ble avbrutt før den var ferdig. Resultatene er delvise.",
    requirements: "1. Krav",
    existing: "Eksisterende krav",
    suggested: "Foreslåtte krav",
    none: "Ingen.",
    gap: "2. Gapanalyse",
    unimplemented: "Krav uten fremdrift",
    undocumented: "Funksjoner uten krav",
    coverage: "3. Dekning og helse",
    findings: "4. Regelfunn",
    recommendations: "5. Anbefalinger",
    dependencies: "6. Avhengigheter",
    triggers: "Utløsere",
    menus: "Menyer",
    sheets: "7. Ark",
    graph: "8. Avhengighetsgraf",
    requirement_columns: "| KravID | Krav | Prioritet | Fremdrift % | Kapittel |",
    candidate_columns: "| # | Krav | Prioritet | Kilde | Detalj | Score |",
    more: "flere forslag er utelatt",
};

const LABELS_EN: Labels = Labels {
    generated: "Generated",
    artifact: "Artifact",
    cancelled: "⚠️ The run was cancelled before it finished. Results are partial.",
    requirements: "1. Requirements",
    existing: "Existing requirements",
    suggested: "Suggested requirements",
    none: "None.",
    gap: "2. Gap analysis",
    unimplemented: "Requirements without progress",
    undocumented: "Routines without a requirement",
    coverage: "3. Coverage and health",
    findings: "4. Rule findings",
    recommendations: "5. Recommendations",
    dependencies: "6. Dependencies",
    triggers: "Triggers",
    menus: "Menus",
    sheets: "7. Sheets",
    graph: "8. Dependency graph",
    requirement_columns: "| ID | Requirement | Priority | Progress % | Chapter |",
    candidate_columns: "| # | Requirement | Priority | Source | Detail | Score |",
    more: "more suggestions omitted",
};

/// Escape a table cell: pipes are escaped and line breaks collapsed.
pub fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn escape_heading(s: &str) -> String {
    s.replace('#', "\\#").replace(['\n', '\r'], " ")
}

pub struct MarkdownReport {
    title: String,
    language: ReportLanguage,
    max_suggestions: usize,
    include_graph: bool,
    graph_limits: GraphLimits,
}

impl Default for MarkdownReport {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl MarkdownReport {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            title: config.effective_title(),
            language: config.effective_language(),
            max_suggestions: config.effective_max_suggestions(),
            include_graph: config.effective_include_graph(),
            graph_limits: GraphLimits::from_config(config),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn labels(&self) -> &'static Labels {
        match self.language {
            ReportLanguage::No => &LABELS_NO,
            ReportLanguage::En => &LABELS_EN,
        }
    }

    fn priority_labels(&self) -> PriorityLabels {
        match self.language {
            ReportLanguage::No => PriorityLabels::norwegian(),
            ReportLanguage::En => PriorityLabels::english(),
        }
    }

    pub fn render(&self, input: &ReportInput<'_>, cache: &TokenCache) -> String {
        let l = self.labels();
        let mut md = String::new();

        // `write!` into a String cannot fail.
        let _ = writeln!(md, "# {}\n", escape_heading(&self.title));
        let _ = writeln!(
            md,
            "*{}: {} · {}: {} · v{}*\n",
            l.generated,
            input.generated_at,
            l.artifact,
            escape_cell(&input.snapshot.metadata.name),
            input.version
        );
        if input.cancelled {
            let _ = writeln!(md, "> {}\n", l.cancelled);
        }

        self.requirements_section(&mut md, input);
        self.gap_section(&mut md, input);
        self.coverage_section(&mut md, input);
        self.findings_section(&mut md, input);
        self.recommendations_section(&mut md, input);
        self.dependencies_section(&mut md, input);
        self.sheets_section(&mut md, input);

        if self.include_graph {
            let graph = build_dependency_graph(input.snapshot, cache, self.graph_limits);
            let _ = writeln!(md, "## {}\n", l.graph);
            let _ = writeln!(md, "```mermaid\n{}\n```\n", graph.source);
        }
        md
    }

    fn requirements_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let labels = self.priority_labels();
        let _ = writeln!(md, "## {}\n", l.requirements);

        let _ = writeln!(md, "### {}\n", l.existing);
        if input.requirements.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
        } else {
            let _ = writeln!(md, "{}\n|---|---|---|---|---|", l.requirement_columns);
            for r in input.requirements {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {} | {} |",
                    escape_cell(&r.id),
                    escape_cell(&r.text),
                    labels.label(r.priority),
                    r.progress_percent,
                    escape_cell(&r.chapter)
                );
            }
            md.push('\n');
        }

        let _ = writeln!(md, "### {}\n", l.suggested);
        if input.candidates.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
            return;
        }
        let _ = writeln!(md, "{}\n|---|---|---|---|---|---|", l.candidate_columns);
        for (i, c) in input.candidates.iter().take(self.max_suggestions).enumerate() {
            let score = c.score.map(|s| format!("{s:.3}")).unwrap_or_default();
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                i + 1,
                escape_cell(&c.text),
                labels.label(c.auto_priority),
                c.source_kind.as_str(),
                escape_cell(&c.evidence.summary()),
                score
            );
        }
        md.push('\n');
        if input.candidates.len() > self.max_suggestions {
            let _ = writeln!(md, "*… {} {}.*\n", input.candidates.len() - self.max_suggestions, l.more);
        }
    }

    fn gap_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let labels = self.priority_labels();
        let _ = writeln!(md, "## {}\n", l.gap);

        let _ = writeln!(md, "### {}\n", l.unimplemented);
        if input.gap.unimplemented_requirements.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
        } else {
            for r in &input.gap.unimplemented_requirements {
                let _ = writeln!(
                    md,
                    "- **{}** ({}): {}",
                    escape_cell(&r.id),
                    labels.label(r.priority),
                    escape_cell(&r.text)
                );
            }
            md.push('\n');
        }

        let _ = writeln!(md, "### {}\n", l.undocumented);
        if input.gap.undocumented_routines.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
        } else {
            for name in &input.gap.undocumented_routines {
                let _ = writeln!(md, "- `{}`", name.replace('`', "'"));
            }
            md.push('\n');
        }
    }

    fn coverage_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let s = &input.gap.coverage_stats;
        let m = input.metrics;
        let _ = writeln!(md, "## {}\n", l.coverage);
        let _ = writeln!(md, "| Metric | Value |\n|---|---|");
        let _ = writeln!(md, "| total | {} |", s.total);
        let _ = writeln!(md, "| implemented | {} |", s.implemented);
        let _ = writeln!(md, "| partial | {} |", s.partial);
        let _ = writeln!(md, "| missing | {} |", s.missing);
        let _ = writeln!(md, "| implemented % | {} |", s.implemented_pct);
        let _ = writeln!(md, "| covered or partial % | {} |", s.covered_or_partial_pct);
        let _ = writeln!(md, "| undocumented | {} |", input.health.undocumented_count);
        let _ = writeln!(md, "| health | {} ({}) |", input.health.score, input.health.grade);
        let _ = writeln!(md, "| sheets scanned | {} |", m.sheets_scanned);
        let _ = writeln!(md, "| total rows | {} |", m.total_rows);
        let _ = writeln!(md, "| max columns | {} |", m.max_cols);
        let _ = writeln!(md, "| scan ms | {} |", m.scan_duration_ms);
        let _ = writeln!(md, "| large dataset | {} |\n", m.is_large_dataset);
    }

    fn findings_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let _ = writeln!(md, "## {}\n", l.findings);
        if input.findings.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
            return;
        }
        let _ = writeln!(md, "| Rule | Type | Subjects | Note |\n|---|---|---|---|");
        for f in input.findings {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                escape_cell(&f.rule_name),
                escape_cell(&f.finding_type),
                escape_cell(&f.subjects.join(", ")),
                escape_cell(&f.note)
            );
        }
        md.push('\n');
    }

    fn recommendations_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let _ = writeln!(md, "## {}\n", l.recommendations);
        if input.recommendations.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
            return;
        }
        for (i, r) in input.recommendations.iter().enumerate() {
            let _ = writeln!(md, "{}. {} *(w={})*", i + 1, r.message, r.weight);
        }
        md.push('\n');
    }

    fn dependencies_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let snapshot = input.snapshot;
        let _ = writeln!(md, "## {}\n", l.dependencies);

        let _ = writeln!(md, "### {}\n", l.triggers);
        if snapshot.scheduled_jobs.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
        } else {
            let _ = writeln!(md, "| Handler | Event | Origin |\n|---|---|---|");
            for j in &snapshot.scheduled_jobs {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} |",
                    escape_cell(&j.handler),
                    escape_cell(j.event_kind.label()),
                    escape_cell(&j.origin)
                );
            }
            md.push('\n');
        }

        let _ = writeln!(md, "### {}\n", l.menus);
        if snapshot.menu_bindings.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
        } else {
            let _ = writeln!(md, "| Title | Handler | Sheet | Active |\n|---|---|---|---|");
            for m in &snapshot.menu_bindings {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {} |",
                    escape_cell(&m.title),
                    escape_cell(&m.handler),
                    escape_cell(m.sheet.as_deref().unwrap_or("")),
                    m.active
                );
            }
            md.push('\n');
        }
    }

    fn sheets_section(&self, md: &mut String, input: &ReportInput<'_>) {
        let l = self.labels();
        let _ = writeln!(md, "## {}\n", l.sheets);
        if input.snapshot.tabular_sheets.is_empty() {
            let _ = writeln!(md, "{}\n", l.none);
            return;
        }
        let _ = writeln!(md, "| Sheet | Rows | Columns | Hidden | Headers |\n|---|---|---|---|---|");
        for s in &input.snapshot.tabular_sheets {
            let headers: Vec<String> = s
                .headers
                .iter()
                .zip(s.column_types.iter().map(Some).chain(std::iter::repeat(None)))
                .map(|(h, t)| match t {
                    Some(t) => format!("{h} ({})", t.name()),
                    None => h.clone(),
                })
                .collect();
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                escape_cell(&s.name),
                s.row_count,
                s.column_count,
                s.hidden,
                escape_cell(&headers.join(", "))
            );
        }
        md.push('\n');

        if !input.header_duplicates.is_empty() {
            for d in input.header_duplicates {
                let _ = writeln!(
                    md,
                    "- `{}`: {}",
                    d.header.replace('`', "'"),
                    escape_cell(&d.sheets.join(", "))
                );
            }
            md.push('\n');
        }
    }
}
