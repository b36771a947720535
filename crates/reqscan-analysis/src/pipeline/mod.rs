//! End-to-end run orchestrator.
//!
//! collect → read corpus → generate → score → dedupe → top-N → gap → rules
//! → health → metrics append → document replace → optional ingest.
//!
//! Only a missing introspection source aborts a run. Every other failure is
//! logged, recorded in `RunReport::errors`, and the run continues.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use reqscan_core::config::{ConfigWarning, ReportLanguage, ReqscanConfig, ResolvedConfig};
use reqscan_core::errors::{PipelineError, PipelineResult};
use reqscan_core::events::{ConfigWarningEvent, EventDispatcher, RunCompleteEvent, RunStartedEvent};
use reqscan_core::traits::{
    DocumentReceipt, DocumentSink, IngestOptions, IngestSummary, IntrospectionSource, MetricsLog,
    RequirementStore, RunBudget,
};
use reqscan_core::types::{
    ArtifactSnapshot, CandidateRecord, HealthSummary, MetricsLogRow, PerformanceMetrics,
    PriorityLabels, RequirementRecord, RuleFinding,
};

use crate::candidates::{BuiltinTemplates, CandidateGenerator, CandidateTemplates};
use crate::dedup::{DedupEngine, DedupOptions};
use crate::gap::{recommend, GapAnalyzer, GapReport, Recommendation};
use crate::health;
use crate::report::{MarkdownReport, ReportInput};
use crate::rules::{RuleContext, RuleRegistry};
use crate::scoring::score_and_sort;
use crate::snapshot::{HeaderDuplicate, SnapshotCollector};
use crate::text::TokenCache;

/// Outcome of one run. Partial when `cancelled` is set.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub snapshot: ArtifactSnapshot,
    pub metrics: PerformanceMetrics,
    pub candidates: Vec<CandidateRecord>,
    pub gap: GapReport,
    pub recommendations: Vec<Recommendation>,
    pub findings: Vec<RuleFinding>,
    pub health: Option<HealthSummary>,
    pub header_duplicates: Vec<HeaderDuplicate>,
    /// Id of the appended metrics row, if the append succeeded.
    pub run_id: Option<i64>,
    pub document: Option<DocumentReceipt>,
    pub ingest: Option<IngestSummary>,
    #[serde(skip)]
    pub errors: Vec<PipelineError>,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct AnalysisPipeline {
    config: ReqscanConfig,
    config_warnings: Vec<ConfigWarning>,
    events: EventDispatcher,
    rules: RuleRegistry,
    templates: Box<dyn CandidateTemplates>,
}

impl AnalysisPipeline {
    pub fn new(config: ReqscanConfig) -> Self {
        let rules = RuleRegistry::with_builtins(&config);
        let templates = Box::new(BuiltinTemplates::new(config.report.effective_language()));
        Self {
            config,
            config_warnings: Vec::new(),
            events: EventDispatcher::new(),
            rules,
            templates,
        }
    }

    /// Pipeline for a resolved configuration. Its warnings are re-emitted as
    /// events at the start of every run.
    pub fn from_resolved(resolved: ResolvedConfig) -> Self {
        let mut pipeline = Self::new(resolved.config);
        pipeline.config_warnings = resolved.warnings;
        pipeline
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_templates(mut self, templates: Box<dyn CandidateTemplates>) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(&self) -> &ReqscanConfig {
        &self.config
    }

    pub fn rules_mut(&mut self) -> &mut RuleRegistry {
        &mut self.rules
    }

    pub fn run(
        &self,
        source: &dyn IntrospectionSource,
        store: &dyn RequirementStore,
        metrics_log: &dyn MetricsLog,
        sink: &dyn DocumentSink,
        budget: &RunBudget,
    ) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let version = self.config.history.effective_version();
        let cache = TokenCache::from_config(&self.config.similarity);
        let mut errors = PipelineResult::<()>::default();

        for w in &self.config_warnings {
            self.events.emit_config_warning(&ConfigWarningEvent {
                field: w.field.clone(),
                message: w.message.clone(),
            });
        }

        // Phase 1: snapshot. The only fatal step.
        let collected = SnapshotCollector::new(&self.config, budget)
            .with_events(&self.events)
            .collect(source)?;
        let collected = errors.absorb(collected);
        let snapshot = collected.snapshot;
        let mut cancelled = collected.cancelled;

        tracing::info!(artifact = %snapshot.metadata.name, %version, "run started");
        self.events.emit_run_started(&RunStartedEvent {
            artifact: snapshot.metadata.name.clone(),
            version: version.clone(),
        });

        // Phase 2: existing corpus.
        let requirements: Vec<RequirementRecord> = match store.read_all() {
            Ok(read) => errors.absorb(read),
            Err(e) => {
                tracing::warn!(error = %e, "requirement store unavailable");
                errors.add_error(e);
                Vec::new()
            }
        };

        // Phase 3: generate and score.
        let generated = CandidateGenerator::new(
            self.templates.as_ref(),
            self.config.scan.effective_max_header_preview(),
        )
        .generate(&snapshot, &cache);
        let scored = score_and_sort(generated, &self.config.scoring.effective_weights(), &cache);

        // Phase 4: dedupe against the corpus, on scored order.
        let existing: Vec<&str> = requirements.iter().map(|r| r.text.as_str()).collect();
        let deduped = DedupEngine::new(&cache, DedupOptions::from_config(&self.config))
            .with_events(&self.events)
            .with_budget(budget)
            .run(scored, &existing);
        let outcome = errors.absorb(deduped);
        cancelled |= outcome.cancelled;
        let mut candidates = outcome.kept;
        candidates.truncate(self.config.ingest.effective_top_n());
        let matched_existing = outcome.matched_existing;

        // Phase 5: gap analysis and rules.
        let gap = GapAnalyzer::from_config(&cache, &self.config).analyze(
            &snapshot,
            &requirements,
            &candidates,
        );
        let ctx = RuleContext {
            snapshot: &snapshot,
            requirements: &requirements,
            gap: &gap,
            cache: &cache,
        };
        let findings = errors.absorb(self.rules.run_all(&ctx, Some(&self.events)));

        // Phase 6: health and recommendations.
        let health = health::summarize(
            gap.coverage_stats.implemented_pct,
            gap.undocumented_routines.len(),
            collected.metrics.is_large_dataset,
        );
        let recommendations = recommend(
            &gap,
            collected.header_duplicates.len(),
            self.config.report.effective_language(),
        );

        // Phase 7: history.
        let row = MetricsLogRow {
            timestamp: timestamp.clone(),
            version: version.clone(),
            commit_label: self.config.history.effective_commit_label(),
            sheets_scanned: collected.metrics.sheets_scanned,
            total_rows: collected.metrics.total_rows,
            max_cols: collected.metrics.max_cols,
            total_cells: collected.metrics.total_cells,
            scan_duration_ms: collected.metrics.scan_duration_ms,
            undocumented_count: health.undocumented_count,
            implemented_pct: health.implemented_pct,
            grade: health.grade.to_string(),
            score: health.score,
        };
        let run_id = match metrics_log.append(&row) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "metrics append failed");
                errors.add_error(e);
                None
            }
        };

        // Phase 8: document.
        let report = MarkdownReport::from_config(&self.config.report);
        let body = report.render(
            &ReportInput {
                snapshot: &snapshot,
                metrics: &collected.metrics,
                requirements: &requirements,
                candidates: &candidates,
                gap: &gap,
                health: &health,
                findings: &findings,
                recommendations: &recommendations,
                header_duplicates: &collected.header_duplicates,
                cancelled,
                generated_at: &timestamp,
                version: &version,
            },
            &cache,
        );
        let document = match sink.replace(report.title(), &body) {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                tracing::warn!(error = %e, "report write failed");
                errors.add_error(e);
                None
            }
        };

        // Phase 9: optional write-back.
        let ingest = if self.config.ingest.effective_enabled() && !cancelled {
            // Verbatim corpus matches ride along after the capped survivors
            // so their rows get annotated without taking a top-n slot.
            let to_ingest: Vec<CandidateRecord> = candidates
                .iter()
                .chain(matched_existing.iter())
                .cloned()
                .collect();
            let options = IngestOptions {
                batch_size: self.config.ingest.effective_batch_size(),
                top_n: to_ingest.len(),
                labels: match self.config.report.effective_language() {
                    ReportLanguage::No => PriorityLabels::norwegian(),
                    ReportLanguage::En => PriorityLabels::english(),
                },
                version: version.clone(),
                timestamp: timestamp.clone(),
            };
            match store.ingest(&to_ingest, &options) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "ingest failed");
                    errors.add_error(e);
                    None
                }
            }
        } else {
            None
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            candidates = candidates.len(),
            findings = findings.len(),
            score = health.score,
            grade = %health.grade,
            cancelled,
            errors = errors.error_count(),
            duration_ms,
            "run complete"
        );
        self.events.emit_run_complete(&RunCompleteEvent {
            candidates_kept: candidates.len(),
            findings: findings.len(),
            score: health.score,
            grade: health.grade,
            cancelled,
            duration_ms,
        });

        Ok(RunReport {
            snapshot,
            metrics: collected.metrics,
            candidates,
            gap,
            recommendations,
            findings,
            health: Some(health),
            header_duplicates: collected.header_duplicates,
            run_id,
            document,
            ingest,
            errors: errors.errors,
            cancelled,
            duration_ms,
        })
    }
}
