//! Deduplication engine: filters candidates against the existing corpus and
//! against each other, in bounded batches.
//!
//! Cross-candidate comparison is O(n²) in the number of kept candidates.
//! That is fine for the hundreds of candidates a run produces; a token
//! inverted index would be needed well beyond that.

use std::time::Duration;

use reqscan_core::config::ReqscanConfig;
use reqscan_core::errors::{InputValidationError, PipelineResult};
use reqscan_core::events::{DedupProgressEvent, EventDispatcher};
use reqscan_core::traits::RunBudget;
use reqscan_core::types::CandidateRecord;

use crate::text::{JaccardScorer, TokenCache};

/// Tuning for one dedupe call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupOptions {
    pub threshold: f64,
    pub batch_size: usize,
    /// Pause after every `yield_every` batches.
    pub yield_every: usize,
    pub yield_pause: Duration,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            threshold: 0.78,
            batch_size: 400,
            yield_every: 3,
            yield_pause: Duration::from_millis(20),
        }
    }
}

impl DedupOptions {
    pub fn from_config(config: &ReqscanConfig) -> Self {
        Self {
            threshold: config.similarity.effective_threshold(),
            batch_size: config.dedup.effective_batch_size(),
            yield_every: config.dedup.effective_yield_every(),
            yield_pause: config.dedup.effective_yield_pause(),
        }
    }

    fn validate(&self) -> Result<(), InputValidationError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(InputValidationError::ThresholdOutOfRange {
                value: self.threshold,
            });
        }
        if self.batch_size == 0 {
            return Err(InputValidationError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// Survivors of a dedupe call, in input order, plus counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    pub kept: Vec<CandidateRecord>,
    pub total: usize,
    pub processed: usize,
    pub dropped_blank: usize,
    pub dropped_existing: usize,
    pub dropped_internal: usize,
    /// Corpus drops whose trimmed text equals an existing text verbatim.
    /// They are also counted in `dropped_existing`.
    pub matched_existing: Vec<CandidateRecord>,
    /// Stopped early at a batch boundary; `kept` covers `processed` only.
    pub cancelled: bool,
}

pub struct DedupEngine<'a> {
    scorer: JaccardScorer<'a>,
    options: DedupOptions,
    events: Option<&'a EventDispatcher>,
    budget: Option<&'a RunBudget>,
}

impl<'a> DedupEngine<'a> {
    pub fn new(cache: &'a TokenCache, options: DedupOptions) -> Self {
        Self {
            scorer: JaccardScorer::new(cache),
            options,
            events: None,
            budget: None,
        }
    }

    pub fn with_events(mut self, events: &'a EventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_budget(mut self, budget: &'a RunBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Keep each candidate whose text is non-blank and scores below the
    /// threshold against every existing text and every earlier kept
    /// candidate. Invalid options yield an empty outcome and one error.
    pub fn run<S: AsRef<str>>(
        &self,
        candidates: Vec<CandidateRecord>,
        existing: &[S],
    ) -> PipelineResult<DedupOutcome> {
        let mut result = PipelineResult::new(DedupOutcome {
            total: candidates.len(),
            ..Default::default()
        });

        if let Err(e) = self.options.validate() {
            tracing::warn!(error = %e, "dedupe skipped");
            result.add_error(e);
            return result;
        }

        let threshold = self.options.threshold;
        let total = candidates.len();
        let batch_count = total.div_ceil(self.options.batch_size);
        let mut seen: Vec<String> = Vec::new();
        let out = &mut result.data;

        let mut iter = candidates.into_iter();
        for batch_index in 0..batch_count {
            if self.budget.is_some_and(RunBudget::should_stop) {
                out.cancelled = true;
                tracing::info!(processed = out.processed, total, "dedupe stopped early");
                break;
            }

            for candidate in iter.by_ref().take(self.options.batch_size) {
                out.processed += 1;
                let text = candidate.text.trim();
                if text.is_empty() {
                    out.dropped_blank += 1;
                    continue;
                }
                if existing
                    .iter()
                    .any(|e| self.scorer.is_similar(text, e.as_ref(), threshold))
                {
                    out.dropped_existing += 1;
                    if existing.iter().any(|e| e.as_ref().trim() == text) {
                        out.matched_existing.push(candidate);
                    }
                    continue;
                }
                if seen.iter().any(|s| self.scorer.is_similar(text, s, threshold)) {
                    out.dropped_internal += 1;
                    continue;
                }
                seen.push(text.to_string());
                out.kept.push(candidate);
            }

            self.report_progress(out.processed, total);

            let is_last = batch_index + 1 == batch_count;
            if !is_last && (batch_index + 1) % self.options.yield_every.max(1) == 0 {
                std::thread::sleep(self.options.yield_pause);
            }
        }

        tracing::debug!(
            kept = out.kept.len(),
            dropped_existing = out.dropped_existing,
            dropped_internal = out.dropped_internal,
            "dedupe finished"
        );
        result
    }

    fn report_progress(&self, processed: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (processed * 100 / total) as u8
        };
        if let Some(events) = self.events {
            events.emit_dedup_progress(&DedupProgressEvent {
                processed,
                total,
                percent,
            });
        }
    }
}

/// One-shot dedupe with default pacing.
pub fn dedupe<S: AsRef<str>>(
    candidates: Vec<CandidateRecord>,
    existing: &[S],
    threshold: f64,
    batch_size: usize,
    cache: &TokenCache,
) -> PipelineResult<DedupOutcome> {
    let options = DedupOptions {
        threshold,
        batch_size,
        ..DedupOptions::default()
    };
    DedupEngine::new(cache, options).run(candidates, existing)
}
