//! Requirement classification and undocumented-routine detection.

use serde::{Deserialize, Serialize};

use reqscan_core::config::ReqscanConfig;
use reqscan_core::types::collections::FxHashSet;
use reqscan_core::types::{
    ArtifactSnapshot, CandidateRecord, Priority, RequirementRecord, Visibility,
};

use crate::text::{JaccardScorer, TokenCache};

/// Host lifecycle entry points. Never reported as undocumented and never
/// considered dead.
pub const LIFECYCLE_HOOKS: &[&str] = &[
    "onOpen",
    "onEdit",
    "onInstall",
    "onSubmit",
    "onFormSubmit",
    "onChange",
    "onSelectionChange",
    "doGet",
    "doPost",
    "include",
];

/// `total == implemented + partial + missing` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub total: usize,
    pub implemented: usize,
    pub partial: usize,
    pub missing: usize,
    /// Share of requirements at 100 %, one decimal.
    pub implemented_pct: f64,
    /// Share of requirements with any progress, one decimal.
    pub covered_or_partial_pct: f64,
}

impl CoverageStats {
    pub fn from_counts(implemented: usize, partial: usize, missing: usize) -> Self {
        let total = implemented + partial + missing;
        Self {
            total,
            implemented,
            partial,
            missing,
            implemented_pct: pct(implemented, total),
            covered_or_partial_pct: pct(implemented + partial, total),
        }
    }
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Derived per run; never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub unimplemented_requirements: Vec<RequirementRecord>,
    pub partial_requirements: Vec<RequirementRecord>,
    pub undocumented_routines: Vec<String>,
    pub coverage_stats: CoverageStats,
}

impl GapReport {
    pub fn zero_progress_must_count(&self) -> usize {
        self.unimplemented_requirements
            .iter()
            .filter(|r| r.priority == Priority::Must)
            .count()
    }
}

pub struct GapAnalyzer<'a> {
    scorer: JaccardScorer<'a>,
    coverage_threshold: f64,
    exempt: FxHashSet<String>,
}

impl<'a> GapAnalyzer<'a> {
    pub fn new(cache: &'a TokenCache, coverage_threshold: f64) -> Self {
        Self {
            scorer: JaccardScorer::new(cache),
            coverage_threshold,
            exempt: LIFECYCLE_HOOKS.iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    pub fn from_config(cache: &'a TokenCache, config: &ReqscanConfig) -> Self {
        let mut analyzer = Self::new(cache, config.gap.effective_coverage_threshold());
        analyzer
            .exempt
            .extend(config.gap.extra_exempt.iter().map(|h| h.to_lowercase()));
        analyzer
    }

    pub fn is_exempt(&self, routine: &str) -> bool {
        self.exempt.contains(&routine.to_lowercase())
    }

    pub fn analyze(
        &self,
        snapshot: &ArtifactSnapshot,
        requirements: &[RequirementRecord],
        candidates: &[CandidateRecord],
    ) -> GapReport {
        let mut unimplemented = Vec::new();
        let mut partial = Vec::new();
        let mut implemented = 0usize;
        for r in requirements {
            if r.is_implemented() {
                implemented += 1;
            } else if r.is_unimplemented() {
                unimplemented.push(r.clone());
            } else {
                partial.push(r.clone());
            }
        }

        let texts: Vec<String> = requirements
            .iter()
            .map(|r| r.text.as_str())
            .chain(candidates.iter().map(|c| c.text.as_str()))
            .map(str::to_lowercase)
            .collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let undocumented: Vec<String> = snapshot
            .routines
            .iter()
            .filter(|r| r.visibility == Visibility::Public)
            .map(|r| r.name.as_str())
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .filter(|name| !self.is_exempt(name))
            .filter(|name| !self.is_documented(name, &texts))
            .map(str::to_string)
            .collect();

        let coverage_stats =
            CoverageStats::from_counts(implemented, partial.len(), unimplemented.len());

        tracing::debug!(
            undocumented = undocumented.len(),
            implemented_pct = coverage_stats.implemented_pct,
            "gap analysis complete"
        );

        GapReport {
            unimplemented_requirements: unimplemented,
            partial_requirements: partial,
            undocumented_routines: undocumented,
            coverage_stats,
        }
    }

    /// Documented if some lowercased text contains the name, or scores at or
    /// above the coverage threshold against it.
    fn is_documented(&self, name: &str, lowered_texts: &[String]) -> bool {
        let low = name.to_lowercase();
        lowered_texts.iter().any(|t| {
            t.contains(&low) || self.scorer.is_similar(name, t, self.coverage_threshold)
        })
    }
}
