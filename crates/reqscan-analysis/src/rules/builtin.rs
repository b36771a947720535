//! Built-in rules: near-duplicate routine names, heuristically dead
//! routines, and headers duplicated across sheets.

use reqscan_core::errors::RuleError;
use reqscan_core::types::collections::FxHashSet;
use reqscan_core::types::RuleFinding;

use super::registry::{RuleContext, StaticRule};
use crate::gap::LIFECYCLE_HOOKS;
use crate::snapshot::find_header_duplicates;
use crate::text::JaccardScorer;

/// Pairs of routine names whose token sets are nearly identical, e.g.
/// `sendReminder` and `send_reminders`.
pub struct NearDuplicateRoutinesRule {
    threshold: f64,
}

impl NearDuplicateRoutinesRule {
    pub const NAME: &'static str = "near_duplicate_routines";

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl StaticRule for NearDuplicateRoutinesRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RuleFinding>, RuleError> {
        let mut seen = FxHashSet::default();
        let names: Vec<&str> = ctx
            .snapshot
            .routines
            .iter()
            .map(|r| r.name.as_str())
            .filter(|n| !n.is_empty() && seen.insert(*n))
            .collect();

        let scorer = JaccardScorer::new(ctx.cache);
        let mut findings = Vec::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let sim = scorer.score_pruned(a, b, self.threshold);
                if sim >= self.threshold {
                    findings.push(RuleFinding {
                        rule_name: Self::NAME.to_string(),
                        finding_type: "near_duplicate".to_string(),
                        subjects: vec![a.to_string(), b.to_string()],
                        note: format!("name similarity {sim:.2}"),
                    });
                }
            }
        }
        Ok(findings)
    }
}

/// Routines nothing points at: not named in any requirement text or menu
/// title, not bound to a menu or trigger, and not a lifecycle hook.
pub struct DeadRoutinesRule {
    extra_exempt: Vec<String>,
}

impl DeadRoutinesRule {
    pub const NAME: &'static str = "dead_routines";

    pub fn new(extra_exempt: Vec<String>) -> Self {
        Self { extra_exempt }
    }
}

impl StaticRule for DeadRoutinesRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RuleFinding>, RuleError> {
        let snapshot = ctx.snapshot;
        let mut bound: FxHashSet<String> = snapshot
            .scheduled_jobs
            .iter()
            .map(|j| j.handler.to_lowercase())
            .chain(snapshot.menu_bindings.iter().map(|m| m.handler.to_lowercase()))
            .chain(LIFECYCLE_HOOKS.iter().map(|h| h.to_lowercase()))
            .collect();
        bound.extend(self.extra_exempt.iter().map(|h| h.to_lowercase()));

        let mentions: Vec<String> = ctx
            .requirements
            .iter()
            .map(|r| r.text.to_lowercase())
            .chain(snapshot.menu_bindings.iter().map(|m| m.title.to_lowercase()))
            .collect();

        let mut seen = FxHashSet::default();
        let findings = snapshot
            .routines
            .iter()
            .map(|r| r.name.as_str())
            .filter(|n| !n.is_empty() && seen.insert(*n))
            .filter(|n| {
                let low = n.to_lowercase();
                !bound.contains(&low) && !mentions.iter().any(|m| m.contains(&low))
            })
            .map(|n| RuleFinding {
                rule_name: Self::NAME.to_string(),
                finding_type: "dead_routine".to_string(),
                subjects: vec![n.to_string()],
                note: "not referenced by requirements, menus or triggers".to_string(),
            })
            .collect();
        Ok(findings)
    }
}

/// A header name used by more than one sheet.
pub struct DuplicateHeadersRule;

impl DuplicateHeadersRule {
    pub const NAME: &'static str = "duplicate_headers";
}

impl StaticRule for DuplicateHeadersRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RuleFinding>, RuleError> {
        Ok(find_header_duplicates(ctx.snapshot)
            .into_iter()
            .map(|d| RuleFinding {
                rule_name: Self::NAME.to_string(),
                finding_type: "duplicate_header".to_string(),
                note: format!("header \"{}\" appears in {} sheets", d.header, d.sheets.len()),
                subjects: d.sheets,
            })
            .collect())
    }
}
