//! Ordered rule registry with per-rule failure isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use reqscan_core::config::ReqscanConfig;
use reqscan_core::errors::{PipelineResult, RuleError};
use reqscan_core::events::{EventDispatcher, RuleFailedEvent};
use reqscan_core::types::{ArtifactSnapshot, RequirementRecord, RuleFinding};

use super::builtin::{DeadRoutinesRule, DuplicateHeadersRule, NearDuplicateRoutinesRule};
use crate::gap::GapReport;
use crate::text::TokenCache;

/// Everything a rule may look at. Read-only.
pub struct RuleContext<'a> {
    pub snapshot: &'a ArtifactSnapshot,
    pub requirements: &'a [RequirementRecord],
    pub gap: &'a GapReport,
    pub cache: &'a TokenCache,
}

/// A static-analysis rule. Rules are independent: one failing never affects
/// another.
pub trait StaticRule {
    fn name(&self) -> &str;

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<RuleFinding>, RuleError>;
}

/// Rules run in registration order; findings are concatenated in that order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn StaticRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules, minus any disabled in config.
    pub fn with_builtins(config: &ReqscanConfig) -> Self {
        let mut registry = Self::new();
        let builtins: Vec<Box<dyn StaticRule>> = vec![
            Box::new(NearDuplicateRoutinesRule::new(
                config.rules.effective_near_duplicate_threshold(),
            )),
            Box::new(DeadRoutinesRule::new(config.gap.extra_exempt.clone())),
            Box::new(DuplicateHeadersRule),
        ];
        for rule in builtins {
            if config.rules.is_enabled(rule.name()) {
                registry.register(rule);
            }
        }
        registry
    }

    pub fn register(&mut self, rule: Box<dyn StaticRule>) {
        self.rules.push(rule);
    }

    /// Remove every rule with this name. Returns true if any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        self.rules.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule. A rule that errors or panics contributes no findings
    /// and one non-fatal error.
    pub fn run_all(
        &self,
        ctx: &RuleContext<'_>,
        events: Option<&EventDispatcher>,
    ) -> PipelineResult<Vec<RuleFinding>> {
        let mut result = PipelineResult::new(Vec::new());
        for rule in &self.rules {
            let name = rule.name().to_string();
            let outcome = match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
                Ok(outcome) => outcome,
                Err(payload) => Err(RuleError::Panicked {
                    rule: name.clone(),
                    message: panic_message(payload.as_ref()),
                }),
            };
            match outcome {
                Ok(findings) => {
                    tracing::debug!(rule = %name, findings = findings.len(), "rule finished");
                    result.data.extend(findings);
                }
                Err(e) => {
                    tracing::warn!(rule = %name, error = %e, "rule failed");
                    if let Some(events) = events {
                        events.emit_rule_failed(&RuleFailedEvent {
                            rule: name,
                            message: e.to_string(),
                        });
                    }
                    result.add_error(e);
                }
            }
        }
        result
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
