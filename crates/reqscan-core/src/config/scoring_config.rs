//! Candidate scoring weights.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub source_weight: Option<f64>,
    pub cross_weight: Option<f64>,
    pub domain_weight: Option<f64>,
    pub text_weight: Option<f64>,
}

/// Resolved weights. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub source: f64,
    pub cross: f64,
    pub domain: f64,
    pub text: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            source: 0.35,
            cross: 0.25,
            domain: 0.20,
            text: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.source + self.cross + self.domain + self.text
    }
}

impl ScoringConfig {
    pub fn effective_weights(&self) -> ScoringWeights {
        let d = ScoringWeights::default();
        ScoringWeights {
            source: self.source_weight.unwrap_or(d.source),
            cross: self.cross_weight.unwrap_or(d.cross),
            domain: self.domain_weight.unwrap_or(d.domain),
            text: self.text_weight.unwrap_or(d.text),
        }
    }

    pub fn is_set(&self) -> bool {
        self.source_weight.is_some()
            || self.cross_weight.is_some()
            || self.domain_weight.is_some()
            || self.text_weight.is_some()
    }
}
