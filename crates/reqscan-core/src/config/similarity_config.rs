//! Tokenizer and similarity configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Jaccard threshold at or above which two texts are duplicates. Default: 0.78.
    pub threshold: Option<f64>,
    /// Tokens shorter than this are dropped. Default: 2.
    pub min_token_len: Option<usize>,
    /// Strip common inflection suffixes from tokens. Default: true.
    pub fold_inflections: Option<bool>,
}

impl SimilarityConfig {
    pub const DEFAULT_THRESHOLD: f64 = 0.78;
    pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(Self::DEFAULT_THRESHOLD)
    }

    pub fn effective_min_token_len(&self) -> usize {
        self.min_token_len.unwrap_or(Self::DEFAULT_MIN_TOKEN_LEN)
    }

    pub fn effective_fold_inflections(&self) -> bool {
        self.fold_inflections.unwrap_or(true)
    }
}
