//! Jaccard similarity over token sets.
//!
//! J(A, B) = |A ∩ B| / |A ∪ B|, with both-empty = 1.0 and one-empty = 0.0.

use reqscan_core::types::collections::FxHashSet;

use super::tokenizer::TokenCache;

/// Jaccard similarity of two token sets.
///
/// With `min_threshold`, pairs whose set-size ratio `shorter / longer` is
/// already below it return 0.0 without computing the intersection. The
/// ratio bounds the true score from above, so any result at or above the
/// threshold is unaffected.
pub fn jaccard_sets(a: &FxHashSet<&str>, b: &FxHashSet<&str>, min_threshold: Option<f64>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if let Some(th) = min_threshold {
        if (small.len() as f64 / large.len() as f64) < th {
            return 0.0;
        }
    }
    let intersection = small.iter().filter(|t| large.contains(*t)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Tokenize both texts through `cache` and compare them.
pub fn jaccard(cache: &TokenCache, a: &str, b: &str, min_threshold: Option<f64>) -> f64 {
    let ta = cache.tokens(a);
    let tb = cache.tokens(b);
    let sa: FxHashSet<&str> = ta.iter().map(String::as_str).collect();
    let sb: FxHashSet<&str> = tb.iter().map(String::as_str).collect();
    jaccard_sets(&sa, &sb, min_threshold)
}

/// Cache-backed scorer bound to one run.
#[derive(Debug, Clone, Copy)]
pub struct JaccardScorer<'a> {
    cache: &'a TokenCache,
}

impl<'a> JaccardScorer<'a> {
    pub fn new(cache: &'a TokenCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &'a TokenCache {
        self.cache
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        jaccard(self.cache, a, b, None)
    }

    /// Score with length-ratio pruning at `threshold`.
    pub fn score_pruned(&self, a: &str, b: &str, threshold: f64) -> f64 {
        jaccard(self.cache, a, b, Some(threshold))
    }

    /// True when `a` and `b` score at or above `threshold`.
    pub fn is_similar(&self, a: &str, b: &str, threshold: f64) -> bool {
        self.score_pruned(a, b, threshold) >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Tokenizer;

    fn cache() -> TokenCache {
        TokenCache::new(Tokenizer::new(2, false))
    }

    #[test]
    fn empty_cases() {
        let c = cache();
        assert_eq!(jaccard(&c, "", "", None), 1.0);
        assert_eq!(jaccard(&c, "!!", "a", None), 1.0);
        assert_eq!(jaccard(&c, "", "hello world", None), 0.0);
        assert_eq!(jaccard(&c, "hello world", "", None), 0.0);
    }

    #[test]
    fn partial_overlap() {
        let c = cache();
        let s = jaccard(&c, "export report now", "export report later", None);
        assert!((s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn duplicate_tokens_count_once() {
        let c = cache();
        assert_eq!(jaccard(&c, "alpha alpha beta", "alpha beta", None), 1.0);
        // Set sizes are equal, so pruning must not reject this identical pair.
        assert_eq!(jaccard(&c, "alpha alpha beta", "alpha beta", Some(0.9)), 1.0);
    }

    #[test]
    fn pruning_rejects_lopsided_pairs() {
        let c = cache();
        let a = "one two";
        let b = "one two three four five six";
        assert!(jaccard(&c, a, b, None) > 0.0);
        assert_eq!(jaccard(&c, a, b, Some(0.5)), 0.0);
    }

    #[test]
    fn scorer_threshold_check() {
        let c = cache();
        let s = JaccardScorer::new(&c);
        assert!(s.is_similar("send invoice reminder", "Send invoice reminder!", 0.78));
        assert!(!s.is_similar("eksportere rapport", "slette vedlegg", 0.78));
    }
}
