//! Composite relevance score per candidate.
//!
//! score = w_source·source + w_cross·cross + w_domain·domain + w_text·text,
//! rounded to three decimals. Every component is in [0, 1].

use reqscan_core::config::ScoringWeights;
use reqscan_core::types::collections::FxHashMap;
use reqscan_core::types::{CandidateRecord, SourceKind};

use crate::text::TokenCache;

/// Text length (chars) below which a statement is considered too terse.
const MIN_GOOD_LEN: usize = 40;
/// Text length (chars) above which a statement is considered rambling.
const MAX_GOOD_LEN: usize = 300;

/// Opening phrases of a well-formed requirement, lowercased.
const MODAL_OPENINGS: &[&[&str]] = &[
    &["systemet", "skal"],
    &["system", "skal"],
    &["system", "shall"],
    &["the", "system", "shall"],
];

pub fn source_weight(kind: SourceKind) -> f64 {
    match kind {
        SourceKind::ScheduledJob => 1.0,
        SourceKind::MenuBinding => 0.7,
        SourceKind::DataField => 0.6,
        SourceKind::Heuristic => 0.5,
    }
}

pub fn domain_boost(kind: SourceKind) -> f64 {
    match kind {
        SourceKind::Heuristic => 1.0,
        _ => 0.5,
    }
}

/// Blend of length-in-range, modal opening and terminal punctuation.
pub fn text_quality(text: &str) -> f64 {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    let length: f64 = if len < MIN_GOOD_LEN {
        0.2
    } else if len > MAX_GOOD_LEN {
        0.4
    } else {
        1.0
    };

    let words: Vec<String> = trimmed
        .split_whitespace()
        .take(3)
        .map(str::to_lowercase)
        .collect();
    let opening = if MODAL_OPENINGS
        .iter()
        .any(|phrase| phrase.len() <= words.len() && phrase.iter().zip(&words).all(|(p, w)| *p == w.as_str()))
    {
        1.0
    } else {
        0.7
    };

    let punctuation = if trimmed.ends_with(['.', '!', '?']) {
        1.0
    } else {
        0.8
    };

    ((length + opening + punctuation) / 3.0).min(1.0)
}

/// Normalized form used for cross-frequency counting.
fn normalized_key(cache: &TokenCache, text: &str) -> String {
    cache.tokens(text).join(" ")
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Score every candidate and sort descending. The sort is stable, so equal
/// scores keep generation order.
pub fn score_and_sort(
    candidates: Vec<CandidateRecord>,
    weights: &ScoringWeights,
    cache: &TokenCache,
) -> Vec<CandidateRecord> {
    let keys: Vec<String> = candidates
        .iter()
        .map(|c| normalized_key(cache, &c.text))
        .collect();
    let mut frequency: FxHashMap<&str, usize> = FxHashMap::default();
    for key in &keys {
        *frequency.entry(key.as_str()).or_insert(0) += 1;
    }

    let mut scored: Vec<CandidateRecord> = candidates
        .into_iter()
        .zip(&keys)
        .map(|(c, key)| {
            let cross = (frequency.get(key.as_str()).copied().unwrap_or(1) as f64 / 3.0).min(1.0);
            let score = weights.source * source_weight(c.source_kind)
                + weights.cross * cross
                + weights.domain * domain_boost(c.source_kind)
                + weights.text * text_quality(&c.text);
            let score = round3(score);
            c.with_score(score)
        })
        .collect();

    scored.sort_by(|a, b| {
        let sa = a.score.unwrap_or(0.0);
        let sb = b.score.unwrap_or(0.0);
        sb.total_cmp(&sa)
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqscan_core::types::{Evidence, Priority};

    fn cand(text: &str, kind: SourceKind) -> CandidateRecord {
        CandidateRecord::new(
            text,
            kind,
            Priority::Should,
            Evidence::Keyword {
                keyword: "k".into(),
                area: "a".into(),
            },
        )
    }

    #[test]
    fn text_quality_components() {
        let good = "Systemet skal periodisk kjøre «nightlySync» (tidsstyrt).";
        assert!((text_quality(good) - 1.0).abs() < 1e-12);
        let terse = "do it";
        assert!((text_quality(terse) - (0.2 + 0.7 + 0.8) / 3.0).abs() < 1e-12);
        let english = "System shall handle form submissions via “onFormSubmit”!";
        assert!((text_quality(english) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scheduled_job_outranks_field_with_equal_text_quality() {
        let cache = TokenCache::default();
        let out = score_and_sort(
            vec![
                cand("Systemet skal forvalte datafelt «Dato» i arket «Budsjett».", SourceKind::DataField),
                cand("Systemet skal periodisk kjøre «nightlySync» (tidsstyrt).", SourceKind::ScheduledJob),
            ],
            &ScoringWeights::default(),
            &cache,
        );
        assert_eq!(out[0].source_kind, SourceKind::ScheduledJob);
        // 0.35·1.0 + 0.25·(1/3) + 0.20·0.5 + 0.20·1.0
        assert_eq!(out[0].score, Some(0.733));
    }

    #[test]
    fn repeated_text_raises_cross_frequency() {
        let cache = TokenCache::default();
        let text = "Systemet skal tilby menykommando «Eksport» som kaller «exportAll».";
        let out = score_and_sort(
            vec![
                cand(text, SourceKind::MenuBinding),
                cand(text, SourceKind::MenuBinding),
                cand(text, SourceKind::MenuBinding),
            ],
            &ScoringWeights::default(),
            &cache,
        );
        // 0.35·0.7 + 0.25·1.0 + 0.20·0.5 + 0.20·1.0
        assert_eq!(out[0].score, Some(0.795));
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let cache = TokenCache::default();
        let out = score_and_sort(
            vec![cand("first one", SourceKind::Heuristic), cand("second two", SourceKind::Heuristic)],
            &ScoringWeights::default(),
            &cache,
        );
        assert_eq!(out[0].text, "first one");
        assert_eq!(out[1].text, "second two");
    }
}
