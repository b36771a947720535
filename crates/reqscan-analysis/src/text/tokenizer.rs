//! Tokenizer and per-run token cache.
//!
//! Text is split at camel-case boundaries and at every run of
//! non-alphanumeric characters (Unicode-aware), lowercased, optionally
//! folded to a crude stem, and filtered by minimum length.

use std::cell::RefCell;
use std::rc::Rc;

use reqscan_core::config::SimilarityConfig;
use reqscan_core::types::collections::FxHashMap;

/// Suffixes stripped by inflection folding, longest first.
const INFLECTION_SUFFIXES: &[&str] = &["ene", "ere", "ers", "er", "en", "et", "es", "s", "e"];

/// Folding never leaves a stem shorter than this.
const MIN_STEM_CHARS: usize = 3;

/// Stateless text → token splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    min_len: usize,
    fold_inflections: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_len: SimilarityConfig::DEFAULT_MIN_TOKEN_LEN,
            fold_inflections: true,
        }
    }
}

impl Tokenizer {
    pub fn new(min_len: usize, fold_inflections: bool) -> Self {
        Self {
            min_len: min_len.max(1),
            fold_inflections,
        }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(
            config.effective_min_token_len(),
            config.effective_fold_inflections(),
        )
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Split `text` into its ordered token sequence. Duplicates are kept.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut prev: Option<char> = None;

        for ch in text.chars() {
            if ch.is_alphanumeric() {
                let camel_boundary = ch.is_uppercase()
                    && prev.is_some_and(|p| p.is_lowercase() || p.is_numeric());
                if camel_boundary {
                    self.flush(&mut current, &mut tokens);
                }
                current.extend(ch.to_lowercase());
            } else {
                self.flush(&mut current, &mut tokens);
            }
            prev = Some(ch);
        }
        self.flush(&mut current, &mut tokens);
        tokens
    }

    fn flush(&self, current: &mut String, tokens: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let raw = std::mem::take(current);
        let token = if self.fold_inflections {
            fold(&raw)
        } else {
            raw
        };
        if token.chars().count() >= self.min_len {
            tokens.push(token);
        }
    }
}

/// Repeatedly strip the first matching inflection suffix while a long enough
/// stem remains, so folding a folded token is a no-op. Tokens containing
/// digits are left alone.
fn fold(token: &str) -> String {
    if token.chars().any(|c| c.is_numeric()) {
        return token.to_string();
    }
    let mut stem = token;
    'strip: loop {
        let len = stem.chars().count();
        for suffix in INFLECTION_SUFFIXES {
            if let Some(shorter) = stem.strip_suffix(suffix) {
                if len - suffix.chars().count() >= MIN_STEM_CHARS {
                    stem = shorter;
                    continue 'strip;
                }
            }
        }
        return stem.to_string();
    }
}

/// Memoized tokenization keyed by the exact input string.
///
/// Lives for one run and is passed by reference to whatever needs tokens.
/// Single-threaded by construction.
#[derive(Debug, Default)]
pub struct TokenCache {
    tokenizer: Tokenizer,
    entries: RefCell<FxHashMap<String, Rc<[String]>>>,
}

impl TokenCache {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(Tokenizer::from_config(config))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokens for `text`, computed on first request.
    pub fn tokens(&self, text: &str) -> Rc<[String]> {
        if let Some(hit) = self.entries.borrow().get(text) {
            return Rc::clone(hit);
        }
        let tokens: Rc<[String]> = self.tokenizer.tokenize(text).into();
        self.entries
            .borrow_mut()
            .insert(text.to_string(), Rc::clone(&tokens));
        tokens
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
