//! Token-set text comparison.

pub mod similarity;
pub mod tokenizer;

pub use similarity::{jaccard, jaccard_sets, JaccardScorer};
pub use tokenizer::{TokenCache, Tokenizer};
