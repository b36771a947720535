//! Candidate generation from structural facts.

pub mod generator;
pub mod heuristics;
pub mod sanitize;
pub mod templates;

pub use generator::{generate_candidates, CandidateGenerator};
pub use heuristics::{HeuristicRule, BUILTIN_HEURISTICS};
pub use sanitize::sanitize_text;
pub use templates::{BuiltinTemplates, CandidateTemplates};
