//! Gap analysis: requirement progress classes, undocumented routines,
//! coverage arithmetic, and ranked recommendations.

pub mod analyzer;
pub mod recommendations;

pub use analyzer::{CoverageStats, GapAnalyzer, GapReport, LIFECYCLE_HOOKS};
pub use recommendations::{recommend, Recommendation, RecommendationKind};
