//! reqscan-analysis: turns an artifact snapshot and an existing requirement
//! corpus into scored candidates, gap metrics, rule findings, a health
//! score, and a report.

pub mod candidates;
pub mod dedup;
pub mod gap;
pub mod health;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod text;
