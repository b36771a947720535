//! Configuration system for reqscan.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod dedup_config;
pub mod ingest_config;
pub mod report_config;
pub mod reqscan_config;
pub mod rules_config;
pub mod scan_config;
pub mod scoring_config;
pub mod similarity_config;

pub use dedup_config::DedupConfig;
pub use ingest_config::{HistoryConfig, IngestConfig};
pub use report_config::{ReportConfig, ReportLanguage};
pub use reqscan_config::{ConfigWarning, ReqscanConfig, ResolvedConfig};
pub use rules_config::{GapConfig, RulesConfig};
pub use scan_config::ScanConfig;
pub use scoring_config::{ScoringConfig, ScoringWeights};
pub use similarity_config::SimilarityConfig;
