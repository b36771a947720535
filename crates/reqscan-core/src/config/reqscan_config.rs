//! Top-level reqscan configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    DedupConfig, GapConfig, HistoryConfig, IngestConfig, ReportConfig, ReportLanguage,
    RulesConfig, ScanConfig, ScoringConfig, SimilarityConfig,
};
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const CONFIG_FILE_NAME: &str = "reqscan.toml";

const ENV_PREFIX: &str = "REQSCAN_";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Key/value overrides (applied via `apply_overrides`)
/// 2. Environment variables (`REQSCAN_<SECTION>_<KEY>`)
/// 3. Project config (`reqscan.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReqscanConfig {
    pub similarity: SimilarityConfig,
    pub dedup: DedupConfig,
    pub scan: ScanConfig,
    pub scoring: ScoringConfig,
    pub gap: GapConfig,
    pub rules: RulesConfig,
    pub report: ReportConfig,
    pub history: HistoryConfig,
    pub ingest: IngestConfig,
}

/// A configuration problem that was recovered from by using the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl From<ConfigError> for ConfigWarning {
    fn from(e: ConfigError) -> Self {
        let field = match &e {
            ConfigError::FileNotFound { path } | ConfigError::ParseError { path, .. } => {
                path.clone()
            }
            ConfigError::ValidationFailed { field, .. } => field.clone(),
            ConfigError::UnknownKey { key } => key.clone(),
        };
        Self {
            field,
            message: e.to_string(),
        }
    }
}

/// Configuration after all layers and validation, with every recovered
/// problem listed.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub config: ReqscanConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl ResolvedConfig {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

macro_rules! merge_options {
    ($base:expr, $other:expr; $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $base.$field = $other.$field.clone();
            }
        )+
    };
}

impl ReqscanConfig {
    /// Resolve configuration for a run. Never fails: unreadable files,
    /// malformed TOML, unparsable values and out-of-range values all become
    /// warnings and fall back to the compiled default.
    pub fn load(root: &Path, overrides: &BTreeMap<String, String>) -> ResolvedConfig {
        let mut config = Self::default();
        let mut warnings: Vec<ConfigWarning> = Vec::new();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            if let Err(e) = Self::merge_toml_file(&mut config, &project_config_path) {
                tracing::warn!(error = %e, "ignoring project config");
                warnings.push(e.into());
            }
        }

        let env: Vec<(String, String)> = std::env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self::apply_env_overrides(&mut config, &env, &mut warnings);

        Self::apply_overrides(&mut config, overrides, &mut warnings);

        warnings.extend(Self::validate(&mut config));

        for w in &warnings {
            tracing::warn!(field = %w.field, message = %w.message, "config warning");
        }

        ResolvedConfig { config, warnings }
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve an in-memory config without touching files or the environment.
    pub fn resolve(mut self, overrides: &BTreeMap<String, String>) -> ResolvedConfig {
        let mut warnings: Vec<ConfigWarning> = Vec::new();
        Self::apply_overrides(&mut self, overrides, &mut warnings);
        warnings.extend(Self::validate(&mut self));
        ResolvedConfig {
            config: self,
            warnings,
        }
    }

    /// Check every value. Invalid values are reset to `None` so the
    /// `effective_*` accessors return the default, and a warning is returned
    /// for each.
    pub fn validate(config: &mut ReqscanConfig) -> Vec<ConfigWarning> {
        let mut warnings: Vec<ConfigWarning> = Vec::new();

        check_unit(&mut config.similarity.threshold, "similarity.threshold", &mut warnings);
        check_positive(&mut config.similarity.min_token_len, "similarity.min_token_len", &mut warnings);

        check_positive(&mut config.dedup.batch_size, "dedup.batch_size", &mut warnings);
        check_positive(&mut config.dedup.yield_every, "dedup.yield_every", &mut warnings);

        check_positive(&mut config.scan.batch_size, "scan.batch_size", &mut warnings);
        check_positive(&mut config.scan.max_header_preview, "scan.max_header_preview", &mut warnings);
        check_positive(&mut config.scan.sample_rows, "scan.sample_rows", &mut warnings);
        check_positive(&mut config.scan.large_sheets, "scan.large_sheets", &mut warnings);
        check_positive(&mut config.scan.large_max_cols, "scan.large_max_cols", &mut warnings);
        check_positive(&mut config.scan.large_total_rows, "scan.large_total_rows", &mut warnings);

        check_unit(&mut config.gap.coverage_threshold, "gap.coverage_threshold", &mut warnings);
        check_unit(
            &mut config.rules.near_duplicate_threshold,
            "rules.near_duplicate_threshold",
            &mut warnings,
        );

        check_positive(&mut config.report.max_suggestions, "report.max_suggestions", &mut warnings);
        check_positive(&mut config.report.graph_max_nodes, "report.graph_max_nodes", &mut warnings);
        check_positive(&mut config.report.graph_max_edges, "report.graph_max_edges", &mut warnings);
        check_unit(
            &mut config.report.graph_similarity_threshold,
            "report.graph_similarity_threshold",
            &mut warnings,
        );

        check_positive(&mut config.ingest.batch_size, "ingest.batch_size", &mut warnings);
        check_positive(&mut config.ingest.top_n, "ingest.top_n", &mut warnings);

        if config.scoring.is_set() {
            let w = config.scoring.effective_weights();
            let parts = [w.source, w.cross, w.domain, w.text];
            let in_range = parts.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p));
            if !in_range || (w.sum() - 1.0).abs() > 0.001 {
                warnings.push(
                    ConfigError::ValidationFailed {
                        field: "scoring".to_string(),
                        message: format!("weights must be in [0, 1] and sum to 1.0, got {:.3}", w.sum()),
                    }
                    .into(),
                );
                config.scoring = ScoringConfig::default();
            }
        }

        warnings
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ReqscanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ReqscanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    pub fn merge(base: &mut ReqscanConfig, other: &ReqscanConfig) {
        merge_options!(base.similarity, other.similarity; threshold, min_token_len, fold_inflections);
        merge_options!(base.dedup, other.dedup; batch_size, yield_every, yield_pause_ms);
        merge_options!(
            base.scan, other.scan;
            batch_size, batch_pause_ms, max_header_preview, sample_rows,
            large_sheets, large_max_cols, large_total_rows,
        );
        merge_options!(base.scoring, other.scoring; source_weight, cross_weight, domain_weight, text_weight);
        merge_options!(base.gap, other.gap; coverage_threshold);
        if !other.gap.extra_exempt.is_empty() {
            base.gap.extra_exempt = other.gap.extra_exempt.clone();
        }
        merge_options!(base.rules, other.rules; near_duplicate_threshold);
        if !other.rules.disabled.is_empty() {
            base.rules.disabled = other.rules.disabled.clone();
        }
        merge_options!(
            base.report, other.report;
            language, max_suggestions, include_graph, graph_max_nodes,
            graph_max_edges, graph_similarity_threshold, title,
        );
        merge_options!(base.history, other.history; version, commit_label);
        merge_options!(base.ingest, other.ingest; enabled, batch_size, top_n);
    }

    /// Apply environment variable overrides.
    /// Pattern: `REQSCAN_SIMILARITY_THRESHOLD`, `REQSCAN_DEDUP_BATCH_SIZE`, etc.
    /// `REQSCAN_LOG` belongs to tracing and is skipped.
    pub fn apply_env_overrides(
        config: &mut ReqscanConfig,
        vars: &[(String, String)],
        warnings: &mut Vec<ConfigWarning>,
    ) {
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if rest == "LOG" {
                continue;
            }
            let rest = rest.to_ascii_lowercase();
            let Some((section, key)) = rest.split_once('_') else {
                continue;
            };
            let dotted = format!("{section}.{key}");
            match Self::set_key(config, &dotted, value) {
                Ok(()) => {}
                Err(ConfigError::UnknownKey { .. }) => {
                    tracing::debug!(var = %name, "ignoring unknown environment variable");
                }
                Err(e) => warnings.push(e.into()),
            }
        }
    }

    /// Apply key/value overrides (highest priority). Accepts dotted keys
    /// (`similarity.threshold`) and the legacy flat keys
    /// (`DEFAULT_JACCARD_THRESHOLD`, `INGEST_BATCH_SIZE`, ...).
    pub fn apply_overrides(
        config: &mut ReqscanConfig,
        overrides: &BTreeMap<String, String>,
        warnings: &mut Vec<ConfigWarning>,
    ) {
        for (key, value) in overrides {
            if let Err(e) = Self::set_key(config, key, value) {
                warnings.push(e.into());
            }
        }
    }

    /// Set a single value by key.
    pub fn set_key(config: &mut ReqscanConfig, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = legacy_alias(key).unwrap_or(key);
        match key {
            "similarity.threshold" => config.similarity.threshold = Some(parse(key, value)?),
            "similarity.min_token_len" => config.similarity.min_token_len = Some(parse(key, value)?),
            "similarity.fold_inflections" => {
                config.similarity.fold_inflections = Some(parse(key, value)?)
            }
            "dedup.batch_size" => config.dedup.batch_size = Some(parse(key, value)?),
            "dedup.yield_every" => config.dedup.yield_every = Some(parse(key, value)?),
            "dedup.yield_pause_ms" => config.dedup.yield_pause_ms = Some(parse(key, value)?),
            "scan.batch_size" => config.scan.batch_size = Some(parse(key, value)?),
            "scan.batch_pause_ms" => config.scan.batch_pause_ms = Some(parse(key, value)?),
            "scan.max_header_preview" => config.scan.max_header_preview = Some(parse(key, value)?),
            "scan.sample_rows" => config.scan.sample_rows = Some(parse(key, value)?),
            "scan.large_sheets" => config.scan.large_sheets = Some(parse(key, value)?),
            "scan.large_max_cols" => config.scan.large_max_cols = Some(parse(key, value)?),
            "scan.large_total_rows" => config.scan.large_total_rows = Some(parse(key, value)?),
            "scoring.source_weight" => config.scoring.source_weight = Some(parse(key, value)?),
            "scoring.cross_weight" => config.scoring.cross_weight = Some(parse(key, value)?),
            "scoring.domain_weight" => config.scoring.domain_weight = Some(parse(key, value)?),
            "scoring.text_weight" => config.scoring.text_weight = Some(parse(key, value)?),
            "gap.coverage_threshold" => config.gap.coverage_threshold = Some(parse(key, value)?),
            "gap.extra_exempt" => config.gap.extra_exempt = split_list(value),
            "rules.near_duplicate_threshold" => {
                config.rules.near_duplicate_threshold = Some(parse(key, value)?)
            }
            "rules.disabled" => config.rules.disabled = split_list(value),
            "report.language" => {
                config.report.language =
                    Some(ReportLanguage::parse(value).ok_or_else(|| ConfigError::ValidationFailed {
                        field: key.to_string(),
                        message: format!("unsupported language {value:?}"),
                    })?)
            }
            "report.max_suggestions" => config.report.max_suggestions = Some(parse(key, value)?),
            "report.include_graph" => config.report.include_graph = Some(parse(key, value)?),
            "report.graph_max_nodes" => config.report.graph_max_nodes = Some(parse(key, value)?),
            "report.graph_max_edges" => config.report.graph_max_edges = Some(parse(key, value)?),
            "report.graph_similarity_threshold" => {
                config.report.graph_similarity_threshold = Some(parse(key, value)?)
            }
            "report.title" => config.report.title = Some(value.to_string()),
            "history.version" => config.history.version = Some(value.to_string()),
            "history.commit_label" => config.history.commit_label = Some(value.to_string()),
            "ingest.enabled" => config.ingest.enabled = Some(parse(key, value)?),
            "ingest.batch_size" => config.ingest.batch_size = Some(parse(key, value)?),
            "ingest.top_n" => config.ingest.top_n = Some(parse(key, value)?),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Flat key names accepted for compatibility with older property stores.
fn legacy_alias(key: &str) -> Option<&'static str> {
    Some(match key {
        "DEFAULT_JACCARD_THRESHOLD" | "JACCARD" => "similarity.threshold",
        "TOKEN_MIN_LEN" => "similarity.min_token_len",
        "INGEST_BATCH_SIZE" => "ingest.batch_size",
        "LARGE_DATA_SHEETS" => "scan.large_sheets",
        "LARGE_DATA_MAXCOLS" => "scan.large_max_cols",
        "LARGE_DATA_TOTALROWS" => "scan.large_total_rows",
        "MAX_HEADER_PREVIEW" => "scan.max_header_preview",
        "MAX_SUGGESTIONS_IN_DOC" => "report.max_suggestions",
        "GRAPH_MAX_NODES" => "report.graph_max_nodes",
        "GRAPH_MAX_EDGES" => "report.graph_max_edges",
        "GRAPH_SIM_THRESHOLD" => "report.graph_similarity_threshold",
        "VERSION" => "history.version",
        _ => return None,
    })
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::ValidationFailed {
        field: key.to_string(),
        message: format!("cannot parse {value:?}"),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_unit(value: &mut Option<f64>, field: &str, warnings: &mut Vec<ConfigWarning>) {
    if let Some(v) = *value {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            warnings.push(
                ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!("must be between 0.0 and 1.0, got {v}"),
                }
                .into(),
            );
            *value = None;
        }
    }
}

fn check_positive(value: &mut Option<usize>, field: &str, warnings: &mut Vec<ConfigWarning>) {
    if *value == Some(0) {
        warnings.push(
            ConfigError::ValidationFailed {
                field: field.to_string(),
                message: "must be greater than 0".to_string(),
            }
            .into(),
        );
        *value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ReqscanConfig::default();
        assert_eq!(c.similarity.effective_threshold(), 0.78);
        assert_eq!(c.similarity.effective_min_token_len(), 2);
        assert_eq!(c.dedup.effective_batch_size(), 400);
        assert_eq!(c.scan.effective_large_sheets(), 25);
        assert_eq!(c.scan.effective_large_max_cols(), 60);
        assert_eq!(c.scan.effective_large_total_rows(), 30_000);
        assert_eq!(c.ingest.effective_top_n(), 300);
        assert!((c.scoring.effective_weights().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn legacy_keys_map_to_sections() {
        let mut overrides = BTreeMap::new();
        overrides.insert("DEFAULT_JACCARD_THRESHOLD".to_string(), "0.9".to_string());
        overrides.insert("INGEST_BATCH_SIZE".to_string(), "50".to_string());
        let resolved = ReqscanConfig::default().resolve(&overrides);
        assert!(resolved.is_clean());
        assert_eq!(resolved.config.similarity.effective_threshold(), 0.9);
        assert_eq!(resolved.config.ingest.effective_batch_size(), 50);
        assert_eq!(
            resolved.config.dedup.effective_batch_size(),
            ReqscanConfig::default().dedup.effective_batch_size()
        );
    }

    #[test]
    fn env_section_split_keeps_underscored_keys() {
        let mut config = ReqscanConfig::default();
        let mut warnings: Vec<ConfigWarning> = Vec::new();
        let vars = vec![
            ("REQSCAN_SCAN_LARGE_TOTAL_ROWS".to_string(), "500".to_string()),
            ("REQSCAN_LOG".to_string(), "debug".to_string()),
            ("REQSCAN_NOPE_THING".to_string(), "1".to_string()),
        ];
        ReqscanConfig::apply_env_overrides(&mut config, &vars, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(config.scan.effective_large_total_rows(), 500);
    }

    #[test]
    fn unbalanced_weights_fall_back_together() {
        let mut config = ReqscanConfig::from_toml("[scoring]\nsource_weight = 0.9\n").unwrap();
        let warnings = ReqscanConfig::validate(&mut config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "scoring");
        assert!(!config.scoring.is_set());
    }
}
