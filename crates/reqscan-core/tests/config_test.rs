//! Layered configuration: file, environment, overrides, and recovery from
//! invalid values.

use std::collections::BTreeMap;
use std::sync::Mutex;

use reqscan_core::config::{ReportLanguage, ReqscanConfig};

/// Serializes tests that touch process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_config(dir: &tempfile::TempDir, body: &str) {
    std::fs::write(dir.path().join("reqscan.toml"), body).unwrap();
}

#[test]
fn missing_file_yields_defaults_without_warnings() {
    let _g = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let resolved = ReqscanConfig::load(dir.path(), &BTreeMap::new());
    assert!(resolved.is_clean());
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.78);
}

#[test]
fn project_file_values_are_used() {
    let _g = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_config(
        &dir,
        r#"
[similarity]
threshold = 0.85

[dedup]
batch_size = 100

[report]
language = "en"
"#,
    );
    let resolved = ReqscanConfig::load(dir.path(), &BTreeMap::new());
    assert!(resolved.is_clean(), "{:?}", resolved.warnings);
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.85);
    assert_eq!(resolved.config.dedup.effective_batch_size(), 100);
    assert_eq!(resolved.config.report.effective_language(), ReportLanguage::En);
}

#[test]
fn malformed_file_is_a_warning_not_an_error() {
    let _g = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "[similarity\nthreshold = ");
    let resolved = ReqscanConfig::load(dir.path(), &BTreeMap::new());
    assert_eq!(resolved.warnings.len(), 1);
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.78);
}

#[test]
fn env_overrides_file_and_overrides_beat_env() {
    let _g = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "[dedup]\nbatch_size = 100\n[similarity]\nthreshold = 0.5\n");
    std::env::set_var("REQSCAN_DEDUP_BATCH_SIZE", "200");
    std::env::set_var("REQSCAN_SIMILARITY_THRESHOLD", "0.6");

    let mut overrides = BTreeMap::new();
    overrides.insert("similarity.threshold".to_string(), "0.7".to_string());
    let resolved = ReqscanConfig::load(dir.path(), &overrides);

    std::env::remove_var("REQSCAN_DEDUP_BATCH_SIZE");
    std::env::remove_var("REQSCAN_SIMILARITY_THRESHOLD");

    assert!(resolved.is_clean(), "{:?}", resolved.warnings);
    assert_eq!(resolved.config.dedup.effective_batch_size(), 200);
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.7);
}

#[test]
fn out_of_range_threshold_falls_back_with_warning() {
    let _g = ENV_MUTEX.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut overrides = BTreeMap::new();
    overrides.insert("similarity.threshold".to_string(), "1.5".to_string());
    overrides.insert("dedup.batch_size".to_string(), "0".to_string());
    overrides.insert("TOKEN_MIN_LEN".to_string(), "three".to_string());

    let resolved = ReqscanConfig::load(dir.path(), &overrides);

    let fields: Vec<&str> = resolved.warnings.iter().map(|w| w.field.as_str()).collect();
    assert!(fields.contains(&"similarity.threshold"));
    assert!(fields.contains(&"dedup.batch_size"));
    assert!(fields.contains(&"similarity.min_token_len"));
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.78);
    assert_eq!(resolved.config.dedup.effective_batch_size(), 400);
    assert_eq!(resolved.config.similarity.effective_min_token_len(), 2);
}

#[test]
fn nan_threshold_is_rejected() {
    let mut overrides = BTreeMap::new();
    overrides.insert("similarity.threshold".to_string(), "NaN".to_string());
    let resolved = ReqscanConfig::default().resolve(&overrides);
    assert_eq!(resolved.warnings.len(), 1);
    assert_eq!(resolved.config.similarity.effective_threshold(), 0.78);
}

#[test]
fn unknown_override_key_is_reported() {
    let mut overrides = BTreeMap::new();
    overrides.insert("similarity.colour".to_string(), "blue".to_string());
    let resolved = ReqscanConfig::default().resolve(&overrides);
    assert_eq!(resolved.warnings.len(), 1);
    assert_eq!(resolved.warnings[0].field, "similarity.colour");
}

#[test]
fn config_survives_toml_roundtrip() {
    let mut config = ReqscanConfig::default();
    config.similarity.threshold = Some(0.8);
    config.rules.disabled = vec!["dead_routines".to_string()];
    let text = config.to_toml().unwrap();
    let back = ReqscanConfig::from_toml(&text).unwrap();
    assert_eq!(back.similarity.threshold, Some(0.8));
    assert!(!back.rules.is_enabled("dead_routines"));
}
