//! Integration tests for configuration loading and validation
//!
//! Tests that touch `EICR_ANON_*` variables hold `ENV_MUTEX`.

use eicr_anonymizer::anonymization::AnonymizerSettings;
use eicr_anonymizer::config::{load_config, load_config_or_default, load_config_str, AppConfig};
use eicr_anonymizer::domain::AnonymizerError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for name in [
        "EICR_ANON_LOG_LEVEL",
        "EICR_ANON_DETERMINISTIC",
        "EICR_ANON_SEED",
        "EICR_ANON_CUSTOM_LAYER",
        "EICR_ANON_PARALLEL_DOCUMENTS",
        "EICR_ANON_AUDIT_ENABLED",
        "TEST_EICR_LAYER_DIR",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[determinism]
enabled = true
seed = 2024

[sensitivity]
custom_layer = "./layers/custom.toml"

[processing]
output_suffix = ".deid.xml"
remove_previous_outputs = false
parallel_documents = 8
debug_samples = true

[audit]
enabled = true
log_path = "/var/log/eicr/audit.log"
json_format = false

[logging]
local_enabled = true
local_path = "/var/log/eicr"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert!(config.determinism.enabled);
    assert_eq!(config.determinism.seed, Some(2024));
    assert_eq!(
        config.sensitivity.custom_layer,
        Some(PathBuf::from("./layers/custom.toml"))
    );
    assert_eq!(config.processing.output_suffix, ".deid.xml");
    assert_eq!(config.processing.parallel_documents, 8);
    assert!(config.processing.debug_samples);
    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
    assert_eq!(config.logging.local_rotation, "hourly");

    let settings = AnonymizerSettings::from(&config.determinism);
    assert!(settings.deterministic);
    assert_eq!(settings.seed, Some(2024));
}

#[test]
fn test_env_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_EICR_LAYER_DIR", "/etc/eicr");

    let config = load_config_str(
        "# uses ${TEST_EICR_UNSET_IN_COMMENT}\n[sensitivity]\ncustom_layer = \"${TEST_EICR_LAYER_DIR}/custom.toml\"\n",
    )
    .unwrap();
    assert_eq!(
        config.sensitivity.custom_layer,
        Some(PathBuf::from("/etc/eicr/custom.toml"))
    );

    cleanup_env_vars();
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("EICR_ANON_LOG_LEVEL", "warn");
    std::env::set_var("EICR_ANON_DETERMINISTIC", "true");
    std::env::set_var("EICR_ANON_SEED", "99");
    std::env::set_var("EICR_ANON_CUSTOM_LAYER", "/tmp/custom.toml");
    std::env::set_var("EICR_ANON_PARALLEL_DOCUMENTS", "3");
    std::env::set_var("EICR_ANON_AUDIT_ENABLED", "true");

    let config = load_config_str("[determinism]\nenabled = false\nseed = 1\n").unwrap();
    cleanup_env_vars();

    assert_eq!(config.application.log_level, "warn");
    assert!(config.determinism.enabled);
    assert_eq!(config.determinism.seed, Some(99));
    assert_eq!(
        config.sensitivity.custom_layer,
        Some(PathBuf::from("/tmp/custom.toml"))
    );
    assert_eq!(config.processing.parallel_documents, 3);
    assert!(config.audit.enabled);
}

#[test]
fn test_invalid_env_override() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("EICR_ANON_SEED", "not-a-number");

    let result = load_config_str("");
    cleanup_env_vars();

    let err = result.unwrap_err();
    assert!(matches!(err, AnonymizerError::Configuration(_)));
    assert!(err.to_string().contains("EICR_ANON_SEED"));
}

#[test]
fn test_missing_file_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config_or_default("definitely-missing-eicr.toml").unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.processing.output_suffix, defaults.processing.output_suffix);
    assert_eq!(config.application.log_level, "info");
    assert!(load_config("definitely-missing-eicr.toml").is_err());
}

#[test]
fn test_validation_errors_name_the_setting() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let err = load_config_str("[processing]\nparallel_documents = 0\n").unwrap_err();
    assert!(err.to_string().contains("parallel_documents"));

    let err = load_config_str("[logging]\nlocal_rotation = \"weekly\"\n").unwrap_err();
    assert!(err.to_string().contains("local_rotation"));

    let err = load_config_str("[application]\nlog_level = \"chatty\"\n").unwrap_err();
    assert!(err.to_string().contains("log_level"));
}

#[test]
fn test_custom_layer_errors_surface_on_load() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let layer = write_config("[II.attributes]\nnotAnAttribute = \"SAFE\"\n");
    let mut config = AppConfig::default();
    config.sensitivity.custom_layer = Some(layer.path().to_path_buf());

    let catalogue = config.sensitivity.load_catalogue().unwrap();
    let err = config.sensitivity.load_sensitivity(&catalogue).unwrap_err();
    assert!(matches!(err, AnonymizerError::Schema(_)));
    let message = err.to_string();
    assert!(message.contains("custom"), "{message}");
    assert!(message.contains("notAnAttribute"), "{message}");
    assert!(message.contains("II"), "{message}");
}
