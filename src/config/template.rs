//! Commented example configuration written by `init`

/// Example configuration; every value shown is the default
pub const EXAMPLE_CONFIG: &str = r#"# eICR Anonymizer Configuration File
#
# Every section and key is optional. Values shown are the defaults.
# ${VAR} placeholders are replaced from the environment (or a .env file).
# EICR_ANON_* environment variables override values from this file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
# Override: EICR_ANON_LOG_LEVEL
log_level = "info"

# ============================================================================
# Determinism
# ============================================================================
[determinism]
# Make every replacement a pure function of the original value and the seed.
# Override: EICR_ANON_DETERMINISTIC
enabled = false

# Global seed. Without determinism a seed still makes the run reproducible
# as long as documents are processed in the same order.
# Override: EICR_ANON_SEED
# seed = 740

# ============================================================================
# Sensitivity
# ============================================================================
[sensitivity]
# Replace the built-in CDA schema catalogue
# catalogue = "./config/catalogue.toml"

# Replace the built-in default sensitivity layer (must cover every type)
# default_layer = "./config/default.toml"

# Overrides applied on top of the default layer, e.g.
#   [PN]
#   text_content = "SAFE"
# Override: EICR_ANON_CUSTOM_LAYER
# custom_layer = "./config/custom.toml"

# ============================================================================
# Processing
# ============================================================================
[processing]
# Output file name = input file name + suffix
output_suffix = ".anonymized.xml"

# Delete earlier outputs in the input directory before each run
remove_previous_outputs = true

# 1 keeps replacements consistent across documents.
# Larger values anonymize documents concurrently, each on its own.
# Override: EICR_ANON_PARALLEL_DOCUMENTS
parallel_documents = 1

# Print original/replacement tables after each document (shows PHI)
debug_samples = false

# ============================================================================
# Audit Log (hashed originals only)
# ============================================================================
[audit]
# Override: EICR_ANON_AUDIT_ENABLED
enabled = false
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# Mirror logs to a rotating JSON file
local_enabled = false
local_path = "./logs"

# daily, hourly, never
local_rotation = "daily"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_example_config_matches_defaults() {
        let config: AppConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());

        let defaults = AppConfig::default();
        assert_eq!(config.processing.output_suffix, defaults.processing.output_suffix);
        assert_eq!(config.audit.log_path, defaults.audit.log_path);
        assert_eq!(config.logging.local_path, defaults.logging.local_path);
        assert_eq!(config.determinism.seed, None);
    }
}
