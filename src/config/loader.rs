//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AppConfig;
use crate::domain::errors::AnonymizerError;
use crate::domain::result::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap_or_else(|_| unreachable!())
});

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`AppConfig`]
/// 4. Applies `EICR_ANON_*` environment overrides
/// 5. Validates the result
///
/// # Errors
///
/// Every failure is reported as [`AnonymizerError::Configuration`].
///
/// # Examples
///
/// ```no_run
/// use eicr_anonymizer::config::load_config;
///
/// let config = load_config("eicr-anonymizer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizerError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    load_config_str(&contents)
}

/// Loads the configuration file when it exists, otherwise starts from defaults.
///
/// Overrides and validation apply either way.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration text, as [`load_config`] does for a file
pub fn load_config_str(contents: &str) -> Result<AppConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| AnonymizerError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    config.validate().map_err(|e| {
        AnonymizerError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes `${VAR_NAME}` placeholders, leaving comment lines untouched.
///
/// # Errors
///
/// Lists every referenced variable that is not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = ENV_PLACEHOLDER.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|name| name == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies `EICR_ANON_*` environment overrides
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Ok(val) = std::env::var("EICR_ANON_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("EICR_ANON_DETERMINISTIC") {
        config.determinism.enabled = parse_env("EICR_ANON_DETERMINISTIC", &val)?;
    }
    if let Ok(val) = std::env::var("EICR_ANON_SEED") {
        config.determinism.seed = Some(parse_env("EICR_ANON_SEED", &val)?);
    }

    if let Ok(val) = std::env::var("EICR_ANON_CUSTOM_LAYER") {
        config.sensitivity.custom_layer = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("EICR_ANON_PARALLEL_DOCUMENTS") {
        config.processing.parallel_documents = parse_env("EICR_ANON_PARALLEL_DOCUMENTS", &val)?;
    }

    if let Ok(val) = std::env::var("EICR_ANON_AUDIT_ENABLED") {
        config.audit.enabled = parse_env("EICR_ANON_AUDIT_ENABLED", &val)?;
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AnonymizerError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}
