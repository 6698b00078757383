//! Configuration schema types
//!
//! Every section carries serde defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::anonymization::{AnonymizerSettings, DEFAULT_SEED};
use crate::domain::Result;
use crate::schema::SchemaCatalogue;
use crate::sensitivity::{SensitivityConfig, SensitivityLayer};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Root configuration, one field per TOML section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub determinism: DeterminismConfig,

    #[serde(default)]
    pub sensitivity: SensitivityPaths,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.processing.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid application.log_level '{}'. Must be one of: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Reproducibility settings for the anonymizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeterminismConfig {
    /// Derive every random draw from the call parameters and the seed
    #[serde(default)]
    pub enabled: bool,

    /// Global seed; defaults to 740 when determinism is enabled without one
    #[serde(default)]
    pub seed: Option<u64>,
}

impl From<&DeterminismConfig> for AnonymizerSettings {
    fn from(config: &DeterminismConfig) -> Self {
        Self {
            deterministic: config.enabled,
            seed: config.seed,
        }
    }
}

impl DeterminismConfig {
    pub fn effective_seed(&self) -> Option<u64> {
        match (self.enabled, self.seed) {
            (_, Some(seed)) => Some(seed),
            (true, None) => Some(DEFAULT_SEED),
            (false, None) => None,
        }
    }
}

/// Optional overrides for the bundled catalogue and sensitivity layers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensitivityPaths {
    /// Replaces the built-in schema catalogue
    #[serde(default)]
    pub catalogue: Option<PathBuf>,

    /// Replaces the built-in default sensitivity layer
    #[serde(default)]
    pub default_layer: Option<PathBuf>,

    /// Custom layer overlaid on the default one
    #[serde(default)]
    pub custom_layer: Option<PathBuf>,
}

impl SensitivityPaths {
    pub fn load_catalogue(&self) -> Result<SchemaCatalogue> {
        match &self.catalogue {
            Some(path) => SchemaCatalogue::from_file(path),
            None => SchemaCatalogue::builtin(),
        }
    }

    /// Loads and validates both layers against `catalogue`
    pub fn load_sensitivity(&self, catalogue: &SchemaCatalogue) -> Result<SensitivityConfig> {
        let default = match &self.default_layer {
            Some(path) => SensitivityLayer::from_file(path)?,
            None => SensitivityLayer::builtin_default()?,
        };
        let custom = self
            .custom_layer
            .as_deref()
            .map(SensitivityLayer::from_file::<&Path>)
            .transpose()?;
        SensitivityConfig::from_layers(catalogue, default, custom)
    }
}

/// Batch processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Appended to the input file name to form the output name
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Delete earlier outputs in the input directory before the run
    #[serde(default = "default_true")]
    pub remove_previous_outputs: bool,

    /// Documents anonymized concurrently; 1 shares one anonymizer across the run
    #[serde(default = "default_parallel_documents")]
    pub parallel_documents: usize,

    /// Print original/replacement tables (contains PHI)
    #[serde(default)]
    pub debug_samples: bool,
}

impl ProcessingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.output_suffix.trim().is_empty() {
            return Err("processing.output_suffix cannot be empty".to_string());
        }
        if !self.output_suffix.to_lowercase().ends_with(".xml") {
            return Err(format!(
                "processing.output_suffix '{}' must end with .xml",
                self.output_suffix
            ));
        }
        if self.parallel_documents == 0 {
            return Err("processing.parallel_documents must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_suffix: default_output_suffix(),
            remove_previous_outputs: true,
            parallel_documents: default_parallel_documents(),
            debug_samples: false,
        }
    }
}

/// Audit log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// One JSON object per line instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Mirror logs to a rotating JSON file
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if !VALID_ROTATIONS.contains(&self.local_rotation.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                VALID_ROTATIONS.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_suffix() -> String {
    ".anonymized.xml".to_string()
}

fn default_parallel_documents() -> usize {
    1
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
