//! Configuration management.
//!
//! TOML configuration with `${VAR}` substitution, `EICR_ANON_*` environment overrides and
//! validation. Every section is optional.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eicr_anonymizer::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("eicr-anonymizer.toml")?;
//! println!("Output suffix: {}", config.processing.output_suffix);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`DeterminismConfig`] - reproducible runs and the global seed
//! - [`SensitivityPaths`] - catalogue and sensitivity layer overrides
//! - [`ProcessingConfig`] - output naming and parallelism
//! - [`AuditConfig`] - hashed audit log
//! - [`LoggingConfig`] - rotating JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [determinism]
//! enabled = true
//! seed = 740
//!
//! [sensitivity]
//! custom_layer = "${EICR_CONFIG_DIR}/custom.toml"
//!
//! [processing]
//! parallel_documents = 4
//! ```

pub mod loader;
pub mod schema;
pub mod template;

pub use loader::{load_config, load_config_or_default, load_config_str};
pub use schema::{
    AppConfig, ApplicationConfig, AuditConfig, DeterminismConfig, LoggingConfig,
    ProcessingConfig, SensitivityPaths,
};
