//! Validate config command implementation
//!
//! Loads the application configuration, the schema catalogue and both sensitivity
//! layers, and reports the first problem found.

use std::path::PathBuf;

use clap::Args;

use crate::config::load_config_or_default;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Validate this custom layer instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub custom_layer: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration: {config_path}");
        println!();

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Application configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Some(layer) = &self.custom_layer {
            config.sensitivity.custom_layer = Some(layer.clone());
        }

        let catalogue = match config.sensitivity.load_catalogue() {
            Ok(c) => {
                println!("✅ Schema catalogue loaded ({} types)", c.len());
                c
            }
            Err(e) => {
                println!("❌ Failed to load schema catalogue");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let sensitivity = match config.sensitivity.load_sensitivity(&catalogue) {
            Ok(s) => {
                println!("✅ Sensitivity layers are valid");
                s
            }
            Err(e) => {
                println!("❌ Sensitivity configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let summary = sensitivity.summary();
        let layer_name = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Deterministic: {}", config.determinism.enabled);
        println!(
            "  Seed: {}",
            config
                .determinism
                .effective_seed()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string())
        );
        println!("  Catalogue: {}", layer_name(&config.sensitivity.catalogue));
        println!("  Default Layer: {}", layer_name(&config.sensitivity.default_layer));
        println!(
            "  Custom Layer: {}",
            config
                .sensitivity
                .custom_layer
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        println!(
            "  Types: {} ({} with safe text)",
            summary.types, summary.safe_text_types
        );
        println!(
            "  Attributes: {} ({} safe)",
            summary.attributes, summary.safe_attributes
        );
        println!(
            "  Elements: {} ({} safe, {} nested rules)",
            summary.elements, summary.safe_elements, summary.nested_rules
        );
        println!("  Output Suffix: {}", config.processing.output_suffix);
        println!(
            "  Parallel Documents: {}",
            config.processing.parallel_documents
        );
        println!("  Audit Log: {}", config.audit.enabled);
        println!();
        Ok(0)
    }
}
