//! Anonymize command implementation
//!
//! Anonymizes one eICR document or every `*.xml` document in a directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::anonymization::AuditLogger;
use crate::config::{load_config_or_default, AppConfig};
use crate::pipeline::{BatchOptions, BatchRunner, DocumentAnonymizer};

/// Arguments for the anonymize command
#[derive(Args, Debug, Default)]
pub struct AnonymizeArgs {
    /// Input document or directory of documents
    pub input: PathBuf,

    /// Global seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Derive every replacement from the original value and the seed
    #[arg(long)]
    pub deterministic: bool,

    /// Sensitivity overrides layered on the defaults
    #[arg(long, value_name = "FILE")]
    pub custom_layer: Option<PathBuf>,

    /// Print original and replacement values per document (shows PHI)
    #[arg(long)]
    pub debug: bool,

    /// Documents to anonymize concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl AnonymizeArgs {
    /// Apply command line overrides to the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            tracing::debug!("Overriding seed from CLI");
            config.determinism.seed = Some(seed);
        }
        if self.deterministic {
            config.determinism.enabled = true;
        }
        if let Some(layer) = &self.custom_layer {
            tracing::info!(custom_layer = %layer.display(), "Overriding custom layer from CLI");
            config.sensitivity.custom_layer = Some(layer.clone());
        }
        if self.debug {
            config.processing.debug_samples = true;
        }
        if let Some(jobs) = self.jobs {
            config.processing.parallel_documents = jobs;
        }
    }

    /// Execute the anonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting anonymize command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(2);
        }

        let catalogue = match config.sensitivity.load_catalogue() {
            Ok(catalogue) => catalogue,
            Err(e) => {
                eprintln!("❌ Failed to load schema catalogue: {e}");
                return Ok(2);
            }
        };
        let sensitivity = match config.sensitivity.load_sensitivity(&catalogue) {
            Ok(sensitivity) => sensitivity,
            Err(e) => {
                eprintln!("❌ Invalid sensitivity configuration: {e}");
                return Ok(2);
            }
        };

        let documents = DocumentAnonymizer::new(Arc::new(catalogue), Arc::new(sensitivity));
        let mut runner = BatchRunner::new(documents, BatchOptions::from_config(&config));
        if config.audit.enabled {
            let logger = AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?;
            tracing::info!(run_id = %logger.run_id(), path = %config.audit.log_path.display(), "Audit log enabled");
            runner = runner.with_audit_logger(logger);
        }

        if config.processing.debug_samples {
            println!("⚠️  Debug output shows original PHI values");
        }

        let report = match runner.run(&self.input).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Anonymization run failed");
                eprintln!("❌ Anonymization failed: {e}");
                return Ok(5);
            }
        };

        for table in &report.debug_tables {
            println!("{}", table.render());
        }
        println!("{}", report.summary.format_console());

        if report.summary.has_failures() {
            println!("⚠️  Anonymization completed with failures");
            Ok(1)
        } else {
            println!("✅ Anonymization completed successfully!");
            Ok(0)
        }
    }
}
