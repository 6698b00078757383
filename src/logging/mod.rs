//! Logging
//!
//! Structured `tracing` output to the console, optionally mirrored to a rotating JSON
//! file. Original values are never logged; only document names, paths and counts.
//!
//! # Example
//!
//! ```no_run
//! use eicr_anonymizer::config::LoggingConfig;
//! use eicr_anonymizer::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(document = "case.xml", "Document anonymized");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, parse_rotation, LoggingGuard};

/// Log the start of a document
///
/// ```no_run
/// use eicr_anonymizer::log_document_start;
///
/// log_document_start!("case.xml", 1024);
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($document:expr, $bytes:expr) => {
        tracing::debug!(document = %$document, bytes = $bytes, "Anonymizing document");
    };
}

/// Log a finished document
///
/// ```no_run
/// use eicr_anonymizer::log_document_complete;
///
/// log_document_complete!("case.xml", 42, 17u64);
/// ```
#[macro_export]
macro_rules! log_document_complete {
    ($document:expr, $occurrences:expr, $duration_ms:expr) => {
        tracing::info!(
            document = %$document,
            occurrences = $occurrences,
            duration_ms = $duration_ms,
            "Document anonymized"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use eicr_anonymizer::domain::AnonymizerError;
/// use eicr_anonymizer::log_error_with_context;
///
/// let error = AnonymizerError::Configuration("bad suffix".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(error = %$error, context = $context, "Error occurred");
    };
}
