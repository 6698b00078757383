//! Audit logger for anonymization runs

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::anonymization::models::{AnonymizedDocument, AnonymizedOccurrence};
use crate::domain::{AnonymizerError, Result};

/// Audit log entry, one per document
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: String,
    document: String,
    occurrences_count: usize,
    processing_time_ms: u64,
    counts_by_category: BTreeMap<String, usize>,
    occurrences: Vec<AuditOccurrence>,
}

/// Audit occurrence entry (with hashed PHI)
#[derive(Debug, Serialize)]
struct AuditOccurrence {
    category: String,
    location: String,
    type_path: String,
    changed: bool,
    /// SHA-256 hash of original value (never log plaintext PHI)
    value_hash: String,
}

/// Appends one line per anonymized document to an audit file
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
    run_id: Uuid,
}

impl AuditLogger {
    /// Create a new audit logger with a fresh run id
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AnonymizerError::Io(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
            run_id: Uuid::new_v4(),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Log an anonymized document
    pub fn log_document(&self, document: &AnonymizedDocument) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: document.timestamp.to_rfc3339(),
            run_id: self.run_id.to_string(),
            document: document.name.clone(),
            occurrences_count: document.total_occurrences(),
            processing_time_ms: document.processing_time_ms,
            counts_by_category: document
                .stats_by_category()
                .into_iter()
                .map(|(category, count)| (category.to_string(), count))
                .collect(),
            occurrences: document
                .occurrences
                .iter()
                .map(|item| self.create_audit_occurrence(item))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn create_audit_occurrence(&self, item: &AnonymizedOccurrence) -> AuditOccurrence {
        AuditOccurrence {
            category: item.occurrence.category.to_string(),
            location: item.occurrence.location.to_string(),
            type_path: item.occurrence.type_path_display(),
            changed: !item.is_unchanged(),
            value_hash: hash_value(&item.occurrence.original()),
        }
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                AnonymizerError::Io(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        if self.json_format {
            let json_line = serde_json::to_string(entry)?;
            writeln!(file, "{json_line}")?;
        } else {
            writeln!(
                file,
                "[{}] Run: {} | Document: {} | Occurrences: {} | Time: {}ms",
                entry.timestamp,
                entry.run_id,
                entry.document,
                entry.occurrences_count,
                entry.processing_time_ms
            )?;
        }

        Ok(())
    }
}

/// Hash a PHI value using SHA-256
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
