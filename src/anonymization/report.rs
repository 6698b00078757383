//! Run reporting for anonymization
//!
//! [`RunSummary`] collects per-document statistics for a batch. [`DebugTable`] renders the
//! `type path | original | replacement` view printed by `--debug`; it contains PHI and is
//! only built on request.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::anonymization::models::AnonymizedDocument;

const MAX_FAILURES_SHOWN: usize = 20;

/// Statistics for one batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Documents written successfully
    pub documents_processed: usize,

    /// Documents that produced no output
    pub documents_failed: usize,

    /// Total occurrences anonymized
    pub total_occurrences: usize,

    /// Occurrences whose value actually changed
    pub replaced_occurrences: usize,

    /// Occurrences by category label
    pub occurrences_by_category: BTreeMap<String, usize>,

    /// Failed document names with their error
    pub failures: Vec<DocumentFailure>,

    pub stats: ProcessingStats,
}

/// One document that could not be anonymized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub document: String,
    pub error: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Sum of per-document processing times (ms)
    pub total_processing_time_ms: u64,

    /// Wall-clock duration of the run (ms)
    pub run_duration_ms: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results from an anonymized document
    pub fn add_document(&mut self, document: &AnonymizedDocument) {
        self.documents_processed += 1;
        self.total_occurrences += document.total_occurrences();
        self.replaced_occurrences += document
            .occurrences
            .iter()
            .filter(|item| !item.is_unchanged())
            .count();
        for (category, count) in document.stats_by_category() {
            *self
                .occurrences_by_category
                .entry(category.to_string())
                .or_insert(0) += count;
        }

        self.stats.total_processing_time_ms += document.processing_time_ms;
        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.documents_processed as u64;
    }

    pub fn add_failure(&mut self, document: impl Into<String>, error: impl ToString) {
        self.documents_failed += 1;
        self.failures.push(DocumentFailure {
            document: document.into(),
            error: error.to_string(),
        });
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.stats.run_duration_ms = duration.as_millis() as u64;
    }

    pub fn has_failures(&self) -> bool {
        self.documents_failed > 0
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let rule = "───────────────────────────────────────────────────────────────\n";
        let banner = "═══════════════════════════════════════════════════════════════\n";
        let mut output = String::new();

        output.push('\n');
        output.push_str(banner);
        output.push_str("                   ANONYMIZATION RUN SUMMARY                   \n");
        output.push_str(banner);
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str(rule);
        output.push_str(&format!(
            "  Documents Processed:         {}\n",
            self.documents_processed
        ));
        output.push_str(&format!(
            "  Documents Failed:            {}\n",
            self.documents_failed
        ));
        output.push_str(&format!(
            "  Sensitive Occurrences:       {}\n",
            self.total_occurrences
        ));
        output.push_str(&format!(
            "  Values Replaced:             {}\n",
            self.replaced_occurrences
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push_str(&format!(
            "  Run Duration:                {} ms\n",
            self.stats.run_duration_ms
        ));
        output.push('\n');

        if !self.occurrences_by_category.is_empty() {
            output.push_str("🔍 OCCURRENCES BY CATEGORY\n");
            output.push_str(rule);

            let mut categories: Vec<_> = self.occurrences_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));
            for (category, count) in categories {
                output.push_str(&format!("  {category:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.failures.is_empty() {
            output.push_str("⚠️  FAILED DOCUMENTS\n");
            output.push_str(rule);
            for failure in self.failures.iter().take(MAX_FAILURES_SHOWN) {
                output.push_str(&format!("  • {}: {}\n", failure.document, failure.error));
            }
            if self.failures.len() > MAX_FAILURES_SHOWN {
                output.push_str(&format!(
                    "  … and {} more\n",
                    self.failures.len() - MAX_FAILURES_SHOWN
                ));
            }
            output.push('\n');
        }

        output.push_str(banner);
        output.push('\n');
        output
    }

    /// Format summary as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-document `type path | original | replacement` table
#[derive(Debug, Clone)]
pub struct DebugTable {
    document: String,
    rows: Vec<[String; 3]>,
}

impl DebugTable {
    pub fn from_document(document: &AnonymizedDocument) -> Self {
        let rows = document
            .occurrences
            .iter()
            .map(|item| {
                [
                    item.occurrence.type_path_display(),
                    single_line(&item.occurrence.original()),
                    single_line(&item.replacement.rendered()),
                ]
            })
            .collect();
        Self {
            document: document.name.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let header = ["Type path", "Original", "Replacement"];
        let mut widths = header.map(str::len);
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: [&str; 3]| {
            format!(
                "| {:w0$} | {:w1$} | {:w2$} |\n",
                cells[0],
                cells[1],
                cells[2],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )
        };
        let separator = format!(
            "|{}|{}|{}|\n",
            "-".repeat(widths[0] + 2),
            "-".repeat(widths[1] + 2),
            "-".repeat(widths[2] + 2)
        );

        let mut output = format!("\n{}\n", self.document);
        output.push_str(&line(header));
        output.push_str(&separator);
        for row in &self.rows {
            output.push_str(&line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
        }
        output
    }
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
