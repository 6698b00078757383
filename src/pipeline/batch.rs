//! Batch runner over a file or a directory of documents
//!
//! Sequential runs share one [`Anonymizer`] so a value repeated across documents gets the
//! same replacement everywhere. Parallel runs give every document its own anonymizer and
//! bound the number of blocking workers with a semaphore.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::document::DocumentAnonymizer;
use crate::anonymization::{
    AnonymizedDocument, Anonymizer, AnonymizerSettings, AuditLogger, DebugTable, RunSummary,
};
use crate::config::AppConfig;
use crate::domain::{AnonymizerError, Result};
use crate::log_error_with_context;

/// How a batch is processed
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Appended to each input path to form its output path
    pub output_suffix: String,
    /// Delete earlier outputs found in an input directory
    pub remove_previous_outputs: bool,
    /// Documents in flight at once; 1 is the sequential, shared-anonymizer mode
    pub parallel_documents: usize,
    /// Collect original/replacement tables
    pub debug_samples: bool,
    pub settings: AnonymizerSettings,
}

impl BatchOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            output_suffix: config.processing.output_suffix.clone(),
            remove_previous_outputs: config.processing.remove_previous_outputs,
            parallel_documents: config.processing.parallel_documents.max(1),
            debug_samples: config.processing.debug_samples,
            settings: AnonymizerSettings::from(&config.determinism),
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub summary: RunSummary,
    /// Empty unless debug samples were requested
    pub debug_tables: Vec<DebugTable>,
    /// Output files written, in input order
    pub outputs: Vec<PathBuf>,
}

type Outcome = (PathBuf, Result<AnonymizedDocument>);

pub struct BatchRunner {
    documents: Arc<DocumentAnonymizer>,
    options: BatchOptions,
    audit: Option<Arc<AuditLogger>>,
}

impl BatchRunner {
    pub fn new(documents: DocumentAnonymizer, options: BatchOptions) -> Self {
        Self {
            documents: Arc::new(documents),
            options,
            audit: None,
        }
    }

    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(Arc::new(logger));
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Output path for one input: the input path with the suffix appended
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut name: OsString = input.as_os_str().to_os_string();
        name.push(&self.options.output_suffix);
        PathBuf::from(name)
    }

    /// Lists the documents to process, sorted by path.
    ///
    /// A directory is scanned without recursion for `*.xml`. Files ending in the output
    /// suffix are never inputs; they are deleted first when so configured.
    pub fn discover_inputs(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            return Err(AnonymizerError::Io(format!(
                "Input not found: {}",
                input.display()
            )));
        }

        let mut inputs = Vec::new();
        for entry in fs::read_dir(input)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if name.ends_with(&self.options.output_suffix) {
                if self.options.remove_previous_outputs {
                    fs::remove_file(&path)?;
                    debug!(path = %path.display(), "Removed previous output");
                }
                continue;
            }
            if name.to_lowercase().ends_with(".xml") {
                inputs.push(path);
            }
        }

        inputs.sort();
        Ok(inputs)
    }

    /// Anonymizes every input document.
    ///
    /// Per-document failures are logged and counted; only problems with the input
    /// location itself or a crashed worker fail the run.
    pub async fn run(&self, input: &Path) -> Result<BatchReport> {
        let start = Instant::now();
        let inputs = self.discover_inputs(input)?;

        info!(
            input = %input.display(),
            documents = inputs.len(),
            parallel = self.options.parallel_documents,
            deterministic = self.options.settings.deterministic,
            "Starting anonymization run"
        );

        let outcomes = if self.options.parallel_documents > 1 {
            self.run_parallel(inputs).await?
        } else {
            self.run_sequential(inputs).await?
        };

        let mut report = BatchReport::default();
        for (path, outcome) in outcomes {
            self.record(&mut report, &path, outcome);
        }
        report.summary.set_duration(start.elapsed());

        info!(
            processed = report.summary.documents_processed,
            failed = report.summary.documents_failed,
            occurrences = report.summary.total_occurrences,
            duration_ms = report.summary.stats.run_duration_ms,
            "Anonymization run finished"
        );

        Ok(report)
    }

    async fn run_sequential(&self, inputs: Vec<PathBuf>) -> Result<Vec<Outcome>> {
        let documents = Arc::clone(&self.documents);
        let settings = self.options.settings;
        let suffix = self.options.output_suffix.clone();

        tokio::task::spawn_blocking(move || {
            let mut anonymizer = Anonymizer::new(settings);
            inputs
                .into_iter()
                .map(|path| {
                    let outcome = process_file(&documents, &path, &suffix, &mut anonymizer);
                    (path, outcome)
                })
                .collect::<Vec<Outcome>>()
        })
        .await
        .map_err(|e| AnonymizerError::Other(format!("Anonymization worker failed: {e}")))
    }

    async fn run_parallel(&self, inputs: Vec<PathBuf>) -> Result<Vec<Outcome>> {
        let semaphore = Arc::new(Semaphore::new(self.options.parallel_documents));
        let mut handles: Vec<(PathBuf, JoinHandle<Result<AnonymizedDocument>>)> = Vec::new();

        for path in inputs {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| AnonymizerError::Other(format!("Worker pool closed: {e}")))?;

            let documents = Arc::clone(&self.documents);
            let settings = self.options.settings;
            let suffix = self.options.output_suffix.clone();
            let task_path = path.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let mut anonymizer = Anonymizer::new(settings);
                process_file(&documents, &task_path, &suffix, &mut anonymizer)
            });
            handles.push((path, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let outcome = handle.await.map_err(|e| {
                AnonymizerError::Other(format!(
                    "Anonymization worker for {} failed: {e}",
                    path.display()
                ))
            })?;
            outcomes.push((path, outcome));
        }
        Ok(outcomes)
    }

    fn record(&self, report: &mut BatchReport, path: &Path, outcome: Result<AnonymizedDocument>) {
        match outcome {
            Ok(document) => {
                if let Some(audit) = &self.audit {
                    if let Err(e) = audit.log_document(&document) {
                        warn!(document = %document.name, error = %e, "Failed to write audit entry");
                    }
                }
                if self.options.debug_samples {
                    report.debug_tables.push(DebugTable::from_document(&document));
                }
                report.summary.add_document(&document);
                report.outputs.push(self.output_path(path));
            }
            Err(e) => {
                log_error_with_context!(&e, "Failed to anonymize document");
                report.summary.add_failure(display_name(path), &e);
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn process_file(
    documents: &DocumentAnonymizer,
    path: &Path,
    suffix: &str,
    anonymizer: &mut Anonymizer,
) -> Result<AnonymizedDocument> {
    let name = display_name(path);
    let xml = fs::read_to_string(path)
        .map_err(|e| AnonymizerError::Io(format!("Failed to read {}: {e}", path.display())))?;

    let document = documents.anonymize_document(&name, &xml, anonymizer)?;

    let mut output: OsString = path.as_os_str().to_os_string();
    output.push(suffix);
    write_atomically(Path::new(&output), &document.xml)?;

    Ok(document)
}

/// Writes to a sibling temp file, then renames it over `path`
fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp: OsString = path.as_os_str().to_os_string();
    temp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let temp = PathBuf::from(temp);

    let written = fs::write(&temp, contents).and_then(|()| fs::rename(&temp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(AnonymizerError::Io(format!(
            "Failed to write {}: {e}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"<ClinicalDocument xmlns="urn:hl7-org:v3">
  <id root="2.16.840.1.113883.19.5" extension="A-100234"/>
  <effectiveTime value="20141023"/>
</ClinicalDocument>
"#;

    fn runner(options: BatchOptions) -> BatchRunner {
        BatchRunner::new(DocumentAnonymizer::builtin().unwrap(), options)
    }

    #[test]
    fn test_output_path_appends_suffix() {
        let runner = runner(BatchOptions::default());
        assert_eq!(
            runner.output_path(Path::new("/data/case.xml")),
            PathBuf::from("/data/case.xml.anonymized.xml")
        );
    }

    #[test]
    fn test_discover_inputs_skips_and_removes_outputs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), DOCUMENT).unwrap();
        fs::write(dir.path().join("a.XML"), DOCUMENT).unwrap();
        fs::write(dir.path().join("a.XML.anonymized.xml"), DOCUMENT).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let runner = runner(BatchOptions::default());
        let inputs = runner.discover_inputs(dir.path()).unwrap();
        assert_eq!(
            inputs,
            vec![dir.path().join("a.XML"), dir.path().join("b.xml")]
        );
        assert!(!dir.path().join("a.XML.anonymized.xml").exists());
    }

    #[test]
    fn test_discover_inputs_keeps_outputs_when_configured() {
        let dir = tempdir().unwrap();
        let previous = dir.path().join("case.xml.anonymized.xml");
        fs::write(&previous, DOCUMENT).unwrap();

        let runner = runner(BatchOptions {
            remove_previous_outputs: false,
            ..BatchOptions::default()
        });
        assert!(runner.discover_inputs(dir.path()).unwrap().is_empty());
        assert!(previous.exists());
    }

    #[test]
    fn test_discover_inputs_missing() {
        let runner = runner(BatchOptions::default());
        let err = runner
            .discover_inputs(Path::new("/nonexistent/eicr/input"))
            .unwrap_err();
        assert!(matches!(err, AnonymizerError::Io(_)));
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xml");
        fs::write(&path, "old").unwrap();
        write_atomically(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_run_single_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("case.xml");
        fs::write(&input, DOCUMENT).unwrap();

        let runner = runner(BatchOptions {
            debug_samples: true,
            ..BatchOptions::default()
        });
        let report = runner.run(&input).await.unwrap();

        assert_eq!(report.summary.documents_processed, 1);
        assert_eq!(report.summary.documents_failed, 0);
        assert_eq!(report.debug_tables.len(), 1);
        assert_eq!(report.outputs, vec![runner.output_path(&input)]);

        let output = fs::read_to_string(runner.output_path(&input)).unwrap();
        assert!(!output.contains("A-100234"));
        assert!(!output.contains("20141023"));
    }
}
