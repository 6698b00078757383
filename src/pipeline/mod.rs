//! Document pipeline
//!
//! [`DocumentAnonymizer`] takes one document from text to anonymized bytes;
//! [`BatchRunner`] applies it to a file or directory and writes the outputs.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use eicr_anonymizer::pipeline::{BatchOptions, BatchRunner, DocumentAnonymizer};
//!
//! # async fn example() -> eicr_anonymizer::domain::Result<()> {
//! let runner = BatchRunner::new(DocumentAnonymizer::builtin()?, BatchOptions::default());
//! let report = runner.run(Path::new("./eicrs")).await?;
//! println!("{}", report.summary.format_console());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod document;

pub use batch::{BatchOptions, BatchReport, BatchRunner};
pub use document::DocumentAnonymizer;
