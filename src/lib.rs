// eICR Anonymizer - PHI replacement for electronic initial case reports
// Copyright (c) 2025 eICR Anonymizer Contributors
// Licensed under the MIT License

//! # eICR Anonymizer
//!
//! Replaces protected health information in eICR (HL7 CDA R2) documents with realistic,
//! format-preserving fake values, leaving the document structure and clinical coding intact.
//!
//! ## Architecture
//!
//! - [`schema`] - catalogue of CDA data types, their attributes and child elements
//! - [`sensitivity`] - default and custom layers marking each value safe or sensitive
//! - [`document`] - owned XML tree, node paths and the rewriter
//! - [`discovery`] - schema-driven walk producing sensitive occurrences and safe tokens
//! - [`anonymization`] - per-category replacement strategies, mapping cache, determinism
//! - [`pipeline`] - one document end to end, and the batch runner
//! - [`config`], [`logging`], [`cli`] - application plumbing
//! - [`domain`] - error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eicr_anonymizer::anonymization::{Anonymizer, AnonymizerSettings};
//! use eicr_anonymizer::pipeline::DocumentAnonymizer;
//!
//! # fn example(xml: &str) -> eicr_anonymizer::domain::Result<()> {
//! let pipeline = DocumentAnonymizer::builtin()?;
//! let mut anonymizer = Anonymizer::new(AnonymizerSettings {
//!     deterministic: true,
//!     seed: Some(740),
//! });
//! let document = pipeline.anonymize_document("case.xml", xml, &mut anonymizer)?;
//! println!("{} values replaced", document.total_occurrences());
//! # Ok(())
//! # }
//! ```
//!
//! ## Consistency and Determinism
//!
//! One [`anonymization::Anonymizer`] maps a repeated original to the same replacement
//! everywhere it is used. With determinism enabled each replacement is derived from the
//! call parameters and the global seed alone, so separate runs and separate anonymizers
//! agree.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod document;
pub mod domain;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod sensitivity;
