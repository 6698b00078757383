//! Sensitive-node discovery.
//!
//! The [`DocumentWalker`] recurses over a parsed document driven entirely by the
//! [`SchemaCatalogue`](crate::schema::SchemaCatalogue) and the effective
//! [`SensitivityConfig`](crate::sensitivity::SensitivityConfig). It produces a list of
//! [`SensitiveOccurrence`]s, each classified into one [`Category`], and a set of
//! [`SafeTokens`] harvested from values marked safe.
//!
//! # Examples
//!
//! ```rust
//! use eicr_anonymizer::discovery::DocumentWalker;
//! use eicr_anonymizer::document::XmlDocument;
//! use eicr_anonymizer::schema::SchemaCatalogue;
//! use eicr_anonymizer::sensitivity::SensitivityConfig;
//!
//! # fn example() -> eicr_anonymizer::domain::Result<()> {
//! let catalogue = SchemaCatalogue::builtin()?;
//! let sensitivity = SensitivityConfig::builtin(&catalogue)?;
//! let doc = XmlDocument::parse(
//!     "case.xml",
//!     r#"<ClinicalDocument><effectiveTime value="20201107094421-0500"/></ClinicalDocument>"#,
//! )?;
//! let found = DocumentWalker::new(&catalogue, &sensitivity).walk(&doc)?;
//! assert_eq!(found.occurrences.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod occurrence;
pub mod registry;
pub mod safe_tokens;
pub mod walker;

pub use occurrence::{OccurrenceTarget, SensitiveOccurrence, TextFragment};
pub use registry::{classify_attribute, classify_text, Category};
pub use safe_tokens::{normalize, SafeTokens};
pub use walker::{Discovery, DocumentWalker};
