//! Anonymization engine
//!
//! Turns discovered sensitive occurrences into realistic, format-preserving replacements.
//!
//! # Architecture
//!
//! - **Engine**: [`Anonymizer`] dispatches each occurrence to one strategy by category
//! - **Strategies**: timestamps, identifiers, telecom, names, addresses, free text
//! - **Consistency**: [`MappingCache`] maps repeated originals to the same replacement
//! - **Determinism**: [`ScopedSeed`] reseeds the anonymizer's own stream per call
//! - **Audit**: [`AuditLogger`] records hashed originals per document
//!
//! # Usage
//!
//! ```rust
//! use eicr_anonymizer::anonymization::{Anonymizer, AnonymizerSettings};
//!
//! let mut anonymizer = Anonymizer::new(AnonymizerSettings::default());
//! let line = anonymizer.anonymize_address_line("PO Box 123");
//! assert!(line.starts_with("PO Box "));
//! ```

pub mod address;
pub mod audit;
pub mod cache;
pub mod determinism;
pub mod engine;
pub mod format;
pub mod models;
pub mod pools;
pub mod report;
pub mod strategies;

pub use address::{AddressComponent, AddressLabel, AddressParser, RuleBasedAddressParser};
pub use audit::AuditLogger;
pub use cache::{CacheTable, LikeCharKind, MappingCache};
pub use determinism::{derive_seed, RandomStream, ScopedSeed, StreamOwner, DEFAULT_SEED};
pub use engine::{Anonymizer, AnonymizerSettings, REDACTION_MARKER};
pub use format::match_formatting;
pub use models::{AnonymizedDocument, AnonymizedOccurrence, FragmentReplacement, Replacement};
pub use pools::PoolKind;
pub use report::{DebugTable, RunSummary};
