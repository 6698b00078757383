//! Per-category anonymization strategies
//!
//! Each submodule adds methods to [`Anonymizer`](super::Anonymizer):
//! - [`timestamp`]: shift by the run-wide offset, same precision
//! - [`identifier`]: masked character-class scramble, cached
//! - [`telecom`]: scheme-aware synthetic endpoints
//! - [`names`]: pool lookups and organization name templates
//! - [`location`]: address lines and coded name/address parts
//! - [`text`]: safe-token allow-list or redaction

pub mod identifier;
pub mod location;
pub mod names;
pub mod telecom;
pub mod text;
pub mod timestamp;
