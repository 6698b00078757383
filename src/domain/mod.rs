//! Domain types shared by every layer of the anonymizer.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T>`], an alias over [`AnonymizerError`]:
//!
//! ```rust
//! use eicr_anonymizer::domain::{AnonymizerError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = eicr_anonymizer::config::AppConfig::default();
//!     config
//!         .validate()
//!         .map_err(AnonymizerError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{AnonymizerError, ConfigIssue, ConfigLayer, IssueKind, ItemKind};
pub use result::Result;
