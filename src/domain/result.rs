//! Result alias used by every fallible library operation

use super::errors::AnonymizerError;

/// Library result type
///
/// # Examples
///
/// ```
/// use eicr_anonymizer::domain::{AnonymizerError, Result};
///
/// fn require_root(name: &str) -> Result<()> {
///     if name == "ClinicalDocument" {
///         Ok(())
///     } else {
///         Err(AnonymizerError::UnrecognizedRoot {
///             document: "case.xml".to_string(),
///             found: name.to_string(),
///             expected: "ClinicalDocument".to_string(),
///         })
///     }
/// }
///
/// assert!(require_root("Bundle").is_err());
/// ```
pub type Result<T> = std::result::Result<T, AnonymizerError>;
