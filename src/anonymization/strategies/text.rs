//! Free text: keep allow-listed, numeric or very short values, redact the rest

use crate::anonymization::engine::REDACTION_MARKER;
use crate::anonymization::format::match_formatting;
use crate::anonymization::Anonymizer;
use crate::discovery::normalize;

/// Normalized values up to this many characters are kept
pub const MIN_TEXT_LENGTH: usize = 3;

/// Vocabulary every anonymizer starts with
pub const COMMON_SAFE_WORDS: &[&str] = &[
    "Active",
    "Completed",
    "Final",
    "Preliminary",
    "Pending",
    "Negative",
    "Positive",
    "Detected",
    "Not detected",
    "Normal",
    "Abnormal",
    "Unknown",
    "Not applicable",
    "None",
    "Other",
    "Yes",
    "Male",
    "Female",
    "Home",
    "Work",
    "Mobile",
    "Primary",
    "Declined",
    "Asked but unknown",
    "No known allergies",
    "Resolved",
    "Inactive",
    "Encounter",
    "Reportable",
    "Not reportable",
    "Suspected",
    "Confirmed",
];

impl Anonymizer {
    /// Whether free text may be kept as it is
    pub fn is_safe_text(&self, value: &str) -> bool {
        let key = normalize(value);
        key.is_empty()
            || key.chars().all(char::is_numeric)
            || key.chars().count() <= MIN_TEXT_LENGTH
            || self.safe_tokens().contains(value)
    }

    /// Keep safe text, otherwise replace the whole value with the redaction marker
    pub fn anonymize_text(&mut self, value: &str) -> String {
        if self.is_safe_text(value) {
            value.to_string()
        } else {
            match_formatting(value, REDACTION_MARKER)
        }
    }
}
