//! Results produced by the anonymization engine

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::discovery::{Category, OccurrenceTarget, SensitiveOccurrence};
use crate::document::NodePath;

/// New value for one text node of a rich text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentReplacement {
    #[serde(serialize_with = "display")]
    pub path: NodePath,
    pub value: String,
}

/// Replacement for one occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// Whole text content or attribute value
    Value(String),
    /// One entry per text node of a narrative block
    Fragments(Vec<FragmentReplacement>),
}

impl Replacement {
    /// Single-line rendering, used by the debug table
    pub fn rendered(&self) -> String {
        match self {
            Replacement::Value(value) => value.clone(),
            Replacement::Fragments(fragments) => fragments
                .iter()
                .map(|f| f.value.trim())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// An occurrence bound to its replacement
#[derive(Debug, Clone, Serialize)]
pub struct AnonymizedOccurrence {
    pub occurrence: SensitiveOccurrence,
    pub replacement: Replacement,
}

impl AnonymizedOccurrence {
    /// Whether the strategy left the value as it was
    pub fn is_unchanged(&self) -> bool {
        match (&self.replacement, &self.occurrence.target) {
            (Replacement::Fragments(fragments), OccurrenceTarget::Narrative(originals)) => {
                fragments.iter().zip(originals).all(|(new, old)| new.value == old.text)
            }
            (replacement, _) => replacement.rendered() == self.occurrence.original(),
        }
    }
}

/// One fully processed document
#[derive(Debug, Clone)]
pub struct AnonymizedDocument {
    /// Source file name
    pub name: String,
    /// Serialized output document
    pub xml: Vec<u8>,
    pub occurrences: Vec<AnonymizedOccurrence>,
    /// Safe tokens harvested from this document
    pub safe_tokens: usize,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl AnonymizedDocument {
    pub fn stats_by_category(&self) -> BTreeMap<Category, usize> {
        let mut stats = BTreeMap::new();
        for item in &self.occurrences {
            *stats.entry(item.occurrence.category.clone()).or_insert(0) += 1;
        }
        stats
    }

    pub fn total_occurrences(&self) -> usize {
        self.occurrences.len()
    }
}

fn display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
