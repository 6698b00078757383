//! Sensitive occurrence data structures

use std::collections::BTreeMap;

use serde::Serialize;

use super::registry::Category;
use crate::document::NodePath;

/// One text node inside a rich text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFragment {
    #[serde(serialize_with = "display")]
    pub path: NodePath,
    pub text: String,
}

/// Which value of the node at `location` is sensitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceTarget {
    Text,
    Attribute(String),
    Narrative(Vec<TextFragment>),
}

/// One unit of work for the anonymization engine.
///
/// Created once per document walk and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitiveOccurrence {
    pub category: Category,
    #[serde(serialize_with = "display")]
    pub location: NodePath,
    pub target: OccurrenceTarget,
    pub raw_attributes: BTreeMap<String, String>,
    pub raw_text: Option<String>,
    /// Resolved catalogue type of the node
    pub type_name: String,
    /// Local element name of the node
    pub element_name: String,
    /// Ancestor type names from the document root, for diagnostics
    pub type_path: Vec<String>,
}

impl SensitiveOccurrence {
    /// The value this occurrence replaces; narrative fragments are joined with spaces
    pub fn original(&self) -> String {
        match &self.target {
            OccurrenceTarget::Text => self.raw_text.clone().unwrap_or_default(),
            OccurrenceTarget::Attribute(name) => {
                self.raw_attributes.get(name).cloned().unwrap_or_default()
            }
            OccurrenceTarget::Narrative(fragments) => fragments
                .iter()
                .map(|f| f.text.trim())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn type_path_display(&self) -> String {
        self.type_path.join(" > ")
    }
}

fn display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(target: OccurrenceTarget) -> SensitiveOccurrence {
        SensitiveOccurrence {
            category: Category::Identifier,
            location: NodePath::root().child(2),
            target,
            raw_attributes: BTreeMap::from([("extension".to_string(), "123-45".to_string())]),
            raw_text: Some(" text ".to_string()),
            type_name: "II".to_string(),
            element_name: "id".to_string(),
            type_path: vec!["ClinicalDocument".to_string(), "II".to_string()],
        }
    }

    #[test]
    fn test_original_by_target() {
        assert_eq!(
            occurrence(OccurrenceTarget::Attribute("extension".to_string())).original(),
            "123-45"
        );
        assert_eq!(occurrence(OccurrenceTarget::Text).original(), " text ");
        let fragments = vec![
            TextFragment {
                path: NodePath::root().child(0),
                text: " Seen ".to_string(),
            },
            TextFragment {
                path: NodePath::root().child(2),
                text: "today".to_string(),
            },
        ];
        assert_eq!(
            occurrence(OccurrenceTarget::Narrative(fragments)).original(),
            "Seen today"
        );
    }

    #[test]
    fn test_serializes_location_as_path_string() {
        let json = serde_json::to_value(occurrence(OccurrenceTarget::Text)).unwrap();
        assert_eq!(json["location"], "/2");
        assert_eq!(json["category"], "identifier");
    }
}
