//! Domain error types
//!
//! This module defines the error hierarchy for the anonymizer. Load-time problems with the
//! schema catalogue or a sensitivity layer are reported as [`ConfigIssue`]s that name the
//! layer, the owning type and the offending item. Per-document failures always carry the
//! document name.

use std::fmt;

use thiserror::Error;

/// Main anonymizer error type
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Application configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schema catalogue or sensitivity layer errors
    #[error("Schema error: {0}")]
    Schema(ConfigIssue),

    /// Document root is not the expected document type
    #[error("{document}: unrecognized document root '{found}' (expected '{expected}')")]
    UnrecognizedRoot {
        document: String,
        found: String,
        expected: String,
    },

    /// Malformed XML or a rewrite target that no longer exists
    #[error("{document}: XML error: {message}")]
    Xml { document: String, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl AnonymizerError {
    /// Builds an [`AnonymizerError::Xml`] for the named document
    pub fn xml(document: impl Into<String>, message: impl fmt::Display) -> Self {
        AnonymizerError::Xml {
            document: document.into(),
            message: message.to_string(),
        }
    }

    /// True for errors that invalidate the whole run rather than a single document
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AnonymizerError::Configuration(_) | AnonymizerError::Schema(_)
        )
    }
}

/// Which configuration layer an issue was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    Catalogue,
    Default,
    Custom,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLayer::Catalogue => write!(f, "catalogue"),
            ConfigLayer::Default => write!(f, "default layer"),
            ConfigLayer::Custom => write!(f, "custom layer"),
        }
    }
}

/// Whether an item was expected but absent, or present but unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    Unknown,
}

/// The kind of configuration item an issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Type,
    Attribute,
    Element,
    SubElement,
    TextContent,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::Type => "type",
            ItemKind::Attribute => "attribute",
            ItemKind::Element => "element",
            ItemKind::SubElement => "sub-element",
            ItemKind::TextContent => "text_content",
        };
        f.write_str(s)
    }
}

/// A single load-time problem in the catalogue or a sensitivity layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub layer: ConfigLayer,
    pub kind: IssueKind,
    pub item: ItemKind,
    /// Type that owns the item; for type-level issues this is the type itself
    pub type_name: String,
    pub name: String,
}

impl ConfigIssue {
    pub fn missing(
        layer: ConfigLayer,
        item: ItemKind,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            kind: IssueKind::Missing,
            item,
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn unknown(
        layer: ConfigLayer,
        item: ItemKind,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            kind: IssueKind::Unknown,
            item,
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IssueKind::Missing => "missing",
            IssueKind::Unknown => "unknown",
        };
        if self.item == ItemKind::Type {
            write!(f, "{}: {} type '{}'", self.layer, kind, self.name)
        } else {
            write!(
                f,
                "{}: {} {} '{}' in type '{}'",
                self.layer, kind, self.item, self.name, self.type_name
            )
        }
    }
}

impl From<ConfigIssue> for AnonymizerError {
    fn from(issue: ConfigIssue) -> Self {
        AnonymizerError::Schema(issue)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizerError {
    fn from(err: std::io::Error) -> Self {
        AnonymizerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymizerError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from quick-xml errors without document context
impl From<quick_xml::Error> for AnonymizerError {
    fn from(err: quick_xml::Error) -> Self {
        AnonymizerError::xml("<unknown>", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymizer_error_display() {
        let err = AnonymizerError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_config_issue_display_names_layer_type_and_item() {
        let issue = ConfigIssue::unknown(ConfigLayer::Custom, ItemKind::Attribute, "II", "foo");
        assert_eq!(
            issue.to_string(),
            "custom layer: unknown attribute 'foo' in type 'II'"
        );

        let issue = ConfigIssue::missing(ConfigLayer::Default, ItemKind::Type, "TS", "TS");
        assert_eq!(issue.to_string(), "default layer: missing type 'TS'");
    }

    #[test]
    fn test_config_issue_conversion() {
        let issue = ConfigIssue::missing(ConfigLayer::Default, ItemKind::Element, "AD", "city");
        let err: AnonymizerError = issue.into();
        assert!(matches!(err, AnonymizerError::Schema(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unrecognized_root_names_document() {
        let err = AnonymizerError::UnrecognizedRoot {
            document: "case-1.xml".to_string(),
            found: "Bundle".to_string(),
            expected: "ClinicalDocument".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("case-1.xml"));
        assert!(msg.contains("Bundle"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AnonymizerError = io_err.into();
        assert!(matches!(err, AnonymizerError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AnonymizerError = json_err.into();
        assert!(matches!(err, AnonymizerError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AnonymizerError = toml_err.into();
        assert!(matches!(err, AnonymizerError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_anonymizer_error_implements_std_error() {
        let err = AnonymizerError::Other("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
