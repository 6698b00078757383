//! Replacement category registry
//!
//! Maps the structural classification of a sensitive node (its type, element name and
//! whether the value is text or an attribute) onto exactly one anonymization category.

use std::fmt;

use serde::Serialize;

use crate::schema::AttributeKind;

/// Anonymization category of a sensitive occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Timestamp,
    Identifier,
    EntityName,
    PostalAddress,
    StreetAddressLine,
    Telecom,
    /// An address or name part, keyed by its element name
    CodedPart { role: String },
    FreeText,
    /// Rich text block, scrubbed fragment by fragment
    Narrative,
    Generic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Timestamp => f.write_str("timestamp"),
            Category::Identifier => f.write_str("identifier"),
            Category::EntityName => f.write_str("entity_name"),
            Category::PostalAddress => f.write_str("postal_address"),
            Category::StreetAddressLine => f.write_str("street_address_line"),
            Category::Telecom => f.write_str("telecom"),
            Category::CodedPart { role } => write!(f, "coded_part:{role}"),
            Category::FreeText => f.write_str("free_text"),
            Category::Narrative => f.write_str("narrative"),
            Category::Generic => f.write_str("generic"),
        }
    }
}

const NAME_TYPES: &[&str] = &["EN", "PN", "ON", "TN"];
const TEXT_TYPES: &[&str] = &["ED", "ST", "SC", "ANY"];

/// Category for the text content of a node
pub fn classify_text(type_name: &str, element_name: &str, narrative_type: &str) -> Category {
    match type_name {
        t if t == narrative_type => Category::Narrative,
        "AD" => Category::PostalAddress,
        "ADXP" if element_name == "streetAddressLine" => Category::StreetAddressLine,
        "ADXP" | "ENXP" => Category::CodedPart {
            role: element_name.to_string(),
        },
        t if NAME_TYPES.contains(&t) => Category::EntityName,
        t if TEXT_TYPES.contains(&t) => Category::FreeText,
        _ => Category::Generic,
    }
}

/// Category for an attribute value
pub fn classify_attribute(type_name: &str, attribute: &str, kind: AttributeKind) -> Category {
    match (type_name, attribute, kind) {
        (_, _, AttributeKind::Timestamp) => Category::Timestamp,
        (_, _, AttributeKind::Uri) => Category::Telecom,
        ("II", "extension", _) | (_, _, AttributeKind::Identifier) => Category::Identifier,
        _ => Category::Generic,
    }
}
