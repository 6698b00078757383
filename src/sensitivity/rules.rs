//! Sensitivity rule types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether a piece of content may identify a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sensitivity {
    Safe,
    Sensitive,
}

impl Sensitivity {
    pub fn is_safe(self) -> bool {
        self == Sensitivity::Safe
    }
}

/// Overrides that apply to one specific child element only
///
/// Lets a parent mark parts of a child safe without marking the child itself safe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<Sensitivity>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Sensitivity>,
    #[serde(default)]
    pub elements: BTreeMap<String, Sensitivity>,
}

/// Rule for a child element: a plain flag, or overrides for the child's own content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementRule {
    Flag(Sensitivity),
    Nested(NestedRule),
}

impl ElementRule {
    /// A safe child is walked only to harvest safe tokens
    pub fn is_safe(&self) -> bool {
        matches!(self, ElementRule::Flag(Sensitivity::Safe))
    }

    pub fn overrides(&self) -> Option<&NestedRule> {
        match self {
            ElementRule::Nested(nested) => Some(nested),
            ElementRule::Flag(_) => None,
        }
    }
}

/// Effective rules for one node type after layering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRules {
    pub text_content: Sensitivity,
    pub attributes: BTreeMap<String, Sensitivity>,
    pub elements: BTreeMap<String, ElementRule>,
}

impl TypeRules {
    /// Text rule for a node, honouring overrides declared by its parent
    pub fn text_rule(&self, overrides: Option<&NestedRule>) -> Sensitivity {
        overrides
            .and_then(|o| o.text_content)
            .unwrap_or(self.text_content)
    }

    /// Attribute rule for a node; names with no rule count as sensitive
    pub fn attribute_rule(&self, name: &str, overrides: Option<&NestedRule>) -> Sensitivity {
        overrides
            .and_then(|o| o.attributes.get(name))
            .or_else(|| self.attributes.get(name))
            .copied()
            .unwrap_or(Sensitivity::Sensitive)
    }

    /// Child element rule for a node; names with no rule count as sensitive
    pub fn element_rule(&self, name: &str, overrides: Option<&NestedRule>) -> ElementRule {
        if let Some(flag) = overrides.and_then(|o| o.elements.get(name)) {
            return ElementRule::Flag(*flag);
        }
        self.elements
            .get(name)
            .cloned()
            .unwrap_or(ElementRule::Flag(Sensitivity::Sensitive))
    }
}
