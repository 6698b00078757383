//! Applies replacement values back into a parsed document

use super::tree::{Node, NodePath, XmlDocument};
use crate::domain::{AnonymizerError, Result};

/// What part of the node at a path an edit replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Direct text content of the element, see `XmlElement::set_text`
    Text,
    /// Named attribute of the element
    Attribute(String),
    /// The text node itself; used for narrative fragments
    TextNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub path: NodePath,
    pub target: EditTarget,
    pub value: String,
}

/// Applies every edit or fails without reporting which were applied.
///
/// Callers must discard the document on error.
pub fn apply(document: &mut XmlDocument, edits: &[Edit]) -> Result<()> {
    for edit in edits {
        apply_one(document, edit)?;
    }
    Ok(())
}

fn apply_one(document: &mut XmlDocument, edit: &Edit) -> Result<()> {
    let name = document.name.clone();
    let missing = |what: &str| {
        AnonymizerError::xml(
            name.clone(),
            format!("rewrite target {what} at {} no longer exists", edit.path),
        )
    };

    match &edit.target {
        EditTarget::Text => {
            let element = document
                .root
                .element_at_mut(&edit.path)
                .ok_or_else(|| missing("element"))?;
            element.set_text(edit.value.clone());
        }
        EditTarget::Attribute(attribute) => {
            let element = document
                .root
                .element_at_mut(&edit.path)
                .ok_or_else(|| missing("element"))?;
            if !element.set_attribute(attribute, edit.value.clone()) {
                return Err(missing(&format!("attribute '{attribute}'")));
            }
        }
        EditTarget::TextNode => match document.root.node_at_mut(&edit.path) {
            Some(Node::Text(text)) | Some(Node::CData(text)) => *text = edit.value.clone(),
            _ => return Err(missing("text node")),
        },
    }
    Ok(())
}
