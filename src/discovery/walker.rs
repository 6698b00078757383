//! Schema-driven document walker

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::occurrence::{OccurrenceTarget, SensitiveOccurrence, TextFragment};
use super::registry::{classify_attribute, classify_text, Category};
use super::safe_tokens::SafeTokens;
use crate::document::tree::local_name;
use crate::document::{Node, NodePath, XmlDocument, XmlElement};
use crate::domain::{AnonymizerError, Result};
use crate::schema::SchemaCatalogue;
use crate::sensitivity::{ElementRule, NestedRule, SensitivityConfig};

/// Everything a walk found in one document
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub occurrences: Vec<SensitiveOccurrence>,
    pub safe_tokens: SafeTokens,
}

/// Walks a document using the catalogue and the effective sensitivity rules
#[derive(Debug, Clone, Copy)]
pub struct DocumentWalker<'a> {
    catalogue: &'a SchemaCatalogue,
    sensitivity: &'a SensitivityConfig,
}

struct Visit<'v> {
    element: &'v XmlElement,
    type_name: &'v str,
    path: NodePath,
    ambient_safe: bool,
    overrides: Option<&'v NestedRule>,
    type_path: Vec<String>,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(catalogue: &'a SchemaCatalogue, sensitivity: &'a SensitivityConfig) -> Self {
        Self {
            catalogue,
            sensitivity,
        }
    }

    /// Collects sensitive occurrences and safe tokens for a whole document.
    ///
    /// Fails only when the root element is not the catalogue's document type.
    pub fn walk(&self, document: &XmlDocument) -> Result<Discovery> {
        let expected = self.catalogue.root_type();
        if document.root.local_name() != expected {
            return Err(AnonymizerError::UnrecognizedRoot {
                document: document.name.clone(),
                found: document.root.local_name().to_string(),
                expected: expected.to_string(),
            });
        }

        let mut discovery = Discovery::default();
        self.visit(
            Visit {
                element: &document.root,
                type_name: expected,
                path: NodePath::root(),
                ambient_safe: false,
                overrides: None,
                type_path: vec![expected.to_string()],
            },
            &mut discovery,
        );

        debug!(
            document = %document.name,
            occurrences = discovery.occurrences.len(),
            safe_tokens = discovery.safe_tokens.len(),
            "Walked document"
        );
        Ok(discovery)
    }

    fn visit(&self, visit: Visit<'_>, out: &mut Discovery) {
        if visit.type_name == self.catalogue.narrative_type() {
            self.visit_narrative(&visit, out);
            return;
        }

        let (Some(def), Some(rules)) = (
            self.catalogue.get(visit.type_name),
            self.sensitivity.rules(visit.type_name),
        ) else {
            trace!(type_name = visit.type_name, "No rules for type, skipping subtree");
            return;
        };
        let element = visit.element;

        if let Some(text) = element.text().filter(|t| !t.trim().is_empty()) {
            if rules.text_rule(visit.overrides).is_safe() {
                out.safe_tokens.insert(&text);
            } else if !visit.ambient_safe {
                out.occurrences.push(self.occurrence(
                    &visit,
                    classify_text(visit.type_name, element.local_name(), self.catalogue.narrative_type()),
                    OccurrenceTarget::Text,
                ));
            }
        }

        for (qualified, value) in &element.attributes {
            if qualified.starts_with("xmlns") || value.trim().is_empty() {
                continue;
            }
            let local = local_name(qualified);
            let Some(kind) = def.attributes.get(local).copied() else {
                continue;
            };
            if rules.attribute_rule(local, visit.overrides).is_safe() {
                if kind.is_textual() {
                    out.safe_tokens.insert(value);
                }
            } else if !visit.ambient_safe {
                out.occurrences.push(self.occurrence(
                    &visit,
                    classify_attribute(visit.type_name, local, kind),
                    OccurrenceTarget::Attribute(qualified.clone()),
                ));
            }
        }

        for (index, child) in element.child_elements() {
            let name = child.local_name();
            let Some(choice) = def.elements.get(name) else {
                trace!(parent = visit.type_name, element = name, "Unknown element skipped");
                continue;
            };
            let child_type = choice.resolve(child.type_discriminator());
            let rule = rules.element_rule(name, visit.overrides);

            let mut type_path = visit.type_path.clone();
            type_path.push(child_type.to_string());
            self.visit(
                Visit {
                    element: child,
                    type_name: child_type,
                    path: visit.path.child(index),
                    ambient_safe: visit.ambient_safe || rule.is_safe(),
                    overrides: child_overrides(rules.elements.get(name), visit.overrides, name),
                    type_path,
                },
                out,
            );
        }
    }

    /// Rich text is always emitted, even below a safe ancestor
    fn visit_narrative(&self, visit: &Visit<'_>, out: &mut Discovery) {
        let mut fragments = Vec::new();
        collect_fragments(visit.element, &visit.path, &mut fragments);
        if fragments.is_empty() {
            return;
        }
        out.occurrences.push(self.occurrence(
            visit,
            classify_text(visit.type_name, visit.element.local_name(), self.catalogue.narrative_type()),
            OccurrenceTarget::Narrative(fragments),
        ));
    }

    fn occurrence(
        &self,
        visit: &Visit<'_>,
        category: Category,
        target: OccurrenceTarget,
    ) -> SensitiveOccurrence {
        let element = visit.element;
        SensitiveOccurrence {
            category,
            location: visit.path.clone(),
            target,
            raw_attributes: element
                .attributes
                .iter()
                .cloned()
                .collect::<BTreeMap<_, _>>(),
            raw_text: element.text(),
            type_name: visit.type_name.to_string(),
            element_name: element.local_name().to_string(),
            type_path: visit.type_path.clone(),
        }
    }
}

/// Overrides a type's rule declares for one of its children.
///
/// A flag coming from the parent's own overrides replaces that rule, nested part included.
fn child_overrides<'r>(
    own: Option<&'r ElementRule>,
    parent_overrides: Option<&NestedRule>,
    name: &str,
) -> Option<&'r NestedRule> {
    if parent_overrides.is_some_and(|o| o.elements.contains_key(name)) {
        return None;
    }
    own.and_then(|rule| rule.overrides())
}

fn collect_fragments(element: &XmlElement, path: &NodePath, out: &mut Vec<TextFragment>) {
    for (index, child) in element.children.iter().enumerate() {
        match child {
            Node::Text(text) | Node::CData(text) if !text.trim().is_empty() => {
                out.push(TextFragment {
                    path: path.child(index),
                    text: text.clone(),
                });
            }
            Node::Element(inner) => collect_fragments(inner, &path.child(index), out),
            _ => {}
        }
    }
}
