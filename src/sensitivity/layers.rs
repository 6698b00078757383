//! Layer loading, validation and overlay

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::rules::{ElementRule, NestedRule, Sensitivity, TypeRules};
use crate::domain::{AnonymizerError, ConfigIssue, ConfigLayer, ItemKind, Result};
use crate::schema::SchemaCatalogue;

const BUILTIN_DEFAULT_LAYER: &str = include_str!("../../data/default_sensitivity.toml");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayerEntry {
    text_content: Option<Sensitivity>,
    #[serde(default)]
    attributes: BTreeMap<String, Sensitivity>,
    #[serde(default)]
    elements: BTreeMap<String, ElementRule>,
}

/// One parsed sensitivity layer, not yet validated
#[derive(Debug, Clone, Default)]
pub struct SensitivityLayer {
    entries: BTreeMap<String, LayerEntry>,
}

impl SensitivityLayer {
    /// The complete default layer bundled with the crate
    pub fn builtin_default() -> Result<Self> {
        Self::from_toml_str(BUILTIN_DEFAULT_LAYER)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let entries: BTreeMap<String, LayerEntry> = toml::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to read sensitivity layer {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the layer against the catalogue.
    ///
    /// Both layers may only name known types, attributes and elements. The default layer
    /// must in addition list every type, attribute and element of the catalogue, and give
    /// every type a text rule.
    pub fn issues(&self, catalogue: &SchemaCatalogue, layer: ConfigLayer) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let complete = layer == ConfigLayer::Default;

        for (type_name, entry) in &self.entries {
            let Some(def) = catalogue.get(type_name) else {
                issues.push(ConfigIssue::unknown(layer, ItemKind::Type, type_name, type_name));
                continue;
            };

            if complete && entry.text_content.is_none() {
                issues.push(ConfigIssue::missing(
                    layer,
                    ItemKind::TextContent,
                    type_name,
                    "text_content",
                ));
            }

            for name in entry.attributes.keys() {
                if !def.attributes.contains_key(name) {
                    issues.push(ConfigIssue::unknown(layer, ItemKind::Attribute, type_name, name));
                }
            }
            for (name, rule) in &entry.elements {
                let Some(child) = def.elements.get(name) else {
                    issues.push(ConfigIssue::unknown(layer, ItemKind::Element, type_name, name));
                    continue;
                };
                if let Some(nested) = rule.overrides() {
                    nested_issues(catalogue, layer, type_name, name, child.options(), nested, &mut issues);
                }
            }

            if complete {
                for name in def.attributes.keys() {
                    if !entry.attributes.contains_key(name) {
                        issues.push(ConfigIssue::missing(layer, ItemKind::Attribute, type_name, name));
                    }
                }
                for name in def.elements.keys() {
                    if !entry.elements.contains_key(name) {
                        issues.push(ConfigIssue::missing(layer, ItemKind::Element, type_name, name));
                    }
                }
            }
        }

        if complete {
            for def in catalogue.types() {
                if !self.entries.contains_key(&def.name) {
                    issues.push(ConfigIssue::missing(layer, ItemKind::Type, &def.name, &def.name));
                }
            }
        }

        issues
    }
}

fn nested_issues(
    catalogue: &SchemaCatalogue,
    layer: ConfigLayer,
    owner: &str,
    child: &str,
    options: &[String],
    nested: &NestedRule,
    issues: &mut Vec<ConfigIssue>,
) {
    let mut attributes = BTreeSet::new();
    let mut elements = BTreeSet::new();
    for def in options.iter().filter_map(|t| catalogue.get(t)) {
        attributes.extend(def.attributes.keys().map(String::as_str));
        elements.extend(def.elements.keys().map(String::as_str));
    }

    for name in nested.attributes.keys() {
        if !attributes.contains(name.as_str()) {
            let path = format!("{child}/@{name}");
            issues.push(ConfigIssue::unknown(layer, ItemKind::Attribute, owner, path));
        }
    }
    for name in nested.elements.keys() {
        if !elements.contains(name.as_str()) {
            let path = format!("{child}/{name}");
            issues.push(ConfigIssue::unknown(layer, ItemKind::SubElement, owner, path));
        }
    }
}

/// Counts reported by `validate-config`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensitivitySummary {
    pub types: usize,
    pub safe_text_types: usize,
    pub attributes: usize,
    pub safe_attributes: usize,
    pub elements: usize,
    pub safe_elements: usize,
    pub nested_rules: usize,
}

/// Effective sensitivity configuration: the custom layer overlaid onto the default layer
#[derive(Debug, Clone)]
pub struct SensitivityConfig {
    types: BTreeMap<String, TypeRules>,
}

impl SensitivityConfig {
    /// Builds the configuration from the bundled default layer and no overrides
    pub fn builtin(catalogue: &SchemaCatalogue) -> Result<Self> {
        Self::from_layers(catalogue, SensitivityLayer::builtin_default()?, None)
    }

    /// Validates both layers and overlays the custom one onto the default one.
    ///
    /// The first issue found aborts loading; use [`SensitivityLayer::issues`] to list all.
    pub fn from_layers(
        catalogue: &SchemaCatalogue,
        default: SensitivityLayer,
        custom: Option<SensitivityLayer>,
    ) -> Result<Self> {
        if let Some(issue) = default.issues(catalogue, ConfigLayer::Default).into_iter().next() {
            return Err(issue.into());
        }
        if let Some(custom) = &custom {
            if let Some(issue) = custom.issues(catalogue, ConfigLayer::Custom).into_iter().next() {
                return Err(issue.into());
            }
        }

        let mut types = BTreeMap::new();
        for (name, entry) in default.entries {
            types.insert(
                name,
                TypeRules {
                    text_content: entry.text_content.unwrap_or(Sensitivity::Sensitive),
                    attributes: entry.attributes,
                    elements: entry.elements,
                },
            );
        }

        if let Some(custom) = custom {
            info!(types = custom.len(), "Applying custom sensitivity layer");
            for (name, entry) in custom.entries {
                let Some(rules) = types.get_mut(&name) else {
                    continue;
                };
                if let Some(text) = entry.text_content {
                    rules.text_content = text;
                }
                rules.attributes.extend(entry.attributes);
                rules.elements.extend(entry.elements);
                debug!(type_name = %name, "Overlaid custom rules");
            }
        }

        Ok(Self { types })
    }

    pub fn rules(&self, type_name: &str) -> Option<&TypeRules> {
        self.types.get(type_name)
    }

    pub fn summary(&self) -> SensitivitySummary {
        let mut summary = SensitivitySummary {
            types: self.types.len(),
            ..Default::default()
        };
        for rules in self.types.values() {
            if rules.text_content.is_safe() {
                summary.safe_text_types += 1;
            }
            summary.attributes += rules.attributes.len();
            summary.safe_attributes += rules.attributes.values().filter(|s| s.is_safe()).count();
            summary.elements += rules.elements.len();
            summary.safe_elements += rules.elements.values().filter(|r| r.is_safe()).count();
            summary.nested_rules += rules
                .elements
                .values()
                .filter(|r| r.overrides().is_some())
                .count();
        }
        summary
    }
}
