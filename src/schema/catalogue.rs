//! Catalogue model and TOML loader

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{AnonymizerError, Result};

const BUILTIN_CATALOGUE: &str = include_str!("../../data/cda_catalogue.toml");

/// Declared value kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Code,
    Identifier,
    Timestamp,
    Boolean,
    Number,
    Uri,
}

impl AttributeKind {
    /// Kinds whose safe values are human-readable vocabulary worth allow-listing
    pub fn is_textual(self) -> bool {
        matches!(self, AttributeKind::String | AttributeKind::Code)
    }
}

/// Possible types of a child element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTypes {
    Single(String),
    Choice { options: Vec<String>, default: String },
}

impl ChildTypes {
    /// Resolves the concrete type for a child carrying an optional `xsi:type` value.
    ///
    /// The namespace prefix of the discriminator is ignored. A discriminator that does not
    /// name one of the options falls back to the default.
    pub fn resolve(&self, xsi_type: Option<&str>) -> &str {
        match self {
            ChildTypes::Single(name) => name,
            ChildTypes::Choice { options, default } => {
                let wanted = xsi_type.map(|t| t.rsplit(':').next().unwrap_or(t).trim());
                wanted
                    .and_then(|w| options.iter().find(|o| o.as_str() == w))
                    .unwrap_or(default)
            }
        }
    }

    /// Every type this child may take
    pub fn options(&self) -> &[String] {
        match self {
            ChildTypes::Single(name) => std::slice::from_ref(name),
            ChildTypes::Choice { options, .. } => options,
        }
    }
}

/// One node type of the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub attributes: BTreeMap<String, AttributeKind>,
    pub elements: BTreeMap<String, ChildTypes>,
}

#[derive(Debug, Deserialize)]
struct RawCatalogue {
    root: String,
    narrative: String,
    #[serde(default)]
    types: BTreeMap<String, RawType>,
}

#[derive(Debug, Deserialize)]
struct RawType {
    #[serde(default)]
    attributes: BTreeMap<String, AttributeKind>,
    #[serde(default)]
    elements: BTreeMap<String, RawChild>,
}

#[derive(Debug, Deserialize)]
struct RawChild {
    types: Vec<String>,
    default: Option<String>,
}

/// The full structural catalogue
#[derive(Debug, Clone)]
pub struct SchemaCatalogue {
    root: String,
    narrative: String,
    types: BTreeMap<String, TypeDef>,
}

impl SchemaCatalogue {
    /// Loads the catalogue bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOGUE)
    }

    /// Loads a catalogue from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to read schema catalogue {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a catalogue from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawCatalogue = toml::from_str(content)?;

        let mut types = BTreeMap::new();
        for (type_name, raw_type) in raw.types {
            let mut elements = BTreeMap::new();
            for (child, raw_child) in raw_type.elements {
                let choice = child_types(&type_name, &child, raw_child)?;
                elements.insert(child, choice);
            }
            types.insert(
                type_name.clone(),
                TypeDef {
                    name: type_name,
                    attributes: raw_type.attributes,
                    elements,
                },
            );
        }

        let catalogue = Self {
            root: raw.root,
            narrative: raw.narrative,
            types,
        };
        catalogue.check_references()?;
        Ok(catalogue)
    }

    /// The only type accepted as a document root
    pub fn root_type(&self) -> &str {
        &self.root
    }

    /// The rich-text sink type whose content is always treated as sensitive
    pub fn narrative_type(&self) -> &str {
        &self.narrative
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Types in name order
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn check_references(&self) -> Result<()> {
        for required in [&self.root, &self.narrative] {
            if !self.types.contains_key(required) {
                return Err(AnonymizerError::Configuration(format!(
                    "catalogue: type '{required}' is referenced but not defined"
                )));
            }
        }
        for def in self.types.values() {
            for (child, choice) in &def.elements {
                if let Some(missing) = choice.options().iter().find(|t| !self.contains(t)) {
                    return Err(AnonymizerError::Configuration(format!(
                        "catalogue: element '{child}' of type '{}' refers to unknown type '{missing}'",
                        def.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn child_types(owner: &str, child: &str, raw: RawChild) -> Result<ChildTypes> {
    let invalid = |why: &str| {
        AnonymizerError::Configuration(format!(
            "catalogue: element '{child}' of type '{owner}' {why}"
        ))
    };

    match (raw.types.len(), raw.default) {
        (0, _) => Err(invalid("lists no types")),
        (1, None) => Ok(ChildTypes::Single(raw.types.into_iter().next().unwrap_or_default())),
        (_, None) => Err(invalid("has several types but no default")),
        (_, Some(default)) => {
            if !raw.types.contains(&default) {
                return Err(invalid("has a default that is not one of its types"));
            }
            Ok(ChildTypes::Choice {
                options: raw.types,
                default,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
root = "Doc"
narrative = "Narrative"

[types.Doc]
attributes = { ID = "string" }

[types.Doc.elements]
when = { types = ["TS"] }
value = { types = ["TS", "ST"], default = "ST" }
text = { types = ["Narrative"] }

[types.TS]
attributes = { value = "timestamp" }

[types.ST]
attributes = {}

[types.Narrative]
"#;

    #[test]
    fn test_builtin_catalogue_loads() {
        let catalogue = SchemaCatalogue::builtin().unwrap();
        assert_eq!(catalogue.root_type(), "ClinicalDocument");
        assert_eq!(catalogue.narrative_type(), "StrucDoc.Text");
        assert!(catalogue.contains("II"));
        assert_eq!(
            catalogue.get("TS").unwrap().attributes.get("value"),
            Some(&AttributeKind::Timestamp)
        );
    }

    #[test]
    fn test_small_catalogue_parses() {
        let catalogue = SchemaCatalogue::from_toml_str(SMALL).unwrap();
        assert_eq!(catalogue.len(), 4);
        let doc = catalogue.get("Doc").unwrap();
        assert_eq!(doc.elements["when"], ChildTypes::Single("TS".to_string()));
        assert_eq!(doc.elements["value"].options().len(), 2);
    }

    #[test]
    fn test_choice_resolution_strips_prefix_and_falls_back() {
        let choice = ChildTypes::Choice {
            options: vec!["TS".to_string(), "ST".to_string()],
            default: "ST".to_string(),
        };
        assert_eq!(choice.resolve(Some("xsi:TS")), "TS");
        assert_eq!(choice.resolve(Some("TS")), "TS");
        assert_eq!(choice.resolve(Some("CO")), "ST");
        assert_eq!(choice.resolve(None), "ST");
    }

    #[test]
    fn test_single_ignores_discriminator() {
        let single = ChildTypes::Single("TS".to_string());
        assert_eq!(single.resolve(Some("ST")), "TS");
    }

    #[test]
    fn test_unknown_child_type_is_rejected() {
        let broken = SMALL.replace(r#"when = { types = ["TS"] }"#, r#"when = { types = ["IVL_TS"] }"#);
        let err = SchemaCatalogue::from_toml_str(&broken).unwrap_err();
        assert!(err.to_string().contains("IVL_TS"));
    }

    #[test]
    fn test_choice_without_default_is_rejected() {
        let broken = SMALL.replace(r#", default = "ST""#, "");
        let err = SchemaCatalogue::from_toml_str(&broken).unwrap_err();
        assert!(err.to_string().contains("no default"));
    }

    #[test]
    fn test_missing_root_type_is_rejected() {
        let broken = SMALL.replace(r#"root = "Doc""#, r#"root = "ClinicalDocument""#);
        assert!(SchemaCatalogue::from_toml_str(&broken).is_err());
    }
}
