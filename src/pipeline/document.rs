//! Single-document anonymization: parse, walk, anonymize, rewrite, serialize

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::anonymization::{
    AnonymizedDocument, AnonymizedOccurrence, Anonymizer, Replacement,
};
use crate::discovery::{DocumentWalker, OccurrenceTarget};
use crate::document::{rewrite, Edit, EditTarget, XmlDocument};
use crate::domain::{AnonymizerError, Result};
use crate::schema::SchemaCatalogue;
use crate::sensitivity::SensitivityConfig;
use crate::{log_document_complete, log_document_start};

/// Anonymizes whole documents against one catalogue and sensitivity configuration.
///
/// Holds no mutable state, so one instance can be shared by every worker. The
/// [`Anonymizer`] is passed per call; that is where consistency and determinism live.
#[derive(Debug, Clone)]
pub struct DocumentAnonymizer {
    catalogue: Arc<SchemaCatalogue>,
    sensitivity: Arc<SensitivityConfig>,
}

impl DocumentAnonymizer {
    pub fn new(catalogue: Arc<SchemaCatalogue>, sensitivity: Arc<SensitivityConfig>) -> Self {
        Self {
            catalogue,
            sensitivity,
        }
    }

    /// Loads the built-in catalogue and default sensitivity layer
    pub fn builtin() -> Result<Self> {
        let catalogue = SchemaCatalogue::builtin()?;
        let sensitivity = SensitivityConfig::builtin(&catalogue)?;
        Ok(Self::new(Arc::new(catalogue), Arc::new(sensitivity)))
    }

    pub fn catalogue(&self) -> &SchemaCatalogue {
        &self.catalogue
    }

    /// Produces the anonymized serialization of `xml`.
    ///
    /// Every occurrence is anonymized exactly once, in document order. Any failure
    /// returns an error and no output bytes.
    pub fn anonymize_document(
        &self,
        name: &str,
        xml: &str,
        anonymizer: &mut Anonymizer,
    ) -> Result<AnonymizedDocument> {
        let start = Instant::now();
        log_document_start!(name, xml.len());

        let mut document = XmlDocument::parse(name, xml)?;
        let discovery = DocumentWalker::new(&self.catalogue, &self.sensitivity).walk(&document)?;
        tracing::debug!(
            document = %name,
            occurrences = discovery.occurrences.len(),
            safe_tokens = discovery.safe_tokens.len(),
            "Discovery complete"
        );

        anonymizer.add_safe_tokens(&discovery.safe_tokens);

        let mut edits = Vec::with_capacity(discovery.occurrences.len());
        let mut occurrences = Vec::with_capacity(discovery.occurrences.len());
        for occurrence in discovery.occurrences {
            let replacement = anonymizer.anonymize(&occurrence);
            edits.extend(edits_for(name, &occurrence.target, &occurrence.location, &replacement)?);
            occurrences.push(AnonymizedOccurrence {
                occurrence,
                replacement,
            });
        }

        rewrite::apply(&mut document, &edits)?;
        let xml = document.to_xml_bytes()?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        log_document_complete!(name, occurrences.len(), processing_time_ms);

        Ok(AnonymizedDocument {
            name: name.to_string(),
            xml,
            occurrences,
            safe_tokens: discovery.safe_tokens.len(),
            processing_time_ms,
            timestamp: Utc::now(),
        })
    }
}

fn edits_for(
    document: &str,
    target: &OccurrenceTarget,
    location: &crate::document::NodePath,
    replacement: &Replacement,
) -> Result<Vec<Edit>> {
    let edits = match (target, replacement) {
        (OccurrenceTarget::Text, Replacement::Value(value)) => vec![Edit {
            path: location.clone(),
            target: EditTarget::Text,
            value: value.clone(),
        }],
        (OccurrenceTarget::Attribute(name), Replacement::Value(value)) => vec![Edit {
            path: location.clone(),
            target: EditTarget::Attribute(name.clone()),
            value: value.clone(),
        }],
        (OccurrenceTarget::Narrative(_), Replacement::Fragments(fragments)) => fragments
            .iter()
            .map(|fragment| Edit {
                path: fragment.path.clone(),
                target: EditTarget::TextNode,
                value: fragment.value.clone(),
            })
            .collect(),
        _ => {
            return Err(AnonymizerError::xml(
                document,
                format!("replacement shape does not match the occurrence at {location}"),
            ))
        }
    };
    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::AnonymizerSettings;
    use test_case::test_case;

    const CASE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ClinicalDocument xmlns="urn:hl7-org:v3">
  <id root="2.16.840.1.113883.19.5" extension="MRN-48213"/>
  <effectiveTime value="20201107094421-0500"/>
  <recordTarget>
    <patientRole>
      <addr use="H">
        <streetAddressLine>123 Main St</streetAddressLine>
        <city>Springfield</city>
        <state>MA</state>
        <postalCode>01103</postalCode>
      </addr>
      <telecom use="HP" value="tel:+1-555-555-1234"/>
      <patient>
        <name use="L"><given>Jane</given><family>Doe</family></name>
      </patient>
    </patientRole>
  </recordTarget>
</ClinicalDocument>
"#;

    fn deterministic() -> Anonymizer {
        Anonymizer::new(AnonymizerSettings {
            deterministic: true,
            seed: Some(7),
        })
    }

    #[test]
    fn test_originals_do_not_survive() {
        let pipeline = DocumentAnonymizer::builtin().unwrap();
        let mut anonymizer = deterministic();
        let result = pipeline
            .anonymize_document("case.xml", CASE, &mut anonymizer)
            .unwrap();
        let output = String::from_utf8(result.xml.clone()).unwrap();

        assert!(result.total_occurrences() > 0);
        for original in ["MRN-48213", "Springfield", "01103", "555-1234", ">Jane<", ">Doe<", "20201107094421"] {
            assert!(!output.contains(original), "{original} survived: {output}");
        }
        assert!(output.starts_with("<?xml"));
        assert!(output.contains("2.16.840.1.113883.19.5"));
    }

    #[test]
    fn test_same_seed_same_document() {
        let pipeline = DocumentAnonymizer::builtin().unwrap();
        let first = pipeline
            .anonymize_document("case.xml", CASE, &mut deterministic())
            .unwrap();
        let second = pipeline
            .anonymize_document("case.xml", CASE, &mut deterministic())
            .unwrap();
        assert_eq!(first.xml, second.xml);
    }

    #[test]
    fn test_malformed_document_yields_no_output() {
        let pipeline = DocumentAnonymizer::builtin().unwrap();
        let err = pipeline
            .anonymize_document("broken.xml", "<ClinicalDocument><id>", &mut deterministic())
            .unwrap_err();
        assert!(err.to_string().contains("broken.xml"));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let pipeline = DocumentAnonymizer::builtin().unwrap();
        let err = pipeline
            .anonymize_document("note.xml", "<Bundle/>", &mut deterministic())
            .unwrap_err();
        assert!(matches!(err, AnonymizerError::UnrecognizedRoot { .. }));
    }

    #[test]
    fn test_mismatched_replacement_shape() {
        let err = edits_for(
            "case.xml",
            &OccurrenceTarget::Text,
            &crate::document::NodePath::root(),
            &Replacement::Fragments(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, AnonymizerError::Xml { .. }));
    }

    #[test_case("<name><!-- legal -->Marguerite Oyelaran</name>"; "text after comment")]
    #[test_case("<name><given>Marguerite</given> Oyelaran</name>"; "mixed content tail")]
    #[test_case("<name>Marguerite<?pi x?> <given>Ann</given> Oyelaran</name>"; "split runs")]
    fn test_names_around_other_nodes_are_replaced(name: &str) {
        let xml = format!(
            "<ClinicalDocument xmlns=\"urn:hl7-org:v3\"><recordTarget><patientRole><patient>{name}</patient></patientRole></recordTarget></ClinicalDocument>"
        );
        let pipeline = DocumentAnonymizer::builtin().unwrap();
        let result = pipeline
            .anonymize_document("case.xml", &xml, &mut deterministic())
            .unwrap();
        let output = String::from_utf8(result.xml).unwrap();

        assert!(!output.contains("Marguerite"), "{output}");
        assert!(!output.contains("Oyelaran"), "{output}");
        assert!(output.contains("<name>"), "{output}");
    }
}
