//! XML document model, serializer and rewriter.
//!
//! Documents are parsed into an owned tree that keeps every node in order (including
//! comments and inter-element whitespace) so that writing a document back changes only
//! the values that were explicitly rewritten.
//!
//! # Examples
//!
//! ```rust
//! use eicr_anonymizer::document::{rewrite, Edit, EditTarget, NodePath, XmlDocument};
//!
//! # fn example() -> eicr_anonymizer::domain::Result<()> {
//! let mut doc = XmlDocument::parse(
//!     "case.xml",
//!     r#"<ClinicalDocument><id extension="A-12"/></ClinicalDocument>"#,
//! )?;
//! rewrite::apply(
//!     &mut doc,
//!     &[Edit {
//!         path: NodePath::root().child(0),
//!         target: EditTarget::Attribute("extension".to_string()),
//!         value: "X-48".to_string(),
//!     }],
//! )?;
//! assert!(doc.to_xml_string()?.contains("X-48"));
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod rewrite;
pub mod tree;
pub mod writer;

pub use rewrite::{Edit, EditTarget};
pub use tree::{Node, NodePath, XmlDocument, XmlElement};
