//! Structural schema catalogue.
//!
//! The catalogue describes, for every node type of the source document standard, which
//! attributes it carries (and their value kinds) and which child elements it may contain.
//! A child whose type is polymorphic is modelled as a [`ChildTypes::Choice`] and resolved
//! once, at walk time, from the child's `xsi:type` discriminator or the configured default.
//!
//! The built-in catalogue covers the CDA R2 types used by electronic initial case reports
//! and is embedded in the binary:
//!
//! ```rust
//! use eicr_anonymizer::schema::SchemaCatalogue;
//!
//! # fn example() -> eicr_anonymizer::domain::Result<()> {
//! let catalogue = SchemaCatalogue::builtin()?;
//! let observation = catalogue.get("Observation").unwrap();
//! let value = observation.elements.get("value").unwrap();
//! assert_eq!(value.resolve(Some("xsi:PQ")), "PQ");
//! assert_eq!(value.resolve(None), "ANY");
//! # Ok(())
//! # }
//! ```

pub mod catalogue;

pub use catalogue::{AttributeKind, ChildTypes, SchemaCatalogue, TypeDef};
