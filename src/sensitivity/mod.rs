//! Layered sensitivity configuration.
//!
//! A complete *default* layer gives a rule for every type, attribute and element of the
//! [`SchemaCatalogue`](crate::schema::SchemaCatalogue); an optional *custom* layer lists
//! only overrides. Both are validated at load time and the custom layer is overlaid onto
//! the default one before any document is walked.
//!
//! ```toml
//! [II]
//! attributes = { extension = "SAFE" }
//!
//! [Section.elements]
//! title = { text_content = "SAFE" }
//! ```

pub mod layers;
pub mod rules;

pub use layers::{SensitivityConfig, SensitivityLayer, SensitivitySummary};
pub use rules::{ElementRule, NestedRule, Sensitivity, TypeRules};
