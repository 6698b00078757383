//! Audit logging module
//!
//! Records which values were replaced in each document, identified by category,
//! location and a SHA-256 hash of the original, never the plaintext.

pub mod logger;

pub use logger::{hash_value, AuditLogger};
