//! Allow-list of normalized values known not to identify anyone

use std::collections::HashSet;

/// Case-folds and drops whitespace and ASCII punctuation
///
/// # Examples
///
/// ```
/// use eicr_anonymizer::discovery::normalize;
///
/// assert_eq!(normalize(" Pertussis (disorder). "), "pertussisdisorder");
/// assert_eq!(normalize("(555) 010-2000"), "5550102000");
/// ```
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SafeTokens {
    tokens: HashSet<String>,
}

impl SafeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw value; values that normalize to nothing are ignored
    pub fn insert(&mut self, raw: &str) {
        let token = normalize(raw);
        if !token.is_empty() {
            self.tokens.insert(token);
        }
    }

    /// Membership is always checked on the normalized form
    pub fn contains(&self, raw: &str) -> bool {
        self.tokens.contains(&normalize(raw))
    }

    pub fn extend(&mut self, other: &SafeTokens) {
        self.tokens.extend(other.tokens.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
