//! Identifier strategy and character-class scrambles

use rand::Rng;

use crate::anonymization::cache::{CacheTable, LikeCharKind};
use crate::anonymization::format::{match_whitespace, match_whitespace_and_case};
use crate::anonymization::Anonymizer;

/// Placeholder for the leading characters of an identifier
pub const MASK_CHAR: char = 'X';

/// Leading alphanumerics replaced by [`MASK_CHAR`]
pub const MASK_COUNT: usize = 2;

impl Anonymizer {
    /// Scramble an opaque identifier.
    ///
    /// The first two alphanumerics are masked when there are more than two; every other
    /// digit or letter is replaced within its class and case, separators are kept. A
    /// uniformly lower-case identifier gets a lower-case mask.
    pub fn anonymize_identifier(&mut self, value: &str) -> String {
        let core = value.trim();
        if core.is_empty() {
            return value.to_string();
        }
        let replaced = self.cached(CacheTable::Identifier, core, true, |this| {
            this.masked_scramble(core)
        });
        match_whitespace_and_case(value, &replaced)
    }

    /// Same-class scramble of a value, cached per kind
    pub fn replace_with_like_chars(&mut self, value: &str, kind: LikeCharKind) -> String {
        let core = value.trim();
        if core.is_empty() {
            return value.to_string();
        }
        let replaced = self.cached(CacheTable::LikeChars(kind), core, true, |this| {
            this.scramble(core)
        });
        match_whitespace(value, &replaced)
    }

    pub(crate) fn scramble(&mut self, value: &str) -> String {
        value.chars().map(|c| self.like_char(c)).collect()
    }

    fn masked_scramble(&mut self, value: &str) -> String {
        let alphanumerics = value.chars().filter(|c| c.is_alphanumeric()).count();
        let mut masked = 0;
        value
            .chars()
            .map(|c| {
                if c.is_alphanumeric() && alphanumerics > MASK_COUNT && masked < MASK_COUNT {
                    masked += 1;
                    MASK_CHAR
                } else {
                    self.like_char(c)
                }
            })
            .collect()
    }

    fn like_char(&mut self, c: char) -> char {
        let rng = self.rng();
        if c.is_numeric() {
            char::from(b'0' + rng.gen_range(0..10u8))
        } else if c.is_uppercase() {
            char::from(b'A' + rng.gen_range(0..26u8))
        } else if c.is_lowercase() {
            char::from(b'a' + rng.gen_range(0..26u8))
        } else {
            c
        }
    }
}
