//! Telecom strategy: synthetic endpoints per URI scheme

use rand::seq::SliceRandom;
use rand::Rng;

use crate::anonymization::cache::CacheTable;
use crate::anonymization::engine::REDACTION_MARKER;
use crate::anonymization::format::{match_whitespace, match_whitespace_and_case};
use crate::anonymization::Anonymizer;

const EXAMPLE_DOMAIN: &str = "example.com";
const LOCAL_SEPARATORS: &[&str] = &["", "_", "."];
const PATH_EXTENSIONS: &[&str] = &["", ".pdf", ".html", ".xml", ".txt", ".jpg", ".png", ".gif", ".jpeg"];

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Mail,
    Phone,
    Web,
}

impl Anonymizer {
    /// Replace a telecom URI.
    ///
    /// `mailto:` and web addresses get synthetic endpoints under `example.com`, `tel:` and
    /// `fax:` keep their scheme with the number scrambled, fragment references (`#...`)
    /// are kept and anything else is redacted.
    pub fn anonymize_telecom(&mut self, value: &str) -> String {
        let core = value.trim();
        if core.is_empty() || core.starts_with('#') {
            return value.to_string();
        }
        let Some((scheme, prefix, rest)) = split_scheme(core) else {
            return match_whitespace(value, REDACTION_MARKER);
        };

        let replaced = self.cached(CacheTable::Telecom, core, true, |this| match scheme {
            Scheme::Mail => format!("{prefix}{}", this.random_email()),
            Scheme::Phone => format!("{prefix}{}", this.scramble(rest)),
            Scheme::Web => format!("{prefix}{}", this.random_web_address(rest.contains('.'))),
        });
        match_whitespace_and_case(value, &replaced)
    }

    fn random_email(&mut self) -> String {
        let rng = self.rng();
        let length = rng.gen_range(1..=5);
        let mut local = random_string(rng, LOWERCASE, length);
        match rng.gen_range(0..3) {
            0 => {
                local.push_str(LOCAL_SEPARATORS.choose(rng).copied().unwrap_or_default());
                let length = rng.gen_range(1..=3);
                local.push_str(&random_string(rng, DIGITS, length));
            }
            1 => {
                local.push_str(LOCAL_SEPARATORS.choose(rng).copied().unwrap_or_default());
                let length = rng.gen_range(1..=3);
                local.push_str(&random_string(rng, LOWERCASE, length));
            }
            _ => {}
        }
        format!("{local}@{EXAMPLE_DOMAIN}")
    }

    /// Without `dotted` the address has no subdomain, top-level domain or file extension,
    /// so a period-free original such as `http://localhost` stays period-free.
    fn random_web_address(&mut self, dotted: bool) -> String {
        let rng = self.rng();
        let mut host = String::new();
        if dotted {
            let length = rng.gen_range(0..=5);
            host = random_string(rng, LOWERCASE, length);
            if !host.is_empty() {
                host.push('.');
            }
        }
        let length = rng.gen_range(0..=5);
        host.push_str(&format!("example{}", random_string(rng, DIGITS, length)));
        if dotted {
            host.push_str(".com");
        }

        if rng.gen_bool(0.5) {
            let length = rng.gen_range(0..=5);
            let name = random_string(rng, LOWERCASE, length);
            let extension = if dotted {
                PATH_EXTENSIONS.choose(rng).copied().unwrap_or_default()
            } else {
                ""
            };
            host.push_str(&format!("/{name}{extension}"));
        }
        host
    }
}

/// Splits off a known scheme, returning the original prefix text and the remainder
fn split_scheme(value: &str) -> Option<(Scheme, &str, &str)> {
    let colon = value.find(':')?;
    let (scheme, rest) = value.split_at(colon + 1);
    match scheme.to_ascii_lowercase().as_str() {
        "mailto:" => Some((Scheme::Mail, scheme, rest)),
        "tel:" | "fax:" => Some((Scheme::Phone, scheme, rest)),
        "http:" | "https:" => {
            let slashes = rest.starts_with("//").then_some(2)?;
            Some((Scheme::Web, &value[..colon + 1 + slashes], &rest[slashes..]))
        }
        _ => None,
    }
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    (0..length)
        .filter_map(|_| alphabet.choose(rng).map(|&b| char::from(b)))
        .collect()
}
