//! Main anonymization engine
//!
//! This module provides the [`Anonymizer`] that turns each
//! [`SensitiveOccurrence`] found by the document walker into a replacement value.
//!
//! # Architecture
//!
//! One `Anonymizer` owns all state a run needs:
//! - **Random stream**: a private generator, reseeded per call in deterministic mode
//! - **Mapping cache**: keeps repeated originals mapped to the same replacement
//! - **Time offset**: drawn once, shared by every timestamp the instance shifts
//! - **Safe tokens**: vocabulary that free text may keep
//!
//! The per-category strategies live in [`strategies`](super::strategies) as further
//! `impl Anonymizer` blocks.
//!
//! # Examples
//!
//! ```
//! use eicr_anonymizer::anonymization::{Anonymizer, AnonymizerSettings};
//!
//! let settings = AnonymizerSettings { deterministic: true, seed: Some(7) };
//! let mut first = Anonymizer::new(settings);
//! let mut second = Anonymizer::new(settings);
//!
//! assert_eq!(
//!     first.anonymize_identifier("MRN-0042"),
//!     second.anonymize_identifier("MRN-0042"),
//! );
//! assert_eq!(first.anonymize_timestamp("20141023").len(), 8);
//! ```

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::address::{AddressParser, RuleBasedAddressParser};
use super::cache::{CacheTable, MappingCache};
use super::determinism::{derive_seed, RandomStream, ScopedSeed, StreamOwner, DEFAULT_SEED};
use super::models::{FragmentReplacement, Replacement};
use super::pools::{self, PoolBags, PoolKind};
use super::strategies::text::COMMON_SAFE_WORDS;
use crate::discovery::{normalize, Category, OccurrenceTarget, SafeTokens, SensitiveOccurrence};

/// Fixed marker written in place of redacted values
pub const REDACTION_MARKER: &str = "REMOVED";

/// Upper bound of the run-wide time shift: one hundred years of seconds
pub const MAX_TIME_OFFSET_SECONDS: i64 = 3_155_760_000;

const MAX_REROLLS: u32 = 16;

/// Determinism toggle of one anonymizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizerSettings {
    /// Every operation becomes a pure function of its parameters and the seed
    pub deterministic: bool,
    /// Global seed; defaults to 740 when determinism is on
    pub seed: Option<u64>,
}

impl AnonymizerSettings {
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

/// Stateful, single-owner anonymization engine
///
/// # Thread Safety
///
/// An `Anonymizer` is `Send` but takes `&mut self` everywhere. Workers that run in
/// parallel each own an instance; a shared instance is moved between blocking tasks, so
/// its cache is never written by two threads at once.
#[derive(Debug)]
pub struct Anonymizer {
    settings: AnonymizerSettings,
    stream: RandomStream,
    cache: MappingCache,
    bags: PoolBags,
    safe_tokens: SafeTokens,
    address_parser: Box<dyn AddressParser>,
    time_offset: Duration,
    reference_time: DateTime<Utc>,
}

impl StreamOwner for Anonymizer {
    fn stream_mut(&mut self) -> &mut RandomStream {
        &mut self.stream
    }
}

impl Anonymizer {
    /// Create a new anonymizer
    ///
    /// The base stream is seeded from the configured seed, from the default seed when
    /// determinism is on without one, and from entropy otherwise. The time offset is the
    /// first draw from that stream.
    pub fn new(settings: AnonymizerSettings) -> Self {
        let mut stream = match (settings.deterministic, settings.seed) {
            (_, Some(seed)) => RandomStream::seeded(seed),
            (true, None) => RandomStream::seeded(DEFAULT_SEED),
            (false, None) => RandomStream::from_entropy(),
        };
        let offset_seconds = stream.rng().gen_range(0..=MAX_TIME_OFFSET_SECONDS);

        let mut safe_tokens = SafeTokens::new();
        for word in COMMON_SAFE_WORDS {
            safe_tokens.insert(word);
        }

        debug!(
            deterministic = settings.deterministic,
            seeded = settings.seed.is_some(),
            "Created anonymizer"
        );

        Self {
            settings,
            stream,
            cache: MappingCache::new(),
            bags: PoolBags::new(),
            safe_tokens,
            address_parser: Box::new(RuleBasedAddressParser),
            time_offset: Duration::seconds(offset_seconds),
            reference_time: Utc::now(),
        }
    }

    /// Replace the address parsing collaborator
    pub fn with_address_parser(mut self, parser: Box<dyn AddressParser>) -> Self {
        self.address_parser = parser;
        self
    }

    /// Pin the instant used for unparseable timestamps
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn settings(&self) -> AnonymizerSettings {
        self.settings
    }

    pub fn time_offset(&self) -> Duration {
        self.time_offset
    }

    pub(crate) fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    pub fn safe_tokens(&self) -> &SafeTokens {
        &self.safe_tokens
    }

    /// Adds tokens harvested from a document to the free-text allow-list
    pub fn add_safe_tokens(&mut self, tokens: &SafeTokens) {
        self.safe_tokens.extend(tokens);
    }

    pub(crate) fn address_parser(&self) -> &dyn AddressParser {
        self.address_parser.as_ref()
    }

    /// Anonymize one occurrence
    ///
    /// Dispatches on the occurrence's category. Narrative blocks get one replacement per
    /// text node so the rewriter can keep their markup.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use eicr_anonymizer::anonymization::{Anonymizer, AnonymizerSettings, Replacement};
    /// use eicr_anonymizer::discovery::{Category, OccurrenceTarget, SensitiveOccurrence};
    /// use eicr_anonymizer::document::NodePath;
    ///
    /// let occurrence = SensitiveOccurrence {
    ///     category: Category::Telecom,
    ///     location: NodePath::root().child(1),
    ///     target: OccurrenceTarget::Attribute("value".to_string()),
    ///     raw_attributes: BTreeMap::from([("value".to_string(), "#note-1".to_string())]),
    ///     raw_text: None,
    ///     type_name: "TEL".to_string(),
    ///     element_name: "telecom".to_string(),
    ///     type_path: vec!["ClinicalDocument".to_string(), "TEL".to_string()],
    /// };
    ///
    /// let mut anonymizer = Anonymizer::new(AnonymizerSettings::default());
    /// assert_eq!(anonymizer.anonymize(&occurrence), Replacement::Value("#note-1".to_string()));
    /// ```
    pub fn anonymize(&mut self, occurrence: &SensitiveOccurrence) -> Replacement {
        if let OccurrenceTarget::Narrative(fragments) = &occurrence.target {
            let replaced = fragments
                .iter()
                .map(|fragment| FragmentReplacement {
                    path: fragment.path.clone(),
                    value: self.anonymize_text(&fragment.text),
                })
                .collect();
            return Replacement::Fragments(replaced);
        }

        let original = occurrence.original();
        trace!(
            category = %occurrence.category,
            location = %occurrence.location,
            "Anonymizing occurrence"
        );
        let value = match &occurrence.category {
            Category::Timestamp => self.anonymize_timestamp(&original),
            Category::Identifier => self.anonymize_identifier(&original),
            Category::EntityName => {
                self.anonymize_entity_name(&original, occurrence.type_name == "PN")
            }
            Category::PostalAddress | Category::StreetAddressLine => {
                self.anonymize_address_line(&original)
            }
            Category::Telecom => self.anonymize_telecom(&original),
            Category::CodedPart { role } => self.anonymize_part(role, &original),
            Category::FreeText | Category::Narrative | Category::Generic => {
                self.anonymize_text(&original)
            }
        };
        Replacement::Value(value)
    }

    /// Runs `operation` under a seed derived from its parameters when deterministic
    pub(crate) fn with_call_seed<P, R>(
        &mut self,
        operation: &str,
        params: &P,
        operation_fn: impl FnOnce(&mut Self) -> R,
    ) -> R
    where
        P: Serialize + ?Sized,
    {
        if !self.settings.deterministic {
            return operation_fn(self);
        }
        let seed = derive_seed(operation, params, self.settings.effective_seed());
        let mut scoped = ScopedSeed::new(self, seed);
        operation_fn(&mut *scoped)
    }

    /// Looks up or generates the replacement of `original` in one cache table.
    ///
    /// A candidate already handed out for another original is rerolled; with
    /// `require_change` a candidate equal to the original is rerolled too.
    pub(crate) fn cached(
        &mut self,
        table: CacheTable,
        original: &str,
        require_change: bool,
        generate: impl Fn(&mut Self) -> String,
    ) -> String {
        let key = normalize(original);
        if key.is_empty() {
            return generate(self);
        }
        if let Some(hit) = self.cache.get(table, &key) {
            return hit.to_string();
        }

        let label = table.to_string();
        let mut attempt = 0u32;
        let replacement = loop {
            let candidate =
                self.with_call_seed("cached", &(label.as_str(), original, attempt), &generate);
            let collides = self.cache.is_used(table, &candidate)
                || (require_change && normalize(&candidate) == key);
            if !collides || attempt >= MAX_REROLLS {
                if collides {
                    trace!(table = %table, "Accepted colliding replacement after rerolls");
                }
                break candidate;
            }
            attempt += 1;
        };
        self.cache.insert(table, key, replacement).to_string()
    }

    /// One value from a pool.
    ///
    /// Deterministic calls pick directly from the pool since a call-seeded stream
    /// would always reshuffle the bag the same way.
    pub(crate) fn draw(&mut self, kind: PoolKind) -> &'static str {
        if self.settings.deterministic {
            pools::values(kind)
                .choose(self.stream.rng())
                .copied()
                .unwrap_or_default()
        } else {
            self.bags.draw(kind, self.stream.rng())
        }
    }

    pub(crate) fn coin(&mut self) -> bool {
        self.stream.rng().gen_bool(0.5)
    }

    pub(crate) fn rng(&mut self) -> &mut rand::rngs::StdRng {
        self.stream.rng()
    }
}
