//! Name strategies: pool lookups for people, templates for organizations

use rand::Rng;

use crate::anonymization::cache::{CacheTable, LikeCharKind};
use crate::anonymization::format::match_formatting;
use crate::anonymization::pools::PoolKind;
use crate::anonymization::Anonymizer;

/// Values this short are scrambled instead of looked up
const SHORT_VALUE_LENGTH: usize = 3;

impl Anonymizer {
    /// Replace a value with a cached draw from a pool.
    ///
    /// All-digit and very short values (abbreviations, initials) get a same-class scramble
    /// instead.
    pub fn replace_from_pool(&mut self, value: &str, kind: PoolKind) -> String {
        let core = value.trim();
        if core.is_empty() {
            return value.to_string();
        }
        let replaced = if core.chars().all(|c| c.is_ascii_digit())
            || core.chars().count() <= SHORT_VALUE_LENGTH
        {
            self.replace_with_like_chars(core, LikeCharKind::ShortValue)
        } else {
            self.cached(CacheTable::Pool(kind), core, true, |this| {
                this.draw(kind).to_string()
            })
        };
        match_formatting(value, &replaced)
    }

    /// Replace an unstructured name.
    ///
    /// Person names are replaced word by word, the last word from the family pool and the
    /// rest from the given pool. Other entity names get a generated organization name.
    pub fn anonymize_entity_name(&mut self, value: &str, person: bool) -> String {
        let core = value.trim();
        if core.is_empty() {
            return value.to_string();
        }
        let replaced = if person {
            let words: Vec<&str> = core.split_whitespace().collect();
            let last = words.len() - 1;
            words
                .iter()
                .enumerate()
                .map(|(index, word)| {
                    let kind = if index == last {
                        PoolKind::FamilyName
                    } else {
                        PoolKind::GivenName
                    };
                    self.replace_from_pool(word, kind)
                })
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            self.cached(CacheTable::EntityName, core, true, |this| {
                this.organization_name()
            })
        };
        match_formatting(value, &replaced)
    }

    /// Organization name from one of two templates:
    /// `<locality part> [scope] <facility> [<conj> <facility>]` or
    /// `[org type] [scope] <facility> [<conj> <facility>] of <locality>`
    pub(crate) fn organization_name(&mut self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.coin() {
            let locality = self.draw(PoolKind::Locality);
            let organization = self.draw(PoolKind::OrganizationType);
            let lead = match self.rng().gen_range(0..3) {
                0 => format!("{locality} {organization}"),
                1 => format!("{organization} of {locality}"),
                _ => locality.to_string(),
            };
            parts.push(lead);
            self.push_facility(&mut parts);
        } else {
            if self.coin() {
                parts.push(self.draw(PoolKind::OrganizationType).to_string());
            }
            self.push_facility(&mut parts);
            parts.push(format!("of {}", self.draw(PoolKind::Locality)));
        }
        parts.join(" ")
    }

    fn push_facility(&mut self, parts: &mut Vec<String>) {
        if self.coin() {
            parts.push(self.draw(PoolKind::Scope).to_string());
        }
        parts.push(self.draw(PoolKind::FacilityType).to_string());
        if self.coin() {
            let conjunction = self.draw(PoolKind::Conjunction);
            let facility = self.draw(PoolKind::FacilityType);
            parts.push(format!("{conjunction} {facility}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::pools;
    use crate::anonymization::AnonymizerSettings;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    fn anonymizer() -> Anonymizer {
        Anonymizer::new(AnonymizerSettings::default())
    }

    #[test]
    fn test_pool_value_and_formatting() {
        let mut anonymizer = anonymizer();
        let out = anonymizer.replace_from_pool("SPRINGFIELD", PoolKind::City);
        assert!(pools::values(PoolKind::City)
            .iter()
            .any(|city| city.to_uppercase() == out));
        assert_eq!(
            anonymizer.replace_from_pool(" springfield ", PoolKind::City),
            format!(" {} ", out.to_lowercase())
        );
    }

    #[test]
    fn test_short_values_are_scrambled() {
        let mut anonymizer = anonymizer();
        let out = anonymizer.replace_from_pool("MA", PoolKind::State);
        assert_eq!(out.len(), 2);
        assert!(out.chars().all(|c| c.is_ascii_uppercase()));
        assert_ne!(out, "MA");
    }

    #[test]
    fn test_person_names_use_name_pools() {
        let mut anonymizer = anonymizer();
        for _ in 0..20 {
            let given: String = FirstName().fake();
            let family: String = LastName().fake();
            let out = anonymizer.anonymize_entity_name(&format!("{given} {family}"), true);
            let words: Vec<&str> = out.split(' ').collect();
            assert_eq!(words.len(), 2, "{out}");
        }
    }

    #[test]
    fn test_organization_name_has_facility_type() {
        let mut anonymizer = anonymizer();
        for index in 0..30 {
            let out = anonymizer.anonymize_entity_name(&format!("Saint Elsewhere {index}"), false);
            assert!(
                pools::values(PoolKind::FacilityType)
                    .iter()
                    .any(|facility| out.contains(facility)),
                "{out}"
            );
        }
    }

    #[test]
    fn test_uppercase_organization_stays_uppercase() {
        let mut anonymizer = anonymizer();
        let out = anonymizer.anonymize_entity_name("COUNTY GENERAL HOSPITAL", false);
        assert_eq!(out, out.to_uppercase());
        assert!(!out.contains('.'));
    }
}
