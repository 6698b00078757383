//! Address lines and coded name/address parts

use crate::anonymization::address::{AddressComponent, AddressLabel};
use crate::anonymization::cache::LikeCharKind;
use crate::anonymization::engine::REDACTION_MARKER;
use crate::anonymization::format::match_formatting;
use crate::anonymization::pools::PoolKind;
use crate::anonymization::Anonymizer;

/// How a coded part is replaced, keyed by its role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartStrategy {
    Pool(PoolKind),
    LikeChars(LikeCharKind),
    AddressLine,
    Redact,
}

/// Strategy for an `ADXP`/`ENXP` part by element name
pub fn part_strategy(role: &str) -> PartStrategy {
    match role {
        "city" => PartStrategy::Pool(PoolKind::City),
        "county" => PartStrategy::Pool(PoolKind::County),
        "state" => PartStrategy::Pool(PoolKind::State),
        "country" => PartStrategy::Pool(PoolKind::Country),
        "postalCode" => PartStrategy::LikeChars(LikeCharKind::PostalCode),
        "houseNumber" => PartStrategy::LikeChars(LikeCharKind::HouseNumber),
        "unitID" => PartStrategy::LikeChars(LikeCharKind::UnitId),
        "postBox" => PartStrategy::LikeChars(LikeCharKind::PostBox),
        "buildingNumberSuffix" => PartStrategy::LikeChars(LikeCharKind::NumberSuffix),
        "streetName" | "streetNameBase" => PartStrategy::Pool(PoolKind::StreetName),
        "streetAddressLine" => PartStrategy::AddressLine,
        "given" => PartStrategy::Pool(PoolKind::GivenName),
        "family" => PartStrategy::Pool(PoolKind::FamilyName),
        _ => PartStrategy::Redact,
    }
}

impl Anonymizer {
    /// Replace a coded name or address part according to its role
    pub fn anonymize_part(&mut self, role: &str, value: &str) -> String {
        match part_strategy(role) {
            PartStrategy::Pool(kind) => self.replace_from_pool(value, kind),
            PartStrategy::LikeChars(kind) => self.replace_with_like_chars(value, kind),
            PartStrategy::AddressLine => self.anonymize_address_line(value),
            PartStrategy::Redact => match_formatting(value, REDACTION_MARKER),
        }
    }

    /// Replace an address line component by component.
    ///
    /// Qualifiers such as unit and box designators, directionals and street types are
    /// kept; the rejoined line takes the original's formatting.
    pub fn anonymize_address_line(&mut self, value: &str) -> String {
        let components = self.address_parser().parse(value);
        if components.is_empty() {
            return value.to_string();
        }
        let rebuilt = components
            .iter()
            .map(|component| {
                format!(
                    "{}{}",
                    self.replace_component(component),
                    component.trailing
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        match_formatting(value, &rebuilt)
    }

    fn replace_component(&mut self, component: &AddressComponent) -> String {
        let text = component.text.as_str();
        match component.label {
            AddressLabel::AddressNumber => {
                self.replace_with_like_chars(text, LikeCharKind::HouseNumber)
            }
            AddressLabel::AddressNumberSuffix => {
                self.replace_with_like_chars(text, LikeCharKind::NumberSuffix)
            }
            AddressLabel::OccupancyIdentifier => {
                self.replace_with_like_chars(text, LikeCharKind::UnitId)
            }
            AddressLabel::UspsBoxId => self.replace_with_like_chars(text, LikeCharKind::PostBox),
            AddressLabel::ZipCode => self.replace_with_like_chars(text, LikeCharKind::PostalCode),
            AddressLabel::NotAddress => {
                self.replace_with_like_chars(text, LikeCharKind::Unlabeled)
            }
            AddressLabel::StreetName => self.replace_from_pool(text, PoolKind::StreetName),
            AddressLabel::PlaceName => self.replace_from_pool(text, PoolKind::City),
            AddressLabel::StateName => self.replace_from_pool(text, PoolKind::State),
            AddressLabel::StreetNamePreDirectional
            | AddressLabel::StreetNamePostType
            | AddressLabel::StreetNamePostDirectional
            | AddressLabel::OccupancyType
            | AddressLabel::UspsBoxType => text.to_string(),
        }
    }
}
