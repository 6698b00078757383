//! Address line parsing into labeled components

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Semantic label of one address component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressLabel {
    AddressNumber,
    AddressNumberSuffix,
    StreetNamePreDirectional,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    OccupancyType,
    OccupancyIdentifier,
    UspsBoxType,
    UspsBoxId,
    PlaceName,
    StateName,
    ZipCode,
    /// Tokens the parser could not place
    NotAddress,
}

/// One labeled run of words; `trailing` holds a separator such as `,` that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressComponent {
    pub label: AddressLabel,
    pub text: String,
    pub trailing: String,
}

/// Breaks an address line into labeled components
pub trait AddressParser: Send + Sync + fmt::Debug {
    fn parse(&self, line: &str) -> Vec<AddressComponent>;
}

static HOUSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d[0-9A-Za-z-]*$").unwrap_or_else(|_| unreachable!()));
static NUMBER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(1/2|[A-DF-MO-RT-VX-Za-df-mo-rt-vx-z])$").unwrap_or_else(|_| unreachable!()));
static ZIP_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap_or_else(|_| unreachable!()));
static STATE_ABBREVIATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap_or_else(|_| unreachable!()));

const DIRECTIONALS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "north", "south", "east", "west", "northeast",
    "northwest", "southeast", "southwest",
];

const STREET_TYPES: &[&str] = &[
    "aly", "alley", "ave", "av", "avenue", "bnd", "bend", "blvd", "boulevard", "cir", "circle",
    "cv", "cove", "ct", "court", "crk", "creek", "dr", "drive", "expy", "expressway", "fwy",
    "freeway", "holw", "hollow", "hts", "heights", "hwy", "highway", "ln", "lane", "loop",
    "path", "pike", "pkwy", "parkway", "pl", "place", "plz", "plaza", "pt", "point", "rd",
    "road", "row", "run", "sq", "square", "st", "street", "ter", "terrace", "tpke", "trl",
    "trail", "walk", "way", "xing", "crossing",
];

const OCCUPANCY_TYPES: &[&str] = &[
    "apt", "apartment", "ste", "suite", "unit", "fl", "floor", "rm", "room", "bldg", "building",
    "lot", "trlr", "dept", "spc", "space", "ofc", "office",
];

const BOX_PREFIXES: &[&[&str]] = &[
    &["post", "office", "box"],
    &["p", "o", "box"],
    &["po", "box"],
    &["pobox"],
    &["box"],
];

/// Keyword and pattern based parser for US-style address lines.
///
/// Handles house-number lines, PO boxes, unit designators, and, after a comma or before a
/// ZIP code, place name, state and postal code.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAddressParser;

#[derive(Debug, Clone)]
struct Token<'a> {
    core: &'a str,
    trailing: &'a str,
}

impl<'a> Token<'a> {
    fn split(raw: &'a str) -> Self {
        let core = raw.trim_end_matches([',', ';']);
        Token {
            core,
            trailing: &raw[core.len()..],
        }
    }

    fn key(&self) -> String {
        self.core.trim_end_matches('.').replace('.', "").to_lowercase()
    }

    fn is_one_of(&self, words: &[&str]) -> bool {
        words.contains(&self.key().as_str())
    }
}

impl AddressParser for RuleBasedAddressParser {
    fn parse(&self, line: &str) -> Vec<AddressComponent> {
        let tokens: Vec<Token<'_>> = line
            .split_whitespace()
            .map(Token::split)
            .filter(|t| !t.core.is_empty())
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut labels = vec![AddressLabel::NotAddress; tokens.len()];
        let street_end = label_locality(&tokens, &mut labels);
        label_street(&tokens[..street_end], &mut labels[..street_end]);
        group(&tokens, &labels)
    }
}

/// Labels trailing place, state and ZIP; returns where the street part ends
fn label_locality(tokens: &[Token<'_>], labels: &mut [AddressLabel]) -> usize {
    let mut end = tokens.len();
    let first_comma = tokens[..end - 1]
        .iter()
        .position(|t| t.trailing.contains(','));

    if end > 1 && ZIP_CODE.is_match(tokens[end - 1].core) {
        labels[end - 1] = AddressLabel::ZipCode;
        end -= 1;
        if end > 1 && STATE_ABBREVIATION.is_match(tokens[end - 1].core) {
            labels[end - 1] = AddressLabel::StateName;
            end -= 1;
        }
    } else if let Some(comma) = first_comma {
        if end - comma > 2 && STATE_ABBREVIATION.is_match(tokens[end - 1].core) {
            labels[end - 1] = AddressLabel::StateName;
            end -= 1;
        }
    }

    let Some(comma) = first_comma.filter(|c| c + 1 < end) else {
        return end;
    };
    // a unit designator after the first comma still belongs to the street part
    let mut place_start = comma + 1;
    while place_start < end && starts_occupancy(&tokens[place_start]) {
        let next_comma = tokens[place_start..end]
            .iter()
            .position(|t| t.trailing.contains(','))
            .map(|offset| place_start + offset + 1);
        match next_comma {
            Some(after) => place_start = after,
            None => return end,
        }
    }
    for label in &mut labels[place_start..end] {
        *label = AddressLabel::PlaceName;
    }
    place_start
}

fn starts_occupancy(token: &Token<'_>) -> bool {
    token.core.starts_with('#') || token.is_one_of(OCCUPANCY_TYPES)
}

fn box_prefix_len(tokens: &[Token<'_>]) -> Option<usize> {
    BOX_PREFIXES.iter().find_map(|prefix| {
        let matched = prefix.len() < tokens.len()
            && prefix
                .iter()
                .zip(tokens)
                .all(|(word, token)| token.key() == *word);
        matched.then_some(prefix.len())
    })
}

fn label_street(tokens: &[Token<'_>], labels: &mut [AddressLabel]) {
    let n = tokens.len();
    let mut i = 0;

    if let Some(k) = box_prefix_len(tokens) {
        labels[..k].fill(AddressLabel::UspsBoxType);
        labels[k] = AddressLabel::UspsBoxId;
        i = k + 1;
    } else if n > 0 && HOUSE_NUMBER.is_match(tokens[0].core) {
        labels[0] = AddressLabel::AddressNumber;
        i = 1;
        if i < n - 1 && NUMBER_SUFFIX.is_match(tokens[i].core) {
            labels[i] = AddressLabel::AddressNumberSuffix;
            i += 1;
        }
    }

    let occupancy = (i..n).find(|&j| starts_occupancy(&tokens[j])).unwrap_or(n);
    let mut end = occupancy;

    if i + 1 < end && tokens[i].is_one_of(DIRECTIONALS) {
        labels[i] = AddressLabel::StreetNamePreDirectional;
        i += 1;
    }
    if end > i + 1 && tokens[end - 1].is_one_of(DIRECTIONALS) && tokens[end - 2].is_one_of(STREET_TYPES) {
        labels[end - 1] = AddressLabel::StreetNamePostDirectional;
        end -= 1;
    }
    if end > i + 1 && tokens[end - 1].is_one_of(STREET_TYPES) {
        labels[end - 1] = AddressLabel::StreetNamePostType;
        end -= 1;
    }
    labels[i..end].fill(AddressLabel::StreetName);

    let mut j = occupancy;
    while j < n {
        let token = &tokens[j];
        if token.core == "#" || token.is_one_of(OCCUPANCY_TYPES) {
            labels[j] = AddressLabel::OccupancyType;
            if j + 1 < n {
                labels[j + 1] = AddressLabel::OccupancyIdentifier;
            }
            j += 2;
        } else if token.core.starts_with('#') {
            labels[j] = AddressLabel::OccupancyIdentifier;
            j += 1;
        } else {
            j += 1;
        }
    }
}

/// Merges runs of multi-word labels that are not split by a separator
fn group(tokens: &[Token<'_>], labels: &[AddressLabel]) -> Vec<AddressComponent> {
    let mut components: Vec<AddressComponent> = Vec::new();
    for (token, &label) in tokens.iter().zip(labels) {
        let joinable = matches!(
            label,
            AddressLabel::StreetName | AddressLabel::PlaceName | AddressLabel::UspsBoxType
        );
        match components.last_mut() {
            Some(last) if joinable && last.label == label && last.trailing.is_empty() => {
                last.text.push(' ');
                last.text.push_str(token.core);
                last.trailing = token.trailing.to_string();
            }
            _ => components.push(AddressComponent {
                label,
                text: token.core.to_string(),
                trailing: token.trailing.to_string(),
            }),
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use AddressLabel::*;

    fn labels(line: &str) -> Vec<(AddressLabel, String)> {
        RuleBasedAddressParser
            .parse(line)
            .into_iter()
            .map(|c| (c.label, c.text))
            .collect()
    }

    fn l(label: AddressLabel, text: &str) -> (AddressLabel, String) {
        (label, text.to_string())
    }

    #[test]
    fn test_house_number_line() {
        assert_eq!(
            labels("123 Main St"),
            vec![l(AddressNumber, "123"), l(StreetName, "Main"), l(StreetNamePostType, "St")]
        );
    }

    #[test]
    fn test_po_box() {
        assert_eq!(labels("PO Box 123"), vec![l(UspsBoxType, "PO Box"), l(UspsBoxId, "123")]);
        assert_eq!(labels("P.O. Box 9"), vec![l(UspsBoxType, "P.O. Box"), l(UspsBoxId, "9")]);
    }

    #[test]
    fn test_directionals_and_unit() {
        assert_eq!(
            labels("4500 N Martin Luther King Blvd SW Apt 2B"),
            vec![
                l(AddressNumber, "4500"),
                l(StreetNamePreDirectional, "N"),
                l(StreetName, "Martin Luther King"),
                l(StreetNamePostType, "Blvd"),
                l(StreetNamePostDirectional, "SW"),
                l(OccupancyType, "Apt"),
                l(OccupancyIdentifier, "2B"),
            ]
        );
    }

    #[test]
    fn test_full_address_with_locality() {
        let parsed = RuleBasedAddressParser.parse("77 Elm Street, Suite 4, Springfield, IL 62701");
        let got: Vec<_> = parsed.iter().map(|c| (c.label, c.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (AddressNumber, "77"),
                (StreetName, "Elm"),
                (StreetNamePostType, "Street"),
                (OccupancyType, "Suite"),
                (OccupancyIdentifier, "4"),
                (PlaceName, "Springfield"),
                (StateName, "IL"),
                (ZipCode, "62701"),
            ]
        );
        assert_eq!(parsed[2].trailing, ",");
        assert_eq!(parsed[5].trailing, ",");
    }

    #[test]
    fn test_street_type_alone_is_a_name() {
        assert_eq!(labels("12 Broadway"), vec![l(AddressNumber, "12"), l(StreetName, "Broadway")]);
        assert_eq!(labels("Court"), vec![l(StreetName, "Court")]);
    }

    #[test]
    fn test_hash_unit() {
        assert_eq!(
            labels("9 Oak Ave #12"),
            vec![
                l(AddressNumber, "9"),
                l(StreetName, "Oak"),
                l(StreetNamePostType, "Ave"),
                l(OccupancyIdentifier, "#12"),
            ]
        );
    }

    #[test]
    fn test_blank_line() {
        assert!(RuleBasedAddressParser.parse("   ").is_empty());
    }
}
