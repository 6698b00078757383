//! Surface format preservation: case, whitespace, periods, timestamp shape, addresses

use chrono::Duration;
use eicr_anonymizer::anonymization::format::{is_lower, is_upper};
use eicr_anonymizer::anonymization::strategies::timestamp::shift_timestamp;
use eicr_anonymizer::anonymization::{
    match_formatting, Anonymizer, AnonymizerSettings, PoolKind, REDACTION_MARKER,
};
use fake::faker::address::en::CityName;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::LastName;
use fake::Fake;
use once_cell::sync::Lazy;
use regex::Regex;
use test_case::test_case;

static FULL_TIMESTAMP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{14}[+-]\d{4}$").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

fn anonymizer() -> Anonymizer {
    Anonymizer::new(AnonymizerSettings::default())
}

#[test]
fn test_match_formatting_properties() {
    for _ in 0..50 {
        let words: Vec<String> = Words(1..4).fake();
        let phrase = words.join(" ");
        let replacement: String = LastName().fake();

        let upper = match_formatting(&format!("  {}\t", phrase.to_uppercase()), &replacement);
        assert!(upper.starts_with("  ") && upper.ends_with('\t'), "{upper:?}");
        assert!(is_upper(upper.trim()) || !upper.chars().any(char::is_alphabetic));

        let lower = match_formatting(&phrase.to_lowercase(), &replacement);
        assert!(is_lower(&lower) || !lower.chars().any(char::is_alphabetic));

        let with_period = match_formatting(&format!("{phrase}."), &replacement);
        assert!(with_period.ends_with('.'), "{with_period:?}");

        let without_period = match_formatting(&phrase, &format!("{replacement}."));
        assert!(!without_period.contains('.'), "{without_period:?}");
    }
}

#[test_case("20150919161829+0000", 20 ; "second precision with zone")]
#[test_case("20150919161829", 14 ; "second precision")]
#[test_case("201509191618", 12 ; "minute precision")]
#[test_case("2015091916", 10 ; "hour precision")]
#[test_case("20141023", 8 ; "date")]
#[test_case("201410", 6 ; "month")]
#[test_case("2014", 4 ; "year")]
#[test_case("20141023-0500", 13 ; "date with zone")]
fn test_timestamp_shape_preserved(value: &str, length: usize) {
    let mut anonymizer = anonymizer();
    let out = anonymizer.anonymize_timestamp(value);
    assert_eq!(out.len(), length, "{out}");
    assert_eq!(
        out.chars().map(|c| c.is_ascii_digit()).collect::<Vec<_>>(),
        value.chars().map(|c| c.is_ascii_digit()).collect::<Vec<_>>(),
        "{out}"
    );
}

#[test]
fn test_timestamp_zone_is_kept() {
    let shifted = shift_timestamp("20150919161829+0000", Duration::days(400)).unwrap();
    assert!(FULL_TIMESTAMP.is_match(&shifted));
    assert!(shifted.ends_with("+0000"));
    assert_eq!(&shifted[..8], "20140815");
}

#[test]
fn test_same_timestamp_same_output_within_run() {
    let mut anonymizer = anonymizer();
    let first = anonymizer.anonymize_timestamp("20201107094421-0500");
    let second = anonymizer.anonymize_timestamp("20201107094421-0500");
    assert_eq!(first, second);
}

#[test_case("not a date" ; "prose")]
#[test_case("2015-09-19" ; "iso dashes")]
#[test_case("20150919161829.123" ; "fractional seconds")]
fn test_unparseable_timestamp_falls_back(value: &str) {
    let mut anonymizer = anonymizer();
    let out = anonymizer.anonymize_timestamp(value);
    assert!(FULL_TIMESTAMP.is_match(&out), "{out}");
}

#[test]
fn test_street_line_keeps_type_and_scrambles_number() {
    let mut anonymizer = anonymizer();
    let out = anonymizer.anonymize_address_line("123 Main St");
    let tokens: Vec<&str> = out.split_whitespace().collect();

    assert_eq!(tokens.last(), Some(&"St"));
    assert_eq!(tokens[0].len(), 3);
    assert!(DIGITS.is_match(tokens[0]));
    assert_ne!(tokens[0], "123");
    assert!(!out.contains("Main"));
}

#[test]
fn test_po_box_keeps_designator() {
    let mut anonymizer = anonymizer();
    let out = anonymizer.anonymize_address_line("PO Box 123");
    assert!(out.starts_with("PO Box "), "{out}");
    let number = out.trim_start_matches("PO Box ");
    assert_eq!(number.len(), 3);
    assert!(DIGITS.is_match(number));
    assert_ne!(number, "123");
}

#[test]
fn test_random_street_lines_keep_shape() {
    let mut anonymizer = anonymizer();
    for n in 0..30 {
        let street: String = LastName().fake();
        let line = format!("{} {street} Ave", 100 + n * 7);
        let out = anonymizer.anonymize_address_line(&line);
        assert!(out.ends_with(" Ave"), "{line} -> {out}");
        let number = out.split_whitespace().next().unwrap();
        assert_eq!(number.len(), 3, "{line} -> {out}");
        assert!(DIGITS.is_match(number));
    }
}

#[test]
fn test_uppercase_city_stays_uppercase() {
    let mut anonymizer = anonymizer();
    for _ in 0..20 {
        let city: String = CityName().fake();
        if city.chars().count() <= 3 {
            continue;
        }
        let out = anonymizer.anonymize_part("city", &city.to_uppercase());
        assert!(is_upper(&out), "{city} -> {out}");
        assert_ne!(out, city.to_uppercase());
    }
}

#[test_case("MA" ; "state abbreviation")]
#[test_case("021" ; "digits")]
fn test_short_pool_values_keep_character_classes(value: &str) {
    let mut anonymizer = anonymizer();
    let out = anonymizer.replace_from_pool(value, PoolKind::State);
    assert_eq!(out.len(), value.len());
    for (a, b) in out.chars().zip(value.chars()) {
        assert_eq!(a.is_ascii_digit(), b.is_ascii_digit());
        assert_eq!(a.is_ascii_uppercase(), b.is_ascii_uppercase());
    }
}

#[test]
fn test_unknown_part_role_is_redacted() {
    let mut anonymizer = anonymizer();
    assert_eq!(anonymizer.anonymize_part("prefix", "Dr."), format!("{REDACTION_MARKER}."));
    assert_eq!(anonymizer.anonymize_part("delimiter", " , "), format!(" {REDACTION_MARKER} "));
}
