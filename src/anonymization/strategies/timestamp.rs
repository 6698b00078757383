//! Timestamp strategy: shift back by the run-wide offset

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::anonymization::format::match_whitespace;
use crate::anonymization::Anonymizer;

static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4,14})([+-]\d{4})?$").unwrap_or_else(|_| unreachable!()));

/// Used when a value matches none of the known precisions
pub const FALLBACK_FORMAT: &str = "%Y%m%d%H%M%S%z";

/// Precisions tried in order, keyed by digit count
const PRECISIONS: &[(usize, &str)] = &[
    (4, "%Y"),
    (6, "%Y%m"),
    (8, "%Y%m%d"),
    (10, "%Y%m%d%H"),
    (12, "%Y%m%d%H%M"),
    (14, "%Y%m%d%H%M%S"),
];

impl Anonymizer {
    /// Shift a timestamp backwards by this instance's offset, keeping its precision
    ///
    /// Values that match no known precision become the reference instant shifted by the
    /// same offset.
    pub fn anonymize_timestamp(&mut self, value: &str) -> String {
        match shift_timestamp(value.trim(), self.time_offset()) {
            Some(shifted) => match_whitespace(value, &shifted),
            None => {
                debug!(length = value.len(), "Unparseable timestamp replaced");
                let fallback = self.reference_time().fixed_offset() - self.time_offset();
                match_whitespace(value, &fallback.format(FALLBACK_FORMAT).to_string())
            }
        }
    }
}

/// Parses one precision exactly and renders the shifted instant with the same format
pub fn shift_timestamp(value: &str, offset: Duration) -> Option<String> {
    let captures = TIMESTAMP.captures(value)?;
    let digits = captures.get(1)?.as_str();
    let format = PRECISIONS
        .iter()
        .find(|(len, _)| *len == digits.len())
        .map(|(_, format)| *format)?;

    let naive = parse_naive(digits)?;
    match captures.get(2) {
        Some(zone) => {
            let zone = parse_zone(zone.as_str())?;
            let local: DateTime<FixedOffset> = zone.from_local_datetime(&naive).single()?;
            let shifted = local.checked_sub_signed(offset)?;
            Some(format!("{}{}", shifted.format(format), shifted.format("%z")))
        }
        None => {
            let shifted = naive.checked_sub_signed(offset)?;
            Some(shifted.format(format).to_string())
        }
    }
}

fn parse_naive(digits: &str) -> Option<NaiveDateTime> {
    let field = |start: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + 2) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };
    let year: i32 = digits.get(0..4)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, field(4, 1)?, field(6, 1)?)?.and_hms_opt(
        field(8, 0)?,
        field(10, 0)?,
        field(12, 0)?,
    )
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let hours: i32 = zone.get(1..3)?.parse().ok()?;
    let minutes: i32 = zone.get(3..5)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::AnonymizerSettings;
    use chrono::{TimeZone, Utc};
    use test_case::test_case;

    #[test_case("2015", "2014" ; "year")]
    #[test_case("201503", "201502" ; "year month")]
    #[test_case("20150301", "20150228" ; "date")]
    #[test_case("2015030100", "2015022823" ; "hour")]
    #[test_case("201503010000", "201502282359" ; "minute")]
    #[test_case("20150301000000", "20150228235959" ; "second")]
    #[test_case("20150301000000-0500", "20150228235959-0500" ; "zoned")]
    fn test_shift_keeps_precision(input: &str, expected: &str) {
        assert_eq!(shift_timestamp(input, Duration::seconds(1)).unwrap(), expected);
    }

    #[test_case("2015-03-01" ; "separators")]
    #[test_case("20150230" ; "invalid day")]
    #[test_case("2015030" ; "odd length")]
    #[test_case("20150919161829.123-0500" ; "fractional seconds")]
    fn test_unknown_shapes_do_not_parse(input: &str) {
        assert!(shift_timestamp(input, Duration::seconds(1)).is_none());
    }

    #[test]
    fn test_fallback_uses_reference_time() {
        let reference = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut anonymizer = Anonymizer::new(AnonymizerSettings {
            deterministic: true,
            seed: Some(3),
        })
        .with_reference_time(reference);

        let expected = (reference - anonymizer.time_offset())
            .format("%Y%m%d%H%M%S+0000")
            .to_string();
        assert_eq!(anonymizer.anonymize_timestamp("not a date"), expected);
    }

    #[test]
    fn test_same_input_same_output_and_whitespace() {
        let mut anonymizer = Anonymizer::new(AnonymizerSettings::default());
        let first = anonymizer.anonymize_timestamp("20201107094421-0500");
        assert_eq!(anonymizer.anonymize_timestamp("20201107094421-0500"), first);
        let padded = anonymizer.anonymize_timestamp(" 20201107094421-0500 ");
        assert_eq!(padded, format!(" {first} "));
    }
}
