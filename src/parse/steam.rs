//! Steam screenshot names: `YYYYMMDDHHMMSS_<n>.<ext>`.
//!
//! The identity is not part of the name; Steam stores screenshots under a
//! directory named after the App ID.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::{checked_timestamp, ParseError};

fn steam_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Anchored at the start only: trailing text after the extension is allowed
    RE.get_or_init(|| Regex::new(r"^([0-9]{14})_.*\.\w+").expect("valid steam regex"))
}

/// Extract the capture time from a Steam screenshot file name.
pub fn parse_steam_filename(filename: &str) -> Result<NaiveDateTime, ParseError> {
    let caps = steam_regex()
        .captures(filename)
        .ok_or(ParseError::NotMatched)?;
    let digits = &caps[1];

    // All ASCII digits, so slicing and parsing cannot fail
    let field = |range: std::ops::Range<usize>| digits[range].parse::<u32>().unwrap_or(0);

    let year = field(0..4) as i32;
    checked_timestamp(
        year,
        field(4..6),
        field(6..8),
        field(8..10),
        field(10..12),
        field(12..14),
    )
    .ok_or_else(|| ParseError::InvalidTimestamp(digits.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_valid_name() {
        let ts = parse_steam_filename("20230101123000_1.jpg").unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_parse_arbitrary_suffix() {
        assert!(parse_steam_filename("20240229235959_vr_left.png").is_ok());
        assert!(parse_steam_filename("20240229235959_.png").is_ok());
    }

    #[test]
    fn test_rejects_invalid_calendar_values() {
        assert!(matches!(
            parse_steam_filename("20231301123000_1.jpg"),
            Err(ParseError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            parse_steam_filename("20230229120000_1.jpg"),
            Err(ParseError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            parse_steam_filename("20230101246000_1.jpg"),
            Err(ParseError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        for name in [
            "thumbnails",
            "2023010112300_1.jpg",
            "20230101123000.jpg",
            "20230101123000_1",
            "x20230101123000_1.jpg",
            "",
        ] {
            assert_eq!(
                parse_steam_filename(name),
                Err(ParseError::NotMatched),
                "{name} should not match"
            );
        }
    }

    #[test]
    fn test_extra_digits_do_not_match() {
        // 15 digits before the underscore: the 14-digit group is not followed by `_`
        assert_eq!(
            parse_steam_filename("202301011230001_1.jpg"),
            Err(ParseError::NotMatched)
        );
    }
}
