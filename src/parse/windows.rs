//! Windows game bar capture names: `<name> YYYY_M_D HH_MM_SS.<ext>`.
//!
//! Each date and time separator may independently be `-` or `_`. Digits are
//! ASCII only.

use std::sync::OnceLock;

use regex::Regex;

use super::{checked_timestamp, ParseError};
use crate::domain::ParsedFilename;

fn windows_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<name>.+?)\s(?P<year>[0-9]{1,4})[-_](?P<month>[0-9]{1,2})[-_](?P<day>[0-9]{1,2})\s(?P<hour>[0-9]{1,2})[-_](?P<minute>[0-9]{1,2})[-_](?P<second>[0-9]{1,2})\.\w+$",
        )
        .expect("valid windows capture regex")
    })
}

/// Extract the process name and capture time from a Windows capture name.
///
/// The returned identity is trimmed of surrounding whitespace.
pub fn parse_windows_filename(filename: &str) -> Result<ParsedFilename, ParseError> {
    let caps = windows_regex()
        .captures(filename)
        .ok_or(ParseError::NotMatched)?;

    let number = |group: &str| -> Option<u32> { caps.name(group)?.as_str().parse().ok() };
    let invalid = || ParseError::InvalidTimestamp(filename.to_string());

    let timestamp = checked_timestamp(
        number("year").ok_or_else(invalid)? as i32,
        number("month").ok_or_else(invalid)?,
        number("day").ok_or_else(invalid)?,
        number("hour").ok_or_else(invalid)?,
        number("minute").ok_or_else(invalid)?,
        number("second").ok_or_else(invalid)?,
    )
    .ok_or_else(invalid)?;

    Ok(ParsedFilename {
        identity: caps["name"].trim().to_string(),
        timestamp,
        raw_filename: filename.to_string(),
    })
}
