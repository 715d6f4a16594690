//! File name grammars for the two capture sources.
//!
//! Both parsers are pure and total: they never touch the filesystem and
//! report a [`ParseError`] instead of panicking on odd input.

pub mod steam;
pub mod windows;

use thiserror::Error;

pub use steam::parse_steam_filename;
pub use windows::parse_windows_filename;

/// Why a file name could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The name does not have the shape of the grammar at all
    #[error("file name does not match the expected format")]
    NotMatched,

    /// The shape matched but the date or time is not a real calendar value
    #[error("invalid date or time in file name: {0}")]
    InvalidTimestamp(String),
}

/// Build a timestamp from raw components, rejecting impossible values.
pub(crate) fn checked_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<chrono::NaiveDateTime> {
    // Year 0 is not a valid calendar year for capture names
    if year < 1 {
        return None;
    }
    chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
