//! Timestamp formats used in file names and the watermark file.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use std::time::SystemTime;

/// Format stored in the watermark file (`2023-01-01 12:30:00`)
pub const WATERMARK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format embedded in exported file names (`20230101123000`)
pub const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";

/// Watermark used when a source has never been exported
pub const FLOOR: NaiveDateTime = NaiveDateTime::MIN;

/// Render a timestamp the way the watermark file stores it
pub fn format_watermark(ts: &NaiveDateTime) -> String {
    ts.format(WATERMARK_FORMAT).to_string()
}

/// Parse a stored watermark value
pub fn parse_watermark(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, WATERMARK_FORMAT).ok()
}

/// Render a timestamp for use in an output file name
pub fn format_compact(ts: &NaiveDateTime) -> String {
    ts.format(COMPACT_FORMAT).to_string()
}

/// Convert a filesystem time to local wall-clock time, dropping sub-second
/// precision so it compares cleanly against stored watermarks.
pub fn from_system_time(time: SystemTime) -> NaiveDateTime {
    let local: DateTime<Local> = time.into();
    let naive = local.naive_local();
    naive.with_nanosecond(0).unwrap_or(naive)
}
