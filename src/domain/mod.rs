//! Domain types shared across parsing, persistence and export.
//!
//! - Capture: parsed file metadata, sources and output buckets
//! - Timestamp: the formats timestamps take on disk

pub mod capture;
pub mod timestamp;

// Re-export commonly used types
pub use capture::{FileBucket, ParsedFilename, Source, SCREENSHOT_EXTENSIONS, VIDEO_EXTENSIONS};
