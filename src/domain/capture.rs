//! Capture files and the sources they come from.

use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;

/// Extensions exported into the `screenshots` bucket
pub const SCREENSHOT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "jxr", "gif"];

/// Extensions exported into the `media` bucket
pub const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "avi", "mov", "mkv"];

/// Where a capture came from. Each source keeps its own watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Steam's `userdata/<id>/760/remote` screenshot tree
    Steam,

    /// The Windows game bar capture folder
    Windows,
}

impl Source {
    /// Key used for this source in the watermark file
    pub fn key(&self) -> &'static str {
        match self {
            Source::Steam => "steam",
            Source::Windows => "windows",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Output subdirectory a capture is sorted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileBucket {
    Screenshots,
    Media,
}

impl FileBucket {
    /// Directory name under the game folder
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileBucket::Screenshots => "screenshots",
            FileBucket::Media => "media",
        }
    }

    /// Classify a file by its extension (case-insensitive).
    ///
    /// Returns `None` for anything that is neither a known image nor video type.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        if SCREENSHOT_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileBucket::Screenshots)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileBucket::Media)
        } else {
            None
        }
    }
}

impl fmt::Display for FileBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.dir_name())
    }
}

/// Metadata recovered from a capture's file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Process or window name the capture was taken from
    pub identity: String,

    /// Capture time, local, second precision
    pub timestamp: NaiveDateTime,

    /// The file name the metadata was parsed from
    pub raw_filename: String,
}
