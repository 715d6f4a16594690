//! Last-processed timestamp per source.
//!
//! The file is a single JSON object keyed by source name:
//!
//! ```json
//! { "steam": "2023-01-01 12:30:00", "windows": "2023-03-15 09:00:00" }
//! ```
//!
//! There is no locking; concurrent runs race and the last writer wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::domain::timestamp::{self, FLOOR};
use crate::domain::Source;

/// JSON-file backed watermark store
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    /// Open the store at `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the watermark for `source`.
    ///
    /// Missing files, missing keys and unparseable values all yield
    /// [`FLOOR`], so every capture is newer than it.
    pub fn load(&self, source: Source) -> NaiveDateTime {
        self.read_document()
            .ok()
            .and_then(|doc| {
                doc.get(source.key())
                    .and_then(Value::as_str)
                    .and_then(timestamp::parse_watermark)
            })
            .unwrap_or(FLOOR)
    }

    /// Persist `ts` for `source`, keeping every other source's entry.
    pub fn save(&self, source: Source, ts: NaiveDateTime) -> Result<()> {
        let mut doc = match self.read_document() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    "Cannot parse {}, rewriting it: {:#}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
        };

        doc.insert(
            source.key().to_string(),
            Value::String(timestamp::format_watermark(&ts)),
        );

        super::write_json_atomic(&self.path, &doc)
            .with_context(|| format!("Failed to save watermark for {}", source))
    }

    /// Read the whole document. A missing file is an empty document.
    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}
