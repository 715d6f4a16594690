//! Persisted state kept between runs.
//!
//! # Storage Layout
//!
//! ```text
//! ./
//! ├── games.json       # Game name registry (steam_games, process_to_name)
//! └── last_run.json    # Watermark per source
//! ```

pub mod registry;
pub mod watermark;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub use registry::GameRegistry;
pub use watermark::WatermarkStore;

/// Write `value` as pretty JSON, replacing `path` only once the new content
/// is fully on disk.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let content = serde_json::to_string_pretty(value)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
