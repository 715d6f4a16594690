//! Incremental export of captures into the per-game output tree.
//!
//! One pass per source:
//!
//! ```text
//! source tree → parse name → newer than watermark? → copy/rename
//!                                                      ↓
//!                                  max exported timestamp → watermark
//! ```
//!
//! The watermark is written only after the whole walk finishes, so an
//! interrupted run leaves it untouched and a retry re-copies the same files.

pub mod layout;
pub mod steam;
pub mod windows;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::timestamp::format_watermark;
use crate::domain::{FileBucket, Source};
use crate::parse::ParseError;
use crate::store::WatermarkStore;

pub use layout::{copy_and_rename, destination_path, sanitize_filename};

/// Why a single file was not exported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileFailure {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no display name registered for '{0}'")]
    UnknownIdentity(String),
}

/// A file that could not be exported, kept for end-of-run reporting
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: FileFailure,
}

/// A file that was copied into the output tree
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub source_path: PathBuf,
    pub destination: PathBuf,
    pub display_name: String,
    pub timestamp: NaiveDateTime,
}

/// Outcome of exporting one source
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub source: Source,

    /// Watermark in effect when the run started
    pub previous_watermark: NaiveDateTime,

    /// Watermark written by this run, if any file was exported
    pub new_watermark: Option<NaiveDateTime>,

    pub exported: Vec<ExportedFile>,

    /// Files skipped because they are not newer than the watermark
    pub stale: usize,

    /// Files skipped because of an unrecognized extension
    pub unsupported: usize,

    /// Steam screenshot-folder files whose names are not Steam captures
    pub unmatched: usize,

    pub failed: Vec<FailedFile>,
}

impl ExportReport {
    fn new(source: Source, previous_watermark: NaiveDateTime) -> Self {
        Self {
            source,
            previous_watermark,
            new_watermark: None,
            exported: Vec::new(),
            stale: 0,
            unsupported: 0,
            unmatched: 0,
            failed: Vec::new(),
        }
    }

    /// Check if any file failed to export
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Shared state for exporting any source
#[derive(Debug, Clone)]
pub struct Exporter {
    output_root: PathBuf,
    watermarks: WatermarkStore,
}

impl Exporter {
    /// Create an exporter writing below `output_root`
    pub fn new(output_root: impl Into<PathBuf>, watermarks: WatermarkStore) -> Self {
        Self {
            output_root: output_root.into(),
            watermarks,
        }
    }

    /// Root of the output tree
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Watermark store backing this exporter
    pub fn watermarks(&self) -> &WatermarkStore {
        &self.watermarks
    }

    /// Report for a run that walked nothing: disabled source or missing root
    fn empty_report(&self, source: Source) -> ExportReport {
        ExportReport::new(source, self.watermarks.load(source))
    }

    /// Start a run for `source`. Returns `None` when the source root does
    /// not exist, which is not an error.
    fn begin(&self, source: Source, root: &Path) -> Result<Option<RunWatermark>> {
        if !root.is_dir() {
            tracing::warn!(
                "{} source folder is missing or not a directory: {}",
                source,
                root.display()
            );
            return Ok(None);
        }

        fs::create_dir_all(&self.output_root).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_root.display()
            )
        })?;

        let previous = self.watermarks.load(source);
        tracing::info!(
            "Exporting {} captures newer than {}",
            source,
            format_watermark(&previous)
        );

        Ok(Some(RunWatermark::new(source, previous)))
    }

    /// Copy one file and record it in the report and watermark
    fn export_file(
        &self,
        run: &mut RunWatermark,
        report: &mut ExportReport,
        path: &Path,
        display_name: &str,
        timestamp: NaiveDateTime,
        bucket: FileBucket,
    ) -> Result<()> {
        let destination =
            copy_and_rename(path, display_name, &timestamp, bucket, &self.output_root)?;
        run.observe(timestamp);
        report.exported.push(ExportedFile {
            source_path: path.to_path_buf(),
            destination,
            display_name: display_name.to_string(),
            timestamp,
        });
        Ok(())
    }

    /// Persist the run's watermark and close out the report
    fn finish(&self, run: RunWatermark, mut report: ExportReport) -> Result<ExportReport> {
        report.new_watermark = run.commit(&self.watermarks)?;

        match report.new_watermark {
            Some(ts) => tracing::info!(
                "{} export done: {} file(s), watermark now {}",
                report.source,
                report.exported.len(),
                format_watermark(&ts)
            ),
            None => tracing::info!(
                "No new {} captures, watermark unchanged",
                report.source
            ),
        }

        for failed in &report.failed {
            tracing::warn!("Failed: {} ({})", failed.path.display(), failed.reason);
        }

        Ok(report)
    }
}

/// Tracks the newest exported timestamp during one run
#[derive(Debug, Clone)]
struct RunWatermark {
    source: Source,
    previous: NaiveDateTime,
    latest: NaiveDateTime,
}

impl RunWatermark {
    fn new(source: Source, previous: NaiveDateTime) -> Self {
        Self {
            source,
            previous,
            latest: previous,
        }
    }

    /// Whether a capture taken at `ts` still needs exporting
    fn is_new(&self, ts: NaiveDateTime) -> bool {
        ts > self.previous
    }

    fn observe(&mut self, ts: NaiveDateTime) {
        if ts > self.latest {
            self.latest = ts;
        }
    }

    /// Save the watermark if it moved forward. Never writes an equal or
    /// earlier value.
    fn commit(self, store: &WatermarkStore) -> Result<Option<NaiveDateTime>> {
        if self.latest > self.previous {
            store.save(self.source, self.latest)?;
            Ok(Some(self.latest))
        } else {
            Ok(None)
        }
    }
}

/// Regular files directly inside `dir`, sorted by path
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
