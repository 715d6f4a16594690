//! Windows capture export.
//!
//! Every file directly inside the capture folder is named
//! `<process> <date> <time>.<ext>`. The process name is mapped to a display
//! name through the registry and the extension decides the output bucket.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use super::{list_files, ExportReport, Exporter, FailedFile, FileFailure};
use crate::domain::{FileBucket, Source};
use crate::parse::parse_windows_filename;

impl Exporter {
    /// Export Windows captures whose process is known in `process_to_name`.
    ///
    /// `capture_root` of `None` means the Windows source is disabled.
    /// Unparseable names and unknown processes are collected in
    /// [`ExportReport::failed`] and never abort the run; copy errors do.
    pub fn export_windows(
        &self,
        capture_root: Option<&Path>,
        process_to_name: &BTreeMap<String, String>,
    ) -> Result<ExportReport> {
        let source = Source::Windows;

        let Some(root) = capture_root else {
            tracing::debug!("Windows source disabled");
            return Ok(self.empty_report(source));
        };

        let Some(mut run) = self.begin(source, root)? else {
            return Ok(self.empty_report(source));
        };
        let mut report = ExportReport::new(source, run.previous);

        for path in list_files(root)? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let parsed = match parse_windows_filename(&name) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Cannot parse '{}': {}", name, e);
                    report.failed.push(FailedFile {
                        path,
                        reason: FileFailure::from(e),
                    });
                    continue;
                }
            };

            let Some(display_name) = process_to_name.get(parsed.identity.trim()) else {
                tracing::warn!("No display name for '{}' ({})", parsed.identity, name);
                report.failed.push(FailedFile {
                    path,
                    reason: FileFailure::UnknownIdentity(parsed.identity),
                });
                continue;
            };

            if !run.is_new(parsed.timestamp) {
                tracing::debug!("'{}' is not newer than the watermark, skipping", name);
                report.stale += 1;
                continue;
            }

            let Some(bucket) = FileBucket::from_extension(&path) else {
                tracing::warn!("Unknown file type: {}, skipping", name);
                report.unsupported += 1;
                continue;
            };

            self.export_file(
                &mut run,
                &mut report,
                &path,
                display_name,
                parsed.timestamp,
                bucket,
            )?;
        }

        self.finish(run, report)
    }
}
