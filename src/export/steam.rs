//! Steam export.
//!
//! ```text
//! <userdata>/760/remote/
//! └── <App ID>/
//!     ├── screenshots/20230101123000_1.jpg   # timestamp from the name
//!     └── media/clip.mp4                     # timestamp from mtime
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use super::{list_files, ExportReport, Exporter};
use crate::domain::timestamp::from_system_time;
use crate::domain::{FileBucket, Source};
use crate::parse::parse_steam_filename;

impl Exporter {
    /// Export Steam screenshots and recordings for every App ID in `steam_games`.
    ///
    /// `remote_root` is Steam's `760/remote` folder; `None` means the Steam
    /// source is disabled and nothing happens. App IDs without a folder on
    /// disk are skipped.
    pub fn export_steam(
        &self,
        remote_root: Option<&Path>,
        steam_games: &BTreeMap<String, String>,
    ) -> Result<ExportReport> {
        let source = Source::Steam;

        let Some(root) = remote_root else {
            tracing::debug!("Steam source disabled");
            return Ok(self.empty_report(source));
        };

        let Some(mut run) = self.begin(source, root)? else {
            return Ok(self.empty_report(source));
        };
        let mut report = ExportReport::new(source, run.previous);

        for (app_id, game_name) in steam_games {
            let game_dir = root.join(app_id);
            if !game_dir.exists() {
                tracing::debug!("No folder for {} ({}), skipping", game_name, app_id);
                continue;
            }
            tracing::info!("Processing {} (App ID {})", game_name, app_id);

            let screenshots_dir = game_dir.join(FileBucket::Screenshots.dir_name());
            if screenshots_dir.is_dir() {
                for path in list_files(&screenshots_dir)? {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();

                    let timestamp = match parse_steam_filename(&name) {
                        Ok(ts) => ts,
                        Err(e) => {
                            tracing::debug!("Skipping {}: {}", path.display(), e);
                            report.unmatched += 1;
                            continue;
                        }
                    };

                    if !run.is_new(timestamp) {
                        report.stale += 1;
                        continue;
                    }

                    self.export_file(
                        &mut run,
                        &mut report,
                        &path,
                        game_name,
                        timestamp,
                        FileBucket::Screenshots,
                    )?;
                }
            }

            // Recordings carry no timestamp in their names; use each file's mtime
            let media_dir = game_dir.join(FileBucket::Media.dir_name());
            if media_dir.is_dir() {
                for path in list_files(&media_dir)? {
                    let modified = std::fs::metadata(&path)
                        .and_then(|m| m.modified())
                        .with_context(|| format!("Failed to read mtime of {}", path.display()))?;
                    let timestamp = from_system_time(modified);

                    if !run.is_new(timestamp) {
                        report.stale += 1;
                        continue;
                    }

                    self.export_file(
                        &mut run,
                        &mut report,
                        &path,
                        game_name,
                        timestamp,
                        FileBucket::Media,
                    )?;
                }
            }
        }

        self.finish(run, report)
    }
}
