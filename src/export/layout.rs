//! Output tree layout and the copy/rename step.
//!
//! ```text
//! <output>/
//! └── <display name>/
//!     ├── screenshots/<display name>_<YYYYMMDDHHMMSS>.<ext>
//!     └── media/<display name>_<YYYYMMDDHHMMSS>.<ext>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use filetime::FileTime;

use crate::domain::timestamp::format_compact;
use crate::domain::FileBucket;

/// Characters that are not allowed in Windows file names
const ILLEGAL_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace every filesystem-illegal character with `_`.
///
/// Distinct names can collapse to the same result; no attempt is made to
/// keep them apart.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Compute where a capture is exported to, without touching the disk.
pub fn destination_path(
    output_root: &Path,
    display_name: &str,
    timestamp: &NaiveDateTime,
    bucket: FileBucket,
    source_file: &Path,
) -> PathBuf {
    let extension = source_file
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let new_name = format!("{}_{}{}", display_name, format_compact(timestamp), extension);

    output_root
        .join(sanitize_filename(display_name))
        .join(bucket.dir_name())
        .join(sanitize_filename(&new_name))
}

/// Copy `source_file` into the output tree under its new name.
///
/// Creates directories as needed and silently replaces an existing file at
/// the destination. Permissions and access/modification times are carried
/// over to the copy.
pub fn copy_and_rename(
    source_file: &Path,
    display_name: &str,
    timestamp: &NaiveDateTime,
    bucket: FileBucket,
    output_root: &Path,
) -> Result<PathBuf> {
    let target = destination_path(output_root, display_name, timestamp, bucket, source_file);

    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    // fs::copy also copies permission bits
    fs::copy(source_file, &target).with_context(|| {
        format!(
            "Failed to copy {} -> {}",
            source_file.display(),
            target.display()
        )
    })?;

    let metadata = fs::metadata(source_file)
        .with_context(|| format!("Failed to stat {}", source_file.display()))?;
    filetime::set_file_times(
        &target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .with_context(|| format!("Failed to set file times on {}", target.display()))?;

    tracing::info!("Copied {} -> {}", source_file.display(), target.display());

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_sanitize_replaces_each_illegal_char() {
        assert_eq!(sanitize_filename(r#"a\b/c*d?e:f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("Half-Life 2: Episode One"), "Half-Life 2_ Episode One");
        assert_eq!(sanitize_filename("普通的名字 (2024)"), "普通的名字 (2024)");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["What? Why: <Now>", "plain", "", "|||"] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_destination_path() {
        let dest = destination_path(
            Path::new("out"),
            "Test Game",
            &ts(),
            FileBucket::Screenshots,
            Path::new("/steam/12345/screenshots/20230101123000_1.jpg"),
        );
        assert_eq!(
            dest,
            PathBuf::from("out/Test Game/screenshots/Test Game_20230101123000.jpg")
        );
    }

    #[test]
    fn test_destination_sanitizes_name_and_keeps_extension_case() {
        let dest = destination_path(
            Path::new("out"),
            "Portal: Revolution",
            &ts(),
            FileBucket::Media,
            Path::new("clip.MP4"),
        );
        assert_eq!(
            dest,
            PathBuf::from("out/Portal_ Revolution/media/Portal_ Revolution_20230101123000.MP4")
        );
    }

    #[test]
    fn test_copy_overwrites_and_keeps_mtime() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("20230101123000_1.jpg");
        std::fs::write(&src, b"first").unwrap();
        let mtime = FileTime::from_unix_time(1_672_576_200, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();

        let out = temp.path().join("out");
        let target = copy_and_rename(&src, "Test Game", &ts(), FileBucket::Screenshots, &out).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"first");
        let copied = std::fs::metadata(&target).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), mtime);

        std::fs::write(&src, b"second").unwrap();
        let again = copy_and_rename(&src, "Test Game", &ts(), FileBucket::Screenshots, &out).unwrap();
        assert_eq!(again, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"second");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = copy_and_rename(
            &temp.path().join("gone.png"),
            "Game",
            &ts(),
            FileBucket::Screenshots,
            &temp.path().join("out"),
        );
        assert!(result.is_err());
    }
}
