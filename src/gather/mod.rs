//! Registry gathering.
//!
//! Scans both source folders for identifiers the registry has not seen yet
//! and records them, so the export step always has a display name to use.
//! Entries are only ever added:
//!
//! - Steam: every numeric folder under `760/remote` is an App ID; new ones
//!   are named through a [`NameLookup`].
//! - Windows: every parseable capture name contributes its process name,
//!   mapped to itself until the user edits it.
//!
//! A registry file that exists but cannot be parsed is never overwritten;
//! newly found entries are used for this run only.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::adapters::NameLookup;
use crate::parse::parse_windows_filename;
use crate::store::GameRegistry;

/// Add unseen Steam App IDs to the registry and return the Steam mapping.
///
/// A disabled source (`None`) yields an empty mapping. The registry file is
/// written only when something was added and the existing file was readable.
pub async fn gather_steam(
    registry_path: &Path,
    remote_root: Option<&Path>,
    lookup: &dyn NameLookup,
) -> Result<BTreeMap<String, String>> {
    let Some(root) = remote_root else {
        return Ok(BTreeMap::new());
    };

    let (mut registry, writable) = open_registry(registry_path);

    if !root.is_dir() {
        tracing::warn!(
            "Steam screenshot folder is missing or not a directory: {}",
            root.display()
        );
        return Ok(registry.steam_games);
    }

    let new_ids: Vec<String> = list_app_ids(root)?
        .into_iter()
        .filter(|id| !registry.steam_games.contains_key(id))
        .collect();

    if new_ids.is_empty() {
        tracing::info!("No new Steam games found");
        return Ok(registry.steam_games);
    }

    tracing::info!(
        "Found {} new Steam game(s), looking up names via {}",
        new_ids.len(),
        lookup.name()
    );
    for app_id in new_ids {
        let name = lookup.lookup(&app_id).await;
        tracing::info!("Added Steam game {} -> {}", app_id, name);
        registry.add_steam_game(app_id, name);
    }

    save_registry(&registry, registry_path, writable)?;
    Ok(registry.steam_games)
}

/// Add unseen Windows process names to the registry and return the
/// process mapping.
///
/// A disabled source (`None`) yields an empty mapping. Files whose names
/// cannot be parsed are skipped.
pub fn gather_windows(
    registry_path: &Path,
    capture_root: Option<&Path>,
) -> Result<BTreeMap<String, String>> {
    let Some(root) = capture_root else {
        return Ok(BTreeMap::new());
    };

    let (mut registry, writable) = open_registry(registry_path);

    if !root.is_dir() {
        tracing::warn!(
            "Windows capture folder is missing or not a directory: {}",
            root.display()
        );
        return Ok(registry.process_to_name);
    }

    let mut added = 0;
    for entry in fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match parse_windows_filename(&name) {
            Ok(parsed) => {
                if registry.add_process(&parsed.identity) {
                    tracing::info!("Added process {}", parsed.identity);
                    added += 1;
                }
            }
            Err(e) => tracing::warn!("Cannot parse '{}': {}, skipping", name, e),
        }
    }

    if added > 0 {
        save_registry(&registry, registry_path, writable)?;
    }

    Ok(registry.process_to_name)
}

/// Registry to gather into, and whether it may be written back
fn open_registry(path: &Path) -> (GameRegistry, bool) {
    match GameRegistry::try_load(path) {
        Ok(registry) => (registry, true),
        Err(e) => {
            tracing::warn!("{:#}; the file will be left untouched", e);
            (GameRegistry::new(), false)
        }
    }
}

fn save_registry(registry: &GameRegistry, path: &Path, writable: bool) -> Result<()> {
    if !writable {
        tracing::warn!(
            "Not saving new entries over unreadable registry {}; fix or remove it",
            path.display()
        );
        return Ok(());
    }
    registry.save(path)?;
    tracing::info!("Registry saved to {}", path.display());
    Ok(())
}

/// Names of all-digit subdirectories, sorted
fn list_app_ids(root: &Path) -> Result<Vec<String>> {
    let mut ids = Vec::new();

    for entry in fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                ids.push(name.to_string());
            }
        }
    }

    ids.sort();
    Ok(ids)
}
