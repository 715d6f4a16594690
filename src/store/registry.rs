//! Game name registry.
//!
//! Maps raw identifiers to display names, one table per source:
//!
//! ```json
//! {
//!     "steam_games": { "12345": "Test Game" },
//!     "process_to_name": { "MyGame": "My Game" }
//! }
//! ```
//!
//! Entries are only ever added. Users edit `process_to_name` by hand to
//! give processes nicer names.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registry document as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRegistry {
    /// Steam App ID -> display name
    #[serde(default)]
    pub steam_games: BTreeMap<String, String>,

    /// Windows process / window name -> display name
    #[serde(default)]
    pub process_to_name: BTreeMap<String, String>,

    /// Any other top-level keys, kept so saving does not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from `path`.
    ///
    /// A missing or unparseable file yields an empty registry.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("Ignoring unreadable registry: {:#}", e);
                Self::new()
            }
        }
    }

    /// Load the registry from `path`, failing on an unreadable or
    /// unparseable file. A missing file is an empty registry.
    ///
    /// Use this before writing back, so a broken file is never replaced
    /// by an empty view of it.
    pub fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        Self::read(path)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry: {}", path.display()))
    }

    /// Save the registry to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        super::write_json_atomic(path, self)
            .with_context(|| format!("Failed to save registry: {}", path.display()))
    }

    /// Display name for a Steam App ID
    pub fn steam_name(&self, app_id: &str) -> Option<&str> {
        self.steam_games.get(app_id).map(String::as_str)
    }

    /// Display name for a Windows process name (surrounding whitespace ignored)
    pub fn process_name(&self, process: &str) -> Option<&str> {
        self.process_to_name.get(process.trim()).map(String::as_str)
    }

    /// Record a Steam App ID. Returns `false` if it was already known.
    pub fn add_steam_game(&mut self, app_id: impl Into<String>, name: impl Into<String>) -> bool {
        let app_id = app_id.into();
        if self.steam_games.contains_key(&app_id) {
            return false;
        }
        self.steam_games.insert(app_id, name.into());
        true
    }

    /// Record a process name mapped to itself. Returns `false` if it was already known.
    pub fn add_process(&mut self, process: &str) -> bool {
        let process = process.trim();
        if self.process_to_name.contains_key(process) {
            return false;
        }
        self.process_to_name
            .insert(process.to_string(), process.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = GameRegistry::load(&temp.path().join("games.json"));
        assert_eq!(registry, GameRegistry::new());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("games.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(GameRegistry::load(&path).steam_games.is_empty());
    }

    #[test]
    fn test_try_load_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("games.json");
        assert_eq!(GameRegistry::try_load(&path).unwrap(), GameRegistry::new());

        std::fs::write(&path, r#"{"steam_games": {"570": "Dota 2",}}"#).unwrap();
        assert!(GameRegistry::try_load(&path).is_err());
    }

    #[test]
    fn test_partial_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("games.json");
        std::fs::write(&path, r#"{"steam_games": {"12345": "Test Game"}}"#).unwrap();

        let registry = GameRegistry::load(&path);
        assert_eq!(registry.steam_name("12345"), Some("Test Game"));
        assert!(registry.process_to_name.is_empty());
    }

    #[test]
    fn test_save_roundtrip_keeps_unknown_keys_and_unicode() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("games.json");
        std::fs::write(
            &path,
            r#"{"steam_games": {}, "process_to_name": {}, "comment": "hand edited"}"#,
        )
        .unwrap();

        let mut registry = GameRegistry::load(&path);
        registry.add_steam_game("570", "刀塔2");
        registry.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("刀塔2"));
        assert!(raw.contains("hand edited"));

        let reloaded = GameRegistry::load(&path);
        assert_eq!(reloaded.steam_name("570"), Some("刀塔2"));
        assert_eq!(reloaded.extra["comment"], "hand edited");
    }

    #[test]
    fn test_additions_never_overwrite() {
        let mut registry = GameRegistry::new();
        assert!(registry.add_steam_game("1", "First"));
        assert!(!registry.add_steam_game("1", "Second"));
        assert_eq!(registry.steam_name("1"), Some("First"));

        registry
            .process_to_name
            .insert("MyGame".to_string(), "My Game".to_string());
        assert!(!registry.add_process(" MyGame "));
        assert_eq!(registry.process_name("MyGame "), Some("My Game"));
        assert!(registry.add_process("Other"));
        assert_eq!(registry.process_name("Other"), Some("Other"));
    }
}
