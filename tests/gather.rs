//! Gather Integration Tests
//!
//! Registry gathering with a fake name lookup, and the gather-then-export
//! flow the CLI runs by default.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shotsort::adapters::UNKNOWN_GAME;
use shotsort::gather::{gather_steam, gather_windows};
use shotsort::{Exporter, GameRegistry, NameLookup, WatermarkStore};
use tempfile::TempDir;

/// Lookup backed by a fixed table, counting calls
struct FakeLookup {
    names: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeLookup {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            names: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameLookup for FakeLookup {
    fn name(&self) -> &str {
        "fake"
    }

    async fn lookup(&self, app_id: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names
            .get(app_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_GAME.to_string())
    }
}

#[tokio::test]
async fn test_gather_steam_looks_up_only_new_ids() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    for dir in ["570", "12345", "ugc"] {
        std::fs::create_dir_all(remote.join(dir)).unwrap();
    }

    let registry_path = temp.path().join("games.json");
    std::fs::write(
        &registry_path,
        r#"{"steam_games": {"570": "Dota 2"}, "process_to_name": {"MyGame": "My Game"}}"#,
    )
    .unwrap();

    let lookup = FakeLookup::new(&[("12345", "Test Game")]);
    let games = gather_steam(&registry_path, Some(remote.as_path()), &lookup)
        .await
        .unwrap();

    assert_eq!(lookup.calls(), 1);
    assert_eq!(games.len(), 2);
    assert_eq!(games["12345"], "Test Game");
    assert_eq!(games["570"], "Dota 2");

    let saved = GameRegistry::load(&registry_path);
    assert_eq!(saved.steam_name("12345"), Some("Test Game"));
    assert_eq!(saved.process_name("MyGame"), Some("My Game"));
}

#[tokio::test]
async fn test_gather_steam_placeholder_name_is_kept() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    std::fs::create_dir_all(remote.join("4242")).unwrap();
    let registry_path = temp.path().join("games.json");

    let lookup = FakeLookup::new(&[]);
    let games = gather_steam(&registry_path, Some(remote.as_path()), &lookup)
        .await
        .unwrap();
    assert_eq!(games["4242"], UNKNOWN_GAME);

    // Known now, so a second gather does not ask again
    gather_steam(&registry_path, Some(remote.as_path()), &lookup)
        .await
        .unwrap();
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_gather_steam_disabled_and_missing_root() {
    let temp = TempDir::new().unwrap();
    let registry_path = temp.path().join("games.json");
    std::fs::write(&registry_path, r#"{"steam_games": {"570": "Dota 2"}}"#).unwrap();
    let lookup = FakeLookup::new(&[]);

    let disabled = gather_steam(&registry_path, None, &lookup).await.unwrap();
    assert!(disabled.is_empty());

    let missing = temp.path().join("no-such-dir");
    let existing = gather_steam(&registry_path, Some(missing.as_path()), &lookup)
        .await
        .unwrap();
    assert_eq!(existing.len(), 1);
    assert_eq!(lookup.calls(), 0);
}

#[test]
fn test_gather_then_export_windows() {
    let temp = TempDir::new().unwrap();
    let captures = temp.path().join("captures");
    std::fs::create_dir_all(&captures).unwrap();
    std::fs::write(captures.join("Hades 2023_08_01 20_15_30.png"), b"png").unwrap();
    std::fs::write(captures.join("Hades 2023_08_01 20_16_00.mp4"), b"mp4").unwrap();

    let registry_path = temp.path().join("games.json");
    let processes = gather_windows(&registry_path, Some(captures.as_path())).unwrap();

    let exporter = Exporter::new(
        temp.path().join("out"),
        WatermarkStore::new(temp.path().join("last_run.json")),
    );
    let report = exporter
        .export_windows(Some(captures.as_path()), &processes)
        .unwrap();

    assert_eq!(report.exported.len(), 2);
    assert!(report.failed.is_empty());
    let game_dir = temp.path().join("out").join("Hades");
    assert!(game_dir.join("screenshots").join("Hades_20230801201530.png").is_file());
    assert!(game_dir.join("media").join("Hades_20230801201600.mp4").is_file());
}

#[tokio::test]
async fn test_malformed_registry_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let captures = temp.path().join("captures");
    std::fs::create_dir_all(&captures).unwrap();
    std::fs::write(captures.join("NewGame 2023_03_15 09_00_00.png"), b"png").unwrap();
    let remote = temp.path().join("remote");
    std::fs::create_dir_all(remote.join("4242")).unwrap();

    // Trailing comma: not valid JSON, but full of hand-edited entries
    let registry_path = temp.path().join("games.json");
    let original =
        r#"{"steam_games": {"570": "Dota 2"}, "process_to_name": {"MyGame": "My Game",}}"#;
    std::fs::write(&registry_path, original).unwrap();

    let processes = gather_windows(&registry_path, Some(captures.as_path())).unwrap();
    assert_eq!(processes["NewGame"], "NewGame");

    let lookup = FakeLookup::new(&[("4242", "Answer")]);
    let games = gather_steam(&registry_path, Some(remote.as_path()), &lookup)
        .await
        .unwrap();
    assert_eq!(games["4242"], "Answer");

    assert_eq!(std::fs::read_to_string(&registry_path).unwrap(), original);
}
