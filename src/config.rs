//! Configuration for shotsort paths and sources.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHOTSORT_STEAM_USERDATA, SHOTSORT_WINDOWS_CAPTURES, SHOTSORT_OUTPUT)
//! 2. Config file (`--config <path>`, else .shotsort/config.yaml, else the user config dir)
//! 3. Defaults (both sources disabled, state and output in the current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shotsort/config.yaml
//! - Falls back to `<config dir>/shotsort/config.yaml`
//! - Relative paths resolve against the directory holding `.shotsort/`
//!   (or the config file's own directory for any other location)
//!
//! An empty or missing source path disables that source.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub steam_store: Option<SteamStoreConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// Steam `userdata/<user id>` folder
    pub steam_userdata: Option<String>,
    /// Windows game bar capture folder
    pub windows_captures: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Game name registry file
    pub registry: Option<String>,
    /// Watermark file
    pub watermarks: Option<String>,
    /// Root of the exported tree
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamStoreConfig {
    pub language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with concrete paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Steam userdata folder, `None` when the Steam source is disabled
    pub steam_userdata: Option<PathBuf>,
    /// Windows capture folder, `None` when the Windows source is disabled
    pub windows_captures: Option<PathBuf>,
    /// Game name registry file
    pub registry_path: PathBuf,
    /// Watermark file
    pub watermark_path: PathBuf,
    /// Root of the exported tree
    pub output_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Steam store lookup settings
    pub steam_store: StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            language: "schinese".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ResolvedConfig {
    /// Steam's screenshot tree (`<userdata>/760/remote`), if Steam is enabled
    pub fn steam_remote_dir(&self) -> Option<PathBuf> {
        self.steam_userdata
            .as_ref()
            .map(|userdata| userdata.join("760").join("remote"))
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shotsort").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("shotsort").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory that relative paths in `config_path` are resolved against
fn base_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new("."));
    if parent.file_name().is_some_and(|name| name == ".shotsort") {
        parent.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

/// Resolve a path that may be relative to the config file's base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// A source path; empty or whitespace-only means "disabled"
fn source_path(base: &Path, value: Option<String>) -> Option<PathBuf> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| resolve_path(base, v.trim()))
}

/// Combine a parsed config file with environment overrides
fn resolve(
    config: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let (config_file, file) = match config {
        Some((path, file)) => (Some(path), file),
        None => (None, ConfigFile::default()),
    };
    let base = config_file
        .as_deref()
        .map(base_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = PathBuf::from(".");

    // Environment values are taken relative to the working directory
    let steam_userdata = match env("SHOTSORT_STEAM_USERDATA") {
        Some(value) => source_path(&cwd, Some(value)),
        None => source_path(&base, file.sources.steam_userdata),
    };
    let windows_captures = match env("SHOTSORT_WINDOWS_CAPTURES") {
        Some(value) => source_path(&cwd, Some(value)),
        None => source_path(&base, file.sources.windows_captures),
    };

    let path_or = |value: Option<String>, default: &str| {
        resolve_path(&base, value.as_deref().unwrap_or(default))
    };

    let output_dir = match env("SHOTSORT_OUTPUT").filter(|v| !v.trim().is_empty()) {
        Some(value) => resolve_path(&cwd, &value),
        None => path_or(file.paths.output, "out"),
    };

    let defaults = StoreSettings::default();
    let steam_store = StoreSettings {
        language: file
            .steam_store
            .as_ref()
            .and_then(|s| s.language.clone())
            .unwrap_or(defaults.language),
        timeout_seconds: file
            .steam_store
            .as_ref()
            .and_then(|s| s.timeout_seconds)
            .unwrap_or(defaults.timeout_seconds),
    };

    ResolvedConfig {
        steam_userdata,
        windows_captures,
        registry_path: path_or(file.paths.registry, "games.json"),
        watermark_path: path_or(file.paths.watermarks, "last_run.json"),
        output_dir,
        config_file,
        steam_store,
    }
}

/// Load configuration from all sources.
///
/// `explicit` is a config file named on the command line; it must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let config_path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(),
    };

    let config = match config_path {
        Some(path) => {
            let file = load_config_file(&path)?;
            tracing::debug!("Loaded config from {}", path.display());
            Some((path, file))
        }
        None => None,
    };

    Ok(resolve(config, |key| std::env::var(key).ok()))
}
