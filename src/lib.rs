//! shotsort - incremental exporter for game captures
//!
//! Collects screenshots and recordings made by Steam and by the Windows
//! game bar, and copies them into one tree with a folder per game:
//!
//! ```text
//! out/<game>/screenshots/<game>_<YYYYMMDDHHMMSS>.png
//! out/<game>/media/<game>_<YYYYMMDDHHMMSS>.mp4
//! ```
//!
//! # Architecture
//!
//! - Each source keeps a watermark: the newest capture time it exported
//! - A run only copies captures strictly newer than the watermark
//! - The watermark moves forward once the whole source has been walked
//!
//! # Modules
//!
//! - `adapters`: External lookups (Steam store)
//! - `config`: Source paths and state file locations
//! - `domain`: Data structures (ParsedFilename, Source, FileBucket)
//! - `export`: Export engine and output layout
//! - `gather`: Registry gathering
//! - `parse`: File name grammars
//! - `store`: Watermark and registry persistence
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Gather new names and export everything new
//! shotsort
//!
//! # Only refresh games.json, e.g. before renaming processes by hand
//! shotsort gather
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod gather;
pub mod parse;
pub mod store;

// Re-export main types at crate root for convenience
pub use adapters::{NameLookup, SteamStoreClient};
pub use config::ResolvedConfig;
pub use domain::{FileBucket, ParsedFilename, Source};
pub use export::{sanitize_filename, ExportReport, Exporter, FailedFile, FileFailure};
pub use parse::{parse_steam_filename, parse_windows_filename, ParseError};
pub use store::{GameRegistry, WatermarkStore};
