//! Command-line interface for shotsort.
//!
//! Without a subcommand, gathers new names into the registry and exports
//! both sources (Windows first, then Steam).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::SteamStoreClient;
use crate::config::{load_config, ResolvedConfig};
use crate::domain::timestamp::{format_watermark, FLOOR};
use crate::domain::Source;
use crate::export::{ExportReport, Exporter};
use crate::gather::{gather_steam, gather_windows};
use crate::store::WatermarkStore;

/// shotsort - sort Steam and Windows game captures into per-game folders
#[derive(Parser, Debug)]
#[command(name = "shotsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: search for .shotsort/config.yaml)
    #[arg(short, long, global = true, env = "SHOTSORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Only update the game name registry, do not export
    Gather,

    /// Show resolved configuration
    Config,

    /// Show the stored watermark of each source
    Watermarks,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = load_config(self.config.as_deref())?;

        match self.command {
            None => run_all(&cfg).await,
            Some(Commands::Gather) => gather_all(&cfg).await,
            Some(Commands::Config) => {
                show_config(&cfg);
                Ok(())
            }
            Some(Commands::Watermarks) => {
                show_watermarks(&cfg);
                Ok(())
            }
        }
    }
}

fn store_client(cfg: &ResolvedConfig) -> Result<SteamStoreClient> {
    SteamStoreClient::new(
        cfg.steam_store.language.clone(),
        Duration::from_secs(cfg.steam_store.timeout_seconds),
    )
}

/// Gather then export both sources
async fn run_all(cfg: &ResolvedConfig) -> Result<()> {
    let exporter = Exporter::new(
        cfg.output_dir.clone(),
        WatermarkStore::new(cfg.watermark_path.clone()),
    );
    let steam_root = cfg.steam_remote_dir();

    let processes = gather_windows(&cfg.registry_path, cfg.windows_captures.as_deref())?;
    let report = exporter.export_windows(cfg.windows_captures.as_deref(), &processes)?;
    print_report(&report);

    let client = store_client(cfg)?;
    let games = gather_steam(&cfg.registry_path, steam_root.as_deref(), &client).await?;
    let report = exporter.export_steam(steam_root.as_deref(), &games)?;
    print_report(&report);

    Ok(())
}

/// Update the registry for both sources without exporting
async fn gather_all(cfg: &ResolvedConfig) -> Result<()> {
    let processes = gather_windows(&cfg.registry_path, cfg.windows_captures.as_deref())?;

    let client = store_client(cfg)?;
    let steam_root = cfg.steam_remote_dir();
    let games = gather_steam(&cfg.registry_path, steam_root.as_deref(), &client).await?;

    println!(
        "Registry {}: {} Steam game(s), {} process name(s)",
        cfg.registry_path.display(),
        games.len(),
        processes.len()
    );

    Ok(())
}

fn print_report(report: &ExportReport) {
    let watermark = match report.new_watermark {
        Some(ts) => format!("advanced to {}", format_watermark(&ts)),
        None => "unchanged".to_string(),
    };

    println!(
        "[{}] exported {}, not newer {}, unsupported {}, unmatched {}, failed {}; watermark {}",
        report.source,
        report.exported.len(),
        report.stale,
        report.unsupported,
        report.unmatched,
        report.failed.len(),
        watermark
    );

    for failed in &report.failed {
        println!("  FAILED {}: {}", failed.path.display(), failed.reason);
    }
}

fn show_config(cfg: &ResolvedConfig) {
    let source = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string())
    };

    println!("Shotsort Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Sources:");
    println!("  Steam userdata:   {}", source(&cfg.steam_userdata));
    println!("  Steam screenshots: {}", source(&cfg.steam_remote_dir()));
    println!("  Windows captures: {}", source(&cfg.windows_captures));
    println!();
    println!("Paths:");
    println!("  Registry:   {}", cfg.registry_path.display());
    println!("  Watermarks: {}", cfg.watermark_path.display());
    println!("  Output:     {}", cfg.output_dir.display());
    println!();
    println!("Steam store:");
    println!("  Language: {}", cfg.steam_store.language);
    println!("  Timeout:  {}s", cfg.steam_store.timeout_seconds);
}

fn show_watermarks(cfg: &ResolvedConfig) {
    let store = WatermarkStore::new(cfg.watermark_path.clone());

    println!("{:<10} {:<20}", "SOURCE", "LAST EXPORTED");
    println!("{}", "-".repeat(32));

    for source in [Source::Steam, Source::Windows] {
        let ts = store.load(source);
        let shown = if ts == FLOOR {
            "(never)".to_string()
        } else {
            format_watermark(&ts)
        };
        println!("{:<10} {:<20}", source, shown);
    }
}
