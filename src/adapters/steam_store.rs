//! Steam store API adapter for resolving App IDs to game names.
//!
//! Uses the public `appdetails` endpoint, which answers with an object
//! keyed by App ID:
//!
//! ```json
//! { "570": { "success": true, "data": { "name": "Dota 2" } } }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::NameLookup;

/// Placeholder name used whenever a lookup fails
pub const UNKNOWN_GAME: &str = "Unknown Game";

const APPDETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// Steam store API client
pub struct SteamStoreClient {
    /// Store language code (e.g. `english`, `schinese`)
    language: String,
    /// HTTP client
    client: reqwest::Client,
}

/// One entry of the appdetails response
#[derive(Debug, Deserialize)]
struct AppDetails {
    #[serde(default)]
    success: bool,
    data: Option<AppData>,
}

#[derive(Debug, Deserialize)]
struct AppData {
    name: String,
}

impl SteamStoreClient {
    /// Create a client that asks for names in `language`
    pub fn new(language: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            language: language.into(),
            client,
        })
    }

    /// Build API URL
    fn api_url(&self, app_id: &str) -> String {
        format!("{}?appids={}&l={}", APPDETAILS_URL, app_id, self.language)
    }

    /// Fetch the name, surfacing every failure as an error
    async fn fetch_name(&self, app_id: &str) -> Result<String> {
        let response = self
            .client
            .get(self.api_url(app_id))
            .send()
            .await
            .context("Failed to reach Steam store")?
            .error_for_status()
            .context("Steam store returned an error status")?;

        let body: HashMap<String, AppDetails> = response
            .json()
            .await
            .context("Failed to parse Steam store response")?;

        extract_name(body, app_id)
    }
}

/// Pull the game name for `app_id` out of a decoded response
fn extract_name(mut body: HashMap<String, AppDetails>, app_id: &str) -> Result<String> {
    let details = body
        .remove(app_id)
        .with_context(|| format!("No entry for App ID {} in response", app_id))?;

    if !details.success {
        anyhow::bail!("Steam store has no details for App ID {}", app_id);
    }

    details
        .data
        .map(|d| d.name)
        .with_context(|| format!("Missing data for App ID {}", app_id))
}

#[async_trait]
impl NameLookup for SteamStoreClient {
    fn name(&self) -> &str {
        "steam-store"
    }

    async fn lookup(&self, app_id: &str) -> String {
        match self.fetch_name(app_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Failed to look up name for App ID {}: {:#}", app_id, e);
                UNKNOWN_GAME.to_string()
            }
        }
    }
}
