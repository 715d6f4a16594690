//! Adapter interfaces for external systems.
//!
//! Adapters resolve things the local filesystem cannot tell us, such as
//! the display name behind a Steam App ID.

pub mod steam_store;

use async_trait::async_trait;

// Re-export the Steam store adapter
pub use steam_store::{SteamStoreClient, UNKNOWN_GAME};

/// Resolves a Steam App ID to a display name
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Look up the display name for `app_id`.
    ///
    /// Never fails: implementations return a placeholder such as
    /// [`UNKNOWN_GAME`] when the name cannot be found.
    async fn lookup(&self, app_id: &str) -> String;
}
