//! User preferences store.
//!
//! Manages user settings with persistence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use valswitch_core::Region;

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Upper bound for concurrent rank fetches.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server region used when an account has none stored.
    pub default_region: Region,

    /// How many rank fetches `update_all` runs at once.
    pub max_concurrent_fetches: usize,

    /// Attempts per rank fetch.
    pub max_retries: u32,

    /// Extra Riot Client install paths probed after the built-in ones.
    pub extra_client_paths: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_region: Region::FALLBACK,
            max_concurrent_fetches: 4,
            max_retries: 3,
            extra_client_paths: Vec::new(),
        }
    }
}

impl Settings {
    /// Returns the fetch concurrency clamped to `1..=8`.
    pub fn fetch_concurrency(&self) -> usize {
        self.max_concurrent_fetches.clamp(1, MAX_CONCURRENT_FETCHES)
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path. A missing or unreadable file yields
    /// defaults.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for callers that chain `?`.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = match load_json::<Settings>(&path).await {
            Ok(settings) => {
                info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        })
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the default server region.
    pub async fn default_region(&self) -> Region {
        self.settings.read().await.default_region
    }

    /// Sets the default server region.
    pub async fn set_default_region(&self, region: Region) {
        self.update(|s| s.default_region = region).await;
    }
}
