//! HenrikDev API key storage.
//!
//! The key is looked up in three places, first hit wins:
//!
//! 1. the `HENRIKDEV_API_KEY` environment variable
//! 2. the OS keychain entry `valswitch:henrikdev` / `api_key`
//! 3. the plain-text `henrikdev_apikey.txt` left by earlier releases
//!
//! New keys are only ever written to the keychain.
//!
//! ## Usage
//!
//! ```ignore
//! use valswitch_store::ApiKeyStore;
//!
//! let keys = ApiKeyStore::new(Arc::new(SystemKeychain::new()));
//! keys.store("HDEV-xxxxx").await?;
//! let source = keys.api_key_source().await;
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use valswitch_core::StaticApiKey;
use valswitch_fetch::KeychainApi;
use valswitch_fetch::host::keychain::{accounts, services};

use crate::error::StoreError;
use crate::persistence::legacy_api_key_path;

/// Environment variable checked before the keychain.
pub const API_KEY_ENV: &str = "HENRIKDEV_API_KEY";

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyOrigin {
    /// The environment variable.
    Environment,
    /// The OS keychain.
    Keychain,
    /// The legacy plain-text file.
    LegacyFile,
}

impl fmt::Display for ApiKeyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment ({API_KEY_ENV})"),
            Self::Keychain => write!(f, "keychain"),
            Self::LegacyFile => write!(f, "legacy key file"),
        }
    }
}

/// Reads and writes the HenrikDev API key.
pub struct ApiKeyStore {
    keychain: Arc<dyn KeychainApi>,
    legacy_path: PathBuf,
    env_var: Option<&'static str>,
}

impl ApiKeyStore {
    /// Creates a store using the default legacy path and environment variable.
    pub fn new(keychain: Arc<dyn KeychainApi>) -> Self {
        Self {
            keychain,
            legacy_path: legacy_api_key_path(),
            env_var: Some(API_KEY_ENV),
        }
    }

    /// Overrides the legacy key file location.
    pub fn with_legacy_path(mut self, path: PathBuf) -> Self {
        self.legacy_path = path;
        self
    }

    /// Skips the environment variable lookup.
    pub fn without_env(mut self) -> Self {
        self.env_var = None;
        self
    }

    /// Resolves the key and reports where it was found.
    pub async fn resolve(&self) -> Option<(String, ApiKeyOrigin)> {
        if let Some(key) = self
            .env_var
            .and_then(|var| std::env::var(var).ok())
            .and_then(non_blank)
        {
            debug!("API key taken from environment");
            return Some((key, ApiKeyOrigin::Environment));
        }

        match self.keychain.get(services::HENRIKDEV, accounts::API_KEY).await {
            Ok(Some(key)) => {
                if let Some(key) = non_blank(key) {
                    debug!("API key taken from keychain");
                    return Some((key, ApiKeyOrigin::Keychain));
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Keychain lookup failed, trying legacy file"),
        }

        match tokio::fs::read_to_string(&self.legacy_path).await {
            Ok(content) => non_blank(content).map(|key| {
                debug!(path = %self.legacy_path.display(), "API key taken from legacy file");
                (key, ApiKeyOrigin::LegacyFile)
            }),
            Err(_) => None,
        }
    }

    /// Resolves the key into an [`ApiKeySource`](valswitch_core::ApiKeySource)
    /// for the rank orchestrator.
    pub async fn api_key_source(&self) -> StaticApiKey {
        StaticApiKey::new(self.resolve().await.map(|(key, _)| key))
    }

    /// Stores `key` in the keychain.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank key or a keychain failure.
    pub async fn store(&self, key: &str) -> Result<(), StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::Config("API key must not be empty".to_string()));
        }
        self.keychain
            .set(services::HENRIKDEV, accounts::API_KEY, key)
            .await?;
        info!("API key stored in keychain");
        Ok(())
    }

    /// Removes the key from the keychain and deletes the legacy file.
    ///
    /// Returns true if anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the keychain or file removal fails.
    pub async fn delete(&self) -> Result<bool, StoreError> {
        let had_entry = self
            .keychain
            .exists(services::HENRIKDEV, accounts::API_KEY)
            .await;
        if had_entry {
            self.keychain
                .delete(services::HENRIKDEV, accounts::API_KEY)
                .await?;
        }

        let had_file = match tokio::fs::remove_file(&self.legacy_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if had_entry || had_file {
            info!("API key removed");
        }
        Ok(had_entry || had_file)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use valswitch_core::ApiKeySource;
    use valswitch_fetch::MemoryKeychain;

    use super::*;

    fn keys(dir: &TempDir, keychain: &Arc<MemoryKeychain>) -> ApiKeyStore {
        ApiKeyStore::new(keychain.clone())
            .without_env()
            .with_legacy_path(dir.path().join("henrikdev_apikey.txt"))
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let dir = TempDir::new().unwrap();
        let keys = keys(&dir, &Arc::new(MemoryKeychain::new()));

        assert!(keys.resolve().await.is_none());
        assert!(keys.api_key_source().await.api_key().is_none());
    }

    #[tokio::test]
    async fn test_legacy_file_is_trimmed() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("henrikdev_apikey.txt"), "  HDEV-legacy\r\n")
            .await
            .unwrap();
        let keys = keys(&dir, &Arc::new(MemoryKeychain::new()));

        assert_eq!(
            keys.resolve().await,
            Some(("HDEV-legacy".to_string(), ApiKeyOrigin::LegacyFile))
        );
    }

    #[tokio::test]
    async fn test_keychain_wins_over_legacy_file() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("henrikdev_apikey.txt"), "HDEV-legacy")
            .await
            .unwrap();
        let keys = keys(&dir, &Arc::new(MemoryKeychain::new()));

        keys.store(" HDEV-new ").await.unwrap();
        assert_eq!(
            keys.resolve().await,
            Some(("HDEV-new".to_string(), ApiKeyOrigin::Keychain))
        );
    }

    #[tokio::test]
    async fn test_blank_key_rejected() {
        let dir = TempDir::new().unwrap();
        let keys = keys(&dir, &Arc::new(MemoryKeychain::new()));
        assert!(matches!(keys.store("   ").await, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_delete_clears_both_locations() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("henrikdev_apikey.txt");
        tokio::fs::write(&legacy, "HDEV-legacy").await.unwrap();
        let keychain = Arc::new(MemoryKeychain::new());
        let keys = keys(&dir, &keychain);
        keys.store("HDEV-new").await.unwrap();

        assert!(keys.delete().await.unwrap());
        assert!(!legacy.exists());
        assert!(keys.resolve().await.is_none());
        assert!(!keys.delete().await.unwrap());
    }
}
