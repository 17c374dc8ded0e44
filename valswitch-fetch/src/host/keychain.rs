//! Secure credential storage using the system keychain.
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Entries are always scoped to the logged-in OS user, which is what the
//! credential vault relies on for its master secret.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::KeychainError;

/// Service name prefix for Valswitch credentials.
const SERVICE_PREFIX: &str = "valswitch";

// ============================================================================
// Keychain API Trait
// ============================================================================

/// API for secure credential storage.
#[async_trait]
pub trait KeychainApi: Send + Sync {
    /// Get a credential from the keychain.
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - Credential found
    /// * `Ok(None)` - Credential not found
    /// * `Err(e)` - Error accessing keychain
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError>;

    /// Set a credential in the keychain.
    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError>;

    /// Delete a credential from the keychain. Missing entries are not an error.
    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError>;

    /// Check if a credential exists.
    async fn exists(&self, service: &str, account: &str) -> bool {
        matches!(self.get(service, account).await, Ok(Some(_)))
    }
}

// ============================================================================
// System Keychain Implementation
// ============================================================================

/// Default implementation using the system keychain via `keyring`.
#[derive(Debug, Clone, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    /// Creates a new system keychain instance.
    pub fn new() -> Self {
        Self
    }

    /// Builds the full service name with prefix.
    fn full_service(service: &str) -> String {
        format!("{SERVICE_PREFIX}:{service}")
    }

    fn entry(service: &str, account: &str) -> Result<Entry, KeychainError> {
        let full_service = Self::full_service(service);
        Entry::new(&full_service, account).map_err(|e| KeychainError::Platform(e.to_string()))
    }

    /// Runs a keyring call on the blocking pool. Platform backends may wait
    /// on D-Bus or a system prompt.
    async fn with_entry<T, F>(
        service: &str,
        account: &str,
        op: F,
    ) -> Result<keyring::Result<T>, KeychainError>
    where
        T: Send + 'static,
        F: FnOnce(&Entry) -> keyring::Result<T> + Send + 'static,
    {
        let entry = Self::entry(service, account)?;
        tokio::task::spawn_blocking(move || op(&entry))
            .await
            .map_err(|e| KeychainError::Other(format!("keychain task failed: {e}")))
    }
}

#[async_trait]
impl KeychainApi for SystemKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        debug!(service = %service, account = %account, "Getting credential from keychain");

        match Self::with_entry(service, account, Entry::get_password).await? {
            Ok(secret) if secret.is_empty() => Ok(None),
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => {
                debug!(service = %service, account = %account, "Credential not found");
                Ok(None)
            }
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to get credential");
                Err(e.into())
            }
        }
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Setting credential in keychain");

        let secret = secret.to_string();
        Self::with_entry(service, account, move |entry| entry.set_password(&secret))
            .await?
            .map_err(|e| {
                warn!(service = %service, account = %account, error = %e, "Failed to set credential");
                KeychainError::from(e)
            })
    }

    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Deleting credential from keychain");

        match Self::with_entry(service, account, Entry::delete_credential).await? {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to delete credential");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// In-Memory Keychain
// ============================================================================

/// Process-local keychain. Nothing survives the process.
///
/// Used where no system keychain is reachable, and in tests.
#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryKeychain {
    /// Creates an empty keychain.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<(String, String), String>) -> T,
    ) -> Result<T, KeychainError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KeychainError::Other("memory keychain poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

#[async_trait]
impl KeychainApi for MemoryKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        self.with_entries(|e| e.get(&(service.to_string(), account.to_string())).cloned())
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        self.with_entries(|e| {
            e.insert((service.to_string(), account.to_string()), secret.to_string());
        })
    }

    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        self.with_entries(|e| {
            e.remove(&(service.to_string(), account.to_string()));
        })
    }
}

// ============================================================================
// Common Credential Keys
// ============================================================================

/// Service names used by Valswitch.
pub mod services {
    /// Credential vault master secret.
    pub const VAULT: &str = "vault";
    /// `HenrikDev` rank API.
    pub const HENRIKDEV: &str = "henrikdev";
}

/// Account names for credentials.
pub mod accounts {
    /// API key credential.
    pub const API_KEY: &str = "api_key";
}

// ============================================================================
// Tests
// ============================================================================
