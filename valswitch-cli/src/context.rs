//! Wiring of stores, keychain, vault and services for one CLI run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context as _, Result};
use valswitch_core::{Account, AccountIdentity};
use valswitch_fetch::{
    CredentialVault, KeychainApi, SystemKeychain, SystemProcessHost, platform_automation,
};
use valswitch_providers::{
    ClientConfig, HenrikDevClient, LoginAutomationDriver, LoginError, LoginNotifier,
};
use valswitch_store::{
    AccountStore, ApiKeyStore, RankSyncOrchestrator, SettingsStore, Settings, SyncConfig,
};

use crate::AccountMissing;

/// Everything a command needs, built once from disk state.
pub struct AppContext {
    pub settings: SettingsStore,
    pub accounts: Arc<AccountStore>,
    pub keychain: Arc<dyn KeychainApi>,
}

impl AppContext {
    /// Loads settings and opens the account store at the default location.
    pub async fn load() -> Result<Self> {
        let settings = SettingsStore::load_default()
            .await
            .context("loading settings")?;
        Ok(Self {
            settings,
            accounts: Arc::new(AccountStore::open_default()),
            keychain: Arc::new(SystemKeychain::new()),
        })
    }

    /// Current settings.
    pub async fn current_settings(&self) -> Settings {
        self.settings.get().await
    }

    /// API key lookup and storage.
    pub fn api_keys(&self) -> ApiKeyStore {
        ApiKeyStore::new(Arc::clone(&self.keychain))
    }

    /// Credential vault for the logged-in OS user.
    pub fn vault(&self) -> Arc<CredentialVault> {
        Arc::new(CredentialVault::new(Arc::clone(&self.keychain)))
    }

    /// Parses `Name#Tag` and loads the matching stored account.
    pub async fn find_account(&self, riot_id: &str) -> Result<Account> {
        let identity: AccountIdentity = riot_id.parse()?;
        self.accounts
            .find(&identity)
            .await
            .ok_or_else(|| AccountMissing(identity.to_string()).into())
    }

    /// Rank orchestrator backed by HenrikDev.
    pub async fn rank_sync(&self) -> Result<RankSyncOrchestrator<HenrikDevClient>> {
        let settings = self.current_settings().await;
        let keys = self.api_keys().api_key_source().await;
        let client = HenrikDevClient::new().context("building HTTP client")?;
        Ok(
            RankSyncOrchestrator::new(Arc::clone(&self.accounts), client, Arc::new(keys))
                .with_config(SyncConfig::from(&settings)),
        )
    }

    /// Login driver wired to the real process table and desktop.
    pub async fn login_driver(&self, notifier: Arc<dyn LoginNotifier>) -> LoginAutomationDriver {
        let settings = self.current_settings().await;
        LoginAutomationDriver::new(
            self.vault(),
            Arc::new(SystemProcessHost::new()),
            platform_automation(),
            notifier,
        )
        .with_config(ClientConfig::default().with_extra_paths(settings.extra_client_paths))
    }
}

/// Prints login failures to stderr and remembers that one happened.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    failed: AtomicBool,
}

impl ConsoleNotifier {
    /// Returns true if any failure was reported.
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl LoginNotifier for ConsoleNotifier {
    fn notify(&self, error: &LoginError) {
        self.failed.store(true, Ordering::SeqCst);
        eprintln!("{}: {error}", error.title());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_notifier_records_failure() {
        let notifier = ConsoleNotifier::default();
        assert!(!notifier.failed());
        notifier.notify(&LoginError::NoWindow);
        assert!(notifier.failed());
    }
}
