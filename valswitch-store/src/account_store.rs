//! Persistent account list.
//!
//! The whole list lives in one JSON array and every mutation rewrites it.
//! A single async lock serializes each load+save sequence, so concurrent
//! rank updates cannot lose each other's writes.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use valswitch_core::{Account, AccountIdentity};

use crate::error::StoreError;
use crate::persistence::{default_accounts_path, load_json, save_json};

/// JSON-backed account store.
///
/// Never raises: a missing or corrupt file loads as an empty list and a
/// failed write returns `false`.
#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AccountStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store at the default location.
    pub fn open_default() -> Self {
        Self::new(default_accounts_path())
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every account.
    pub async fn load(&self) -> Vec<Account> {
        let _guard = self.write_lock.lock().await;
        self.read_all().await
    }

    /// Replaces the stored list with `accounts`.
    pub async fn save(&self, accounts: &[Account]) -> bool {
        let _guard = self.write_lock.lock().await;
        self.write_all(accounts).await
    }

    /// Finds an account by identity.
    pub async fn find(&self, identity: &AccountIdentity) -> Option<Account> {
        self.load()
            .await
            .into_iter()
            .find(|a| a.identity() == *identity)
    }

    /// Writes an account's rank fields back to disk.
    ///
    /// If an account with the same identity exists only its rank fields are
    /// overwritten; credentials, region and avatar stay as stored. Otherwise
    /// the full record is appended.
    pub async fn merge_update(&self, updated: &Account) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.read_all().await;

        match accounts.iter_mut().find(|a| a.same_identity(updated)) {
            Some(existing) => existing.copy_rank_fields_from(updated),
            None => {
                debug!(account = %updated.full_username(), "Merge target not stored, appending");
                accounts.push(updated.clone());
            }
        }

        self.write_all(&accounts).await
    }

    /// Appends a new account. Returns false if the identity is taken or the
    /// write fails.
    pub async fn add(&self, account: Account) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.read_all().await;

        if accounts.iter().any(|a| a.same_identity(&account)) {
            warn!(account = %account.full_username(), "Account already exists");
            return false;
        }

        info!(account = %account.full_username(), "Adding account");
        accounts.push(account);
        self.write_all(&accounts).await
    }

    /// Applies a user edit to the account stored under `identity`.
    ///
    /// Identity, credential, region and avatar come from `edited`; rank
    /// fields stay as stored, so a rank refresh that landed in between is
    /// kept. Returns false if no account has `identity`, if the new
    /// identity belongs to a different stored account, or if the write
    /// fails.
    pub async fn update(&self, identity: &AccountIdentity, edited: &Account) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.read_all().await;

        let Some(index) = accounts.iter().position(|a| a.identity() == *identity) else {
            debug!(account = %identity, "Nothing to update");
            return false;
        };
        let clash = accounts
            .iter()
            .enumerate()
            .any(|(i, a)| i != index && a.same_identity(edited));
        if clash {
            warn!(
                account = %identity,
                target = %edited.full_username(),
                "Edited identity already belongs to another account"
            );
            return false;
        }

        info!(account = %identity, target = %edited.full_username(), "Updating account");
        accounts[index].copy_profile_fields_from(edited);
        self.write_all(&accounts).await
    }

    /// Deletes the account with `identity`. Returns true if one was removed
    /// and the list was saved.
    pub async fn remove(&self, identity: &AccountIdentity) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.read_all().await;

        let before = accounts.len();
        accounts.retain(|a| a.identity() != *identity);
        if accounts.len() == before {
            debug!(account = %identity, "Nothing to remove");
            return false;
        }

        info!(account = %identity, "Removing account");
        self.write_all(&accounts).await
    }

    async fn read_all(&self) -> Vec<Account> {
        match load_json::<Option<Vec<Account>>>(&self.path).await {
            Ok(accounts) => {
                let accounts = accounts.unwrap_or_default();
                debug!(count = accounts.len(), "Loaded accounts");
                accounts
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %self.path.display(), "Accounts file not found");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Accounts file unreadable, starting empty");
                Vec::new()
            }
        }
    }

    async fn write_all(&self, accounts: &[Account]) -> bool {
        match self.try_write(accounts).await {
            Ok(()) => {
                debug!(count = accounts.len(), "Saved accounts");
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to save accounts");
                false
            }
        }
    }

    async fn try_write(&self, accounts: &[Account]) -> Result<(), StoreError> {
        save_json(&self.path, accounts).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    fn store(dir: &TempDir) -> AccountStore {
        AccountStore::new(dir.path().join("data").join("accounts.json"))
    }

    fn account(name: &str, tag: &str) -> Account {
        Account::new(name, tag, format!("{name}_login"), "dG9rZW4=", "EU")
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), "{ not json").await.unwrap();

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_null_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), "null").await.unwrap();

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.save(&[account("Foo", "1234")]).await);
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_returns_false() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, "file, not a dir").await.unwrap();

        let store = AccountStore::new(blocker.join("accounts.json"));
        assert!(!store.save(&[account("Foo", "1234")]).await);
    }

    #[tokio::test]
    async fn test_merge_update_touches_only_rank_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut stored = account("Foo", "1234");
        stored.avatar_path = "avatars/foo.png".into();
        store.save(&[stored]).await;

        let mut updated = account("  foo ", "1234");
        updated.account_name = "someone_else".into();
        updated.encrypted_password = "other".into();
        updated.region = "KR".into();
        updated.current_rank = "Gold 3".into();
        updated.peak_rank = "Platinum 1".into();
        updated.rank_rating = 1234;
        updated.last_rank_update = Some(Utc::now());
        updated.is_rank_loaded = true;

        assert!(store.merge_update(&updated).await);

        let accounts = store.load().await;
        assert_eq!(accounts.len(), 1);
        let merged = &accounts[0];
        assert_eq!(merged.game_name, "Foo");
        assert_eq!(merged.account_name, "Foo_login");
        assert_eq!(merged.encrypted_password, "dG9rZW4=");
        assert_eq!(merged.region, "EU");
        assert_eq!(merged.avatar_path, "avatars/foo.png");
        assert_eq!(merged.current_rank, "Gold 3");
        assert_eq!(merged.peak_rank, "Platinum 1");
        assert_eq!(merged.rank_rating, 1234);
        assert!(merged.is_rank_loaded);
        assert!(merged.last_rank_update.is_some());
    }

    #[tokio::test]
    async fn test_merge_update_appends_unknown_identity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&[account("Foo", "1234")]).await;

        assert!(store.merge_update(&account("Bar", "9999")).await);

        let names: Vec<String> = store.load().await.iter().map(Account::full_username).collect();
        assert_eq!(names, vec!["Foo#1234", "Bar#9999"]);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_identity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.add(account("Foo", "1234")).await);
        assert!(!store.add(account("FOO", " 1234")).await);
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_by_identity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&[account("Foo", "1234"), account("Bar", "9999")]).await;

        assert!(store.remove(&AccountIdentity::new("foo", "1234")).await);
        assert!(!store.remove(&AccountIdentity::new("foo", "1234")).await);

        let remaining = store.load().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].game_name, "Bar");
    }

    #[tokio::test]
    async fn test_find() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&[account("Foo", "1234")]).await;

        assert!(store.find(&AccountIdentity::new("FOO", "1234")).await.is_some());
        assert!(store.find(&AccountIdentity::new("Foo", "0000")).await.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_profile_fields_only() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut stored = account("Foo", "1234");
        stored.current_rank = "Gold 3".into();
        stored.is_rank_loaded = true;
        store.save(&[stored]).await;

        let mut edited = account("Foozle", "5678");
        edited.account_name = "new_login".into();
        edited.encrypted_password = "bmV3".into();
        edited.region = "KR".into();
        edited.current_rank = "Iron 1".into();

        assert!(store.update(&AccountIdentity::new("foo", "1234"), &edited).await);

        let accounts = store.load().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].full_username(), "Foozle#5678");
        assert_eq!(accounts[0].account_name, "new_login");
        assert_eq!(accounts[0].encrypted_password, "bmV3");
        assert_eq!(accounts[0].region, "KR");
        assert_eq!(accounts[0].current_rank, "Gold 3");
        assert!(accounts[0].is_rank_loaded);
    }

    #[tokio::test]
    async fn test_update_rejects_missing_and_clashing_identity() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&[account("Foo", "1234"), account("Bar", "9999")]).await;

        assert!(!store.update(&AccountIdentity::new("Nobody", "0000"), &account("X", "000")).await);
        assert!(!store.update(&AccountIdentity::new("Foo", "1234"), &account("bar", "9999")).await);
        assert!(store.update(&AccountIdentity::new("Foo", "1234"), &account("FOO", "1234")).await);

        let names: Vec<String> = store.load().await.iter().map(Account::full_username).collect();
        assert_eq!(names, vec!["FOO#1234", "Bar#9999"]);
    }

    #[tokio::test]
    async fn test_edit_and_rank_merge_both_survive() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store(&dir));
        store.save(&[account("Foo", "1234")]).await;

        let mut edited = account("Foo", "1234");
        edited.account_name = "renamed_login".into();
        edited.region = "AP".into();

        let mut refreshed = account("Foo", "1234");
        refreshed.current_rank = "Diamond 2".into();
        refreshed.rank_rating = 88;
        refreshed.is_rank_loaded = true;
        refreshed.last_rank_update = Some(Utc::now());

        let edit = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.update(&AccountIdentity::new("Foo", "1234"), &edited).await
            })
        };
        let merge = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.merge_update(&refreshed).await })
        };
        assert!(edit.await.unwrap());
        assert!(merge.await.unwrap());

        let accounts = store.load().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_name, "renamed_login");
        assert_eq!(accounts[0].region, "AP");
        assert_eq!(accounts[0].current_rank, "Diamond 2");
        assert_eq!(accounts[0].rank_rating, 88);
        assert!(accounts[0].is_rank_loaded);
    }

    #[tokio::test]
    async fn test_concurrent_merges_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store(&dir));
        let accounts: Vec<Account> = (0..8).map(|i| account(&format!("Player{i}"), "0000")).collect();
        store.save(&accounts).await;

        let mut handles = Vec::new();
        for mut account in accounts {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                account.current_rank = "Silver 1".into();
                account.is_rank_loaded = true;
                store.merge_update(&account).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 8);
        assert!(loaded.iter().all(|a| a.current_rank == "Silver 1"));
    }
}
