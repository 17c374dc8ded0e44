// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Valswitch Store
//!
//! State management for the Valswitch account manager.
//!
//! This crate provides:
//!
//! - **AccountStore**: the JSON account list with identity-based merging
//! - **RankSyncOrchestrator**: freshness policy, fetch and failure rollback
//! - **SettingsStore**: user preferences with persistence
//! - **ApiKeyStore**: HenrikDev API key lookup and storage
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use valswitch_store::{AccountStore, RankSyncOrchestrator};
//! use valswitch_providers::HenrikDevClient;
//!
//! let store = Arc::new(AccountStore::open_default());
//! let sync = RankSyncOrchestrator::new(store.clone(), HenrikDevClient::new()?, keys);
//!
//! let mut accounts = store.load().await;
//! let summary = sync.update_all(&mut accounts).await;
//! println!("{summary}");
//! ```

pub mod account_store;
pub mod error;
pub mod keychain;
pub mod persistence;
pub mod rank_sync;
pub mod settings_store;

pub use account_store::AccountStore;
pub use error::StoreError;
pub use keychain::{API_KEY_ENV, ApiKeyOrigin, ApiKeyStore};
pub use persistence::{
    default_accounts_path, default_config_dir, default_settings_path, legacy_api_key_path,
    load_json, load_json_or_default, save_json,
};
pub use rank_sync::{RankSyncOrchestrator, SyncConfig, SyncOutcome, SyncSummary, should_skip};
pub use settings_store::{Settings, SettingsStore};
#[cfg(test)]
mod persistence_tests;
