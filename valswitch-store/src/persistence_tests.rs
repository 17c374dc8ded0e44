//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O, the on-disk account format and settings round-trip.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use valswitch_core::{Account, Region};

use crate::account_store::AccountStore;
use crate::persistence::{ensure_dir, load_json, load_json_or_default, save_json};
use crate::settings_store::Settings;

fn ranked(name: &str) -> Account {
    let mut account = Account::new(name, "1234", format!("{name}_login"), "dG9rZW4=", "EU");
    account.avatar_path = format!("avatars/{name}.png");
    account.current_rank = "Diamond 2".into();
    account.peak_rank = "Immortal 1".into();
    account.rank_rating = 1742;
    account.last_rank_update = Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    account.is_rank_loaded = true;
    account
}

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});

    assert!(save_json(&nested_path, &data).await.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.unwrap_err().is_not_found());

    let fallback: Settings = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Settings::default());
}

#[tokio::test]
async fn test_ensure_dir_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("data");

    ensure_dir(&dir).await.unwrap();
    ensure_dir(&dir).await.unwrap();
    assert!(dir.is_dir());
}

// ============================================================================
// Account File Tests
// ============================================================================

#[tokio::test]
async fn test_save_load_save_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let store = AccountStore::new(temp_dir.path().join("accounts.json"));
    let accounts = vec![ranked("Foo"), Account::new("Bar", "999", "bar", "", "NA")];

    assert!(store.save(&accounts).await);
    let first = tokio::fs::read_to_string(store.path()).await.unwrap();

    let loaded = store.load().await;
    assert!(store.save(&loaded).await);
    let second = tokio::fs::read_to_string(store.path()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(loaded, accounts);
}

#[tokio::test]
async fn test_loading_flag_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let store = AccountStore::new(temp_dir.path().join("accounts.json"));
    let mut account = ranked("Foo");
    account.is_rank_loading = true;

    store.save(&[account]).await;

    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    assert!(!raw.contains("IsRankLoading"));
    assert!(!store.load().await[0].is_rank_loading);
}

#[tokio::test]
async fn test_legacy_file_loads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.json");
    let legacy = r#"[
      {
        "GameName": "Foo",
        "TagLine": "1234",
        "AccountName": "foo_login",
        "EncryptedPassword": "AQAAANCMnd8BFdERjHoAwE",
        "Region": "AP",
        "AvatarPath": "",
        "CurrentRank": "Gold 3",
        "PeakRank": "Platinum 1",
        "RankRating": 1210,
        "LastRankUpdate": "0001-01-01T00:00:00",
        "IsRankLoaded": true,
        "IsRankFailed": false,
        "LastError": "",
        "IsRankLoading": true,
        "ShouldDisplayRank": true
      }
    ]"#;
    tokio::fs::write(&path, legacy).await.unwrap();

    let accounts = AccountStore::new(path).load().await;
    assert_eq!(accounts.len(), 1);
    let foo = &accounts[0];
    assert_eq!(foo.game_name, "Foo");
    assert_eq!(foo.current_rank, "Gold 3");
    assert_eq!(foo.rank_rating, 1210);
    assert!(foo.last_rank_update.is_none());
    assert!(!foo.is_rank_loading);
}

#[tokio::test]
async fn test_unicode_names_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let store = AccountStore::new(temp_dir.path().join("accounts.json"));
    let account = Account::new("Ñandú 日本", "東京", "login", "", "KR");

    store.save(&[account.clone()]).await;

    assert_eq!(store.load().await, vec![account]);
}

// ============================================================================
// Settings Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_settings_full_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        default_region: Region::Latam,
        max_concurrent_fetches: 6,
        max_retries: 5,
        extra_client_paths: vec![PathBuf::from(r"D:\Games\Riot Client\RiotClientServices.exe")],
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"default_region":"NA"}"#).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded.default_region, Region::Na);
    assert_eq!(loaded.max_concurrent_fetches, 4);
    assert_eq!(loaded.max_retries, 3);
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"max_retries":2,"theme":"dark"}"#)
        .await
        .unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.max_retries, 2);
}
