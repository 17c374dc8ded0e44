//! Rank synchronization.
//!
//! Decides whether an account's rank is stale, fetches a fresh profile,
//! classifies the outcome into account state and writes it back. A failed
//! fetch never wipes a real rank the account already had.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};
use valswitch_core::{
    Account, ApiKeySource, FAILED_TO_LOAD, RankFetchError, RankProfile, RankSnapshot, RankSource,
    Region, UNRANKED, is_real_rank, is_unrated_label,
};

use crate::account_store::AccountStore;
use crate::settings_store::{MAX_CONCURRENT_FETCHES, Settings};

/// Any fetch younger than this many hours is skipped.
const RECENT_FETCH_HOURS: i64 = 6;

/// A real rank younger than this many hours is skipped.
const FRESH_RANK_HOURS: i64 = 24;

/// Stored when no API key is configured.
pub const MISSING_KEY_ERROR: &str = "HenrikDev API key not configured";

/// Stored when the source answered without any profile.
pub const NO_RESPONSE_ERROR: &str = "No response from API";

/// Stored when the profile carried no usable rank label.
pub const NO_DATA_ERROR: &str = "No rank data available";

/// Stored when retries ran out on "too many requests".
pub const RATE_LIMIT_ERROR: &str = "Rate limit exceeded - try again later";

/// Stored when the provider rejected the API key.
pub const INVALID_KEY_ERROR: &str = "Invalid HenrikDev API key";

// ============================================================================
// Outcomes
// ============================================================================

/// What `update_one` did with an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stored rank was fresh enough; nothing was fetched.
    Skipped,
    /// A profile was fetched and stored.
    Updated,
    /// The source had no usable profile.
    NoData,
    /// No key, rate limited, rejected or otherwise failed.
    Failed,
}

/// Aggregate result of `update_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Accounts processed.
    pub total: usize,
    /// Accounts with a freshly stored profile.
    pub succeeded: usize,
    /// Accounts left alone by the freshness policy.
    pub skipped: usize,
    /// Accounts that ended without a fresh profile.
    pub failed: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: SyncOutcome) {
        self.total += 1;
        match outcome {
            SyncOutcome::Updated => self.succeeded += 1,
            SyncOutcome::Skipped => self.skipped += 1,
            SyncOutcome::NoData | SyncOutcome::Failed => self.failed += 1,
        }
    }

    /// Share of attempted fetches that succeeded, in percent.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.succeeded + self.failed;
        if attempted == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.succeeded as f64 * 100.0 / attempted as f64;
        rate
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accounts: {} updated, {} skipped, {} failed ({:.0}% success)",
            self.total,
            self.succeeded,
            self.skipped,
            self.failed,
            self.success_rate()
        )
    }
}

// ============================================================================
// Freshness
// ============================================================================

/// Returns true when the stored rank is fresh enough to skip a fetch.
///
/// Precedence: a "Failed to load" rank is always refetched; any fetch in
/// the last 6 hours is skipped; a real rank from the last 24 hours is
/// skipped. The 24 hour window only adds the 6 to 24 hour range for real
/// ranks, since everything younger is already covered by the first rule.
pub fn should_skip(account: &Account, now: DateTime<Utc>) -> bool {
    if account.current_rank == FAILED_TO_LOAD {
        return false;
    }

    let Some(last) = account.last_rank_update else {
        return false;
    };
    let age = now - last;

    if age < Duration::hours(RECENT_FETCH_HOURS) {
        return true;
    }

    is_real_rank(&account.current_rank) && age < Duration::hours(FRESH_RANK_HOURS)
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Tunables for [`RankSyncOrchestrator`].
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Region used for accounts with none stored.
    pub default_region: Region,
    /// Attempts per fetch.
    pub max_retries: u32,
    /// Concurrent fetches in `update_all`, clamped to `1..=8`.
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SyncConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            default_region: settings.default_region,
            max_retries: settings.max_retries,
            concurrency: settings.fetch_concurrency(),
        }
    }
}

/// Keeps account ranks in sync with a [`RankSource`].
pub struct RankSyncOrchestrator<R> {
    store: Arc<AccountStore>,
    source: R,
    keys: Arc<dyn ApiKeySource>,
    config: SyncConfig,
}

impl<R: RankSource> RankSyncOrchestrator<R> {
    /// Creates an orchestrator with default tunables.
    pub fn new(store: Arc<AccountStore>, source: R, keys: Arc<dyn ApiKeySource>) -> Self {
        Self {
            store,
            source,
            keys,
            config: SyncConfig::default(),
        }
    }

    /// Replaces the tunables.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Refreshes one account's rank in place and persists it.
    #[instrument(skip(self, account), fields(account = %account.full_username()))]
    pub async fn update_one(&self, account: &mut Account) -> SyncOutcome {
        if should_skip(account, Utc::now()) {
            debug!("Rank is fresh, skipping");
            return SyncOutcome::Skipped;
        }

        let snapshot = account.rank_snapshot();
        account.current_rank.clear();
        account.peak_rank.clear();
        account.is_rank_failed = false;
        account.last_error.clear();

        let Some(api_key) = self.keys.api_key() else {
            warn!("No HenrikDev API key configured");
            account.current_rank = UNRANKED.to_string();
            account.is_rank_loaded = false;
            account.is_rank_failed = true;
            account.last_error = MISSING_KEY_ERROR.to_string();
            self.persist(account).await;
            return SyncOutcome::Failed;
        };

        let region = if account.region.trim().is_empty() {
            self.config.default_region.code().to_string()
        } else {
            account.region.clone()
        };

        account.is_rank_loading = true;
        let result = self
            .source
            .fetch_profile(
                &account.game_name,
                &account.tag_line,
                &region,
                &api_key,
                self.config.max_retries,
            )
            .await;
        account.is_rank_loading = false;

        let outcome = match result {
            Ok(Some(profile)) if profile.has_label() => {
                apply_profile(account, &profile);
                info!(
                    rank = %profile.current_rank,
                    rating = profile.rank_rating,
                    region = %region,
                    "Rank updated"
                );
                SyncOutcome::Updated
            }
            Ok(profile) => {
                let reason = if profile.is_none() {
                    NO_RESPONSE_ERROR
                } else {
                    NO_DATA_ERROR
                };
                mark_no_data(account, reason);
                warn!(region = %region, "No rank data, marked unranked");
                SyncOutcome::NoData
            }
            Err(e) => {
                restore_after_failure(account, &snapshot, &e);
                error!(error = %e, kept = %account.current_rank, "Rank fetch failed");
                SyncOutcome::Failed
            }
        };

        self.persist(account).await;
        outcome
    }

    /// Refreshes every account with bounded concurrency, then saves the
    /// whole list once.
    pub async fn update_all(&self, accounts: &mut [Account]) -> SyncSummary {
        let limit = self.config.concurrency.clamp(1, MAX_CONCURRENT_FETCHES);
        info!(count = accounts.len(), limit, "Updating ranks");

        let outcomes: Vec<SyncOutcome> = stream::iter(accounts.iter_mut())
            .map(|account| self.update_one(account))
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut summary = SyncSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            success_rate = summary.success_rate(),
            "Rank update summary"
        );

        if !self.store.save(accounts).await {
            error!("Saving accounts after rank update failed");
        }
        summary
    }

    async fn persist(&self, account: &Account) {
        if !self.store.merge_update(account).await {
            error!(account = %account.full_username(), "Could not persist rank fields");
        }
    }
}

fn apply_profile(account: &mut Account, profile: &RankProfile) {
    account.current_rank.clone_from(&profile.current_rank);
    account.peak_rank.clone_from(&profile.peak_rank);
    account.rank_rating = profile.rank_rating;
    account.last_rank_update = Some(Utc::now());
    account.last_error.clear();
    account.is_rank_failed = false;
    account.is_rank_loaded =
        is_real_rank(&profile.current_rank) && !is_unrated_label(&profile.current_rank);
}

fn mark_no_data(account: &mut Account, reason: &str) {
    account.current_rank = UNRANKED.to_string();
    account.peak_rank.clear();
    account.is_rank_loaded = false;
    account.is_rank_failed = true;
    account.last_error = reason.to_string();
}

fn restore_after_failure(account: &mut Account, snapshot: &RankSnapshot, err: &RankFetchError) {
    if snapshot.is_real() {
        account.current_rank.clone_from(&snapshot.current_rank);
        account.peak_rank.clone_from(&snapshot.peak_rank);
        account.rank_rating = snapshot.rank_rating;
        account.is_rank_loaded = true;
    } else {
        account.current_rank = FAILED_TO_LOAD.to_string();
        account.peak_rank.clear();
        account.is_rank_loaded = false;
    }
    account.is_rank_failed = true;
    account.last_error = failure_message(err);
}

/// Maps a fetch error to the message stored on the account.
fn failure_message(err: &RankFetchError) -> String {
    match err {
        RankFetchError::RateLimited { .. } => RATE_LIMIT_ERROR.to_string(),
        RankFetchError::Unauthorized { .. } => INVALID_KEY_ERROR.to_string(),
        RankFetchError::Failed(message) => format!("Error: {message}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;
    use valswitch_core::{SENTINEL_RANKS, StaticApiKey};

    use super::*;

    type Reply = Result<Option<RankProfile>, RankFetchError>;

    /// Rank source that plays back canned replies.
    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
        regions: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn with(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RankSource for ScriptedSource {
        async fn fetch_profile(
            &self,
            username: &str,
            tag: &str,
            region: &str,
            _api_key: &str,
            _max_retries: u32,
        ) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.regions.lock().unwrap().push(region.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Some(profile(username, tag, "Silver 2"))))
        }
    }

    fn profile(username: &str, tag: &str, rank: &str) -> RankProfile {
        RankProfile {
            username: username.to_string(),
            tag: tag.to_string(),
            region: "NA".to_string(),
            current_rank: rank.to_string(),
            peak_rank: "Ascendant 1".to_string(),
            rank_rating: 1500,
            fetched_at: Utc::now(),
        }
    }

    fn account(name: &str) -> Account {
        Account::new(name, "1234", format!("{name}_login"), "dG9rZW4=", "NA")
    }

    struct Harness {
        _dir: TempDir,
        store: Arc<AccountStore>,
        source: Arc<ScriptedSource>,
        sync: RankSyncOrchestrator<Arc<ScriptedSource>>,
    }

    fn harness(replies: Vec<Reply>, key: Option<&str>) -> Harness {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(AccountStore::new(dir.path().join("accounts.json")));
        let source = Arc::new(ScriptedSource::with(replies));
        let sync = RankSyncOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&source),
            Arc::new(StaticApiKey::new(key.map(str::to_string))),
        );
        Harness {
            _dir: dir,
            store,
            source,
            sync,
        }
    }

    #[test]
    fn test_should_skip_precedence() {
        let now = Utc::now();
        let mut a = account("Foo");

        assert!(!should_skip(&a, now), "never fetched");

        a.last_rank_update = Some(now - Duration::hours(1));
        a.current_rank = String::new();
        assert!(should_skip(&a, now), "any fetch under 6h");

        a.current_rank = FAILED_TO_LOAD.to_string();
        a.last_rank_update = Some(now - Duration::minutes(1));
        assert!(!should_skip(&a, now), "failed rank always refetched");

        a.current_rank = "Gold 3".to_string();
        a.last_rank_update = Some(now - Duration::hours(12));
        assert!(should_skip(&a, now), "real rank under 24h");

        a.current_rank = UNRANKED.to_string();
        assert!(!should_skip(&a, now), "sentinel rank over 6h");

        a.current_rank = "Gold 3".to_string();
        a.last_rank_update = Some(now - Duration::hours(25));
        assert!(!should_skip(&a, now), "real rank over 24h");
    }

    #[tokio::test]
    async fn test_fresh_rank_is_left_alone() {
        let h = harness(vec![], Some("HDEV-key"));
        let mut a = account("Foo");
        a.current_rank = "Gold 3".into();
        a.peak_rank = "Platinum 1".into();
        a.rank_rating = 321;
        a.last_rank_update = Some(Utc::now() - Duration::hours(1));
        let before = a.clone();

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Skipped);
        assert_eq!(h.source.calls(), 0);
        assert_eq!(a, before);
    }

    #[tokio::test]
    async fn test_failed_rank_is_refetched() {
        let h = harness(vec![], Some("HDEV-key"));
        let mut a = account("Foo");
        a.current_rank = FAILED_TO_LOAD.into();
        a.last_rank_update = Some(Utc::now() - Duration::minutes(1));

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Updated);
        assert_eq!(h.source.calls(), 1);
        assert_eq!(a.current_rank, "Silver 2");
    }

    #[tokio::test]
    async fn test_success_sets_rank_fields_and_persists() {
        let h = harness(vec![Ok(Some(profile("Foo", "1234", "Diamond 2")))], Some("HDEV-key"));
        let mut a = account("Foo");

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Updated);
        assert_eq!(a.current_rank, "Diamond 2");
        assert_eq!(a.peak_rank, "Ascendant 1");
        assert_eq!(a.rank_rating, 1500);
        assert!(a.is_rank_loaded);
        assert!(!a.is_rank_failed);
        assert!(!a.is_rank_loading);
        assert!(a.last_error.is_empty());
        assert!(a.last_rank_update.is_some());

        let stored = h.store.load().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].current_rank, "Diamond 2");
        assert!(stored[0].is_rank_loaded);
    }

    #[tokio::test]
    async fn test_unrated_profile_is_not_loaded() {
        let h = harness(vec![Ok(Some(profile("Foo", "1234", " Unrated ")))], Some("HDEV-key"));
        let mut a = account("Foo");

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Updated);
        assert_eq!(a.current_rank, " Unrated ");
        assert!(!a.is_rank_loaded);
        assert!(!a.is_rank_failed);
        assert!(a.last_rank_update.is_some());
    }

    #[tokio::test]
    async fn test_no_profile_marks_unranked() {
        let cases = [
            (Ok(None), NO_RESPONSE_ERROR),
            (Ok(Some(profile("Foo", "1234", "Unknown"))), NO_DATA_ERROR),
        ];
        for (reply, reason) in cases {
            let h = harness(vec![reply], Some("HDEV-key"));
            let mut a = account("Foo");
            a.peak_rank = "Gold 1".into();

            assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::NoData);
            assert_eq!(a.current_rank, UNRANKED);
            assert!(a.peak_rank.is_empty());
            assert!(!a.is_rank_loaded);
            assert!(a.is_rank_failed);
            assert_eq!(a.last_error, reason);
        }
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let h = harness(vec![], None);
        let mut a = account("Foo");

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Failed);
        assert_eq!(h.source.calls(), 0);
        assert_eq!(a.current_rank, UNRANKED);
        assert!(a.is_rank_failed);
        assert_eq!(a.last_error, MISSING_KEY_ERROR);
        assert_eq!(h.store.load().await[0].last_error, MISSING_KEY_ERROR);
    }

    #[tokio::test]
    async fn test_rate_limit_restores_real_rank() {
        let h = harness(
            vec![Err(RankFetchError::RateLimited {
                message: "Rate limit reached".into(),
            })],
            Some("HDEV-key"),
        );
        let mut a = account("Foo");
        a.current_rank = "Diamond 2".into();
        a.peak_rank = "Immortal 1".into();
        a.rank_rating = 1800;
        a.last_rank_update = Some(Utc::now() - Duration::days(2));

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Failed);
        assert_eq!(a.current_rank, "Diamond 2");
        assert_eq!(a.peak_rank, "Immortal 1");
        assert_eq!(a.rank_rating, 1800);
        assert!(a.is_rank_failed);
        assert!(a.is_rank_loaded);
        assert_eq!(a.last_error, RATE_LIMIT_ERROR);

        let stored = &h.store.load().await[0];
        assert_eq!(stored.current_rank, "Diamond 2");
        assert!(stored.is_rank_failed);
    }

    #[tokio::test]
    async fn test_failure_without_real_rank_marks_failed_to_load() {
        let h = harness(
            vec![Err(RankFetchError::Unauthorized {
                message: "Invalid API key".into(),
            })],
            Some("HDEV-key"),
        );
        let mut a = account("Foo");
        a.current_rank = UNRANKED.into();
        a.peak_rank = "Gold 1".into();

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Failed);
        assert_eq!(a.current_rank, FAILED_TO_LOAD);
        assert!(a.peak_rank.is_empty());
        assert!(!a.is_rank_loaded);
        assert!(a.is_rank_failed);
        assert_eq!(a.last_error, INVALID_KEY_ERROR);
    }

    #[tokio::test]
    async fn test_other_failure_keeps_provider_message() {
        let h = harness(vec![Err(RankFetchError::Failed("connection reset".into()))], Some("HDEV-key"));
        let mut a = account("Foo");

        assert_eq!(h.sync.update_one(&mut a).await, SyncOutcome::Failed);
        assert_eq!(a.last_error, "Error: connection reset");
    }

    #[tokio::test]
    async fn test_failed_to_load_label_is_never_loaded() {
        let h = harness(vec![Ok(Some(profile("Foo", "1234", FAILED_TO_LOAD)))], Some("HDEV-key"));
        let mut a = account("Foo");

        h.sync.update_one(&mut a).await;
        assert!(!a.is_rank_loaded);
        assert!(!h.store.load().await[0].is_rank_loaded);
    }

    #[tokio::test]
    async fn test_loaded_flag_never_paired_with_sentinel() {
        let replies = vec![
            Ok(Some(profile("A", "1234", "Gold 1"))),
            Ok(Some(profile("B", "1234", "Unranked"))),
            Ok(Some(profile("C", "1234", FAILED_TO_LOAD))),
            Ok(None),
            Err(RankFetchError::Failed("boom".into())),
        ];
        for reply in replies {
            let h = harness(vec![reply], Some("HDEV-key"));
            let mut a = account("Foo");
            h.sync.update_one(&mut a).await;

            if a.is_rank_loaded {
                assert!(!a.current_rank.is_empty());
                assert!(!SENTINEL_RANKS.contains(&a.current_rank.as_str()));
            }
        }
    }

    #[tokio::test]
    async fn test_second_immediate_update_does_not_fetch() {
        let h = harness(vec![], Some("HDEV-key"));
        let mut a = account("Foo");

        h.sync.update_one(&mut a).await;
        h.sync.update_one(&mut a).await;
        assert_eq!(h.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_region_uses_default() {
        let h = harness(vec![], Some("HDEV-key"));
        let mut blank = account("Foo");
        blank.region = "  ".into();
        let mut eu = account("Bar");
        eu.region = "EU".into();

        h.sync.update_one(&mut blank).await;
        h.sync.update_one(&mut eu).await;

        assert_eq!(*h.source.regions.lock().unwrap(), vec!["AP", "EU"]);
    }

    #[tokio::test]
    async fn test_update_all_summarizes_and_saves() {
        let h = harness(vec![], Some("HDEV-key"));
        let sync = h.sync.with_config(SyncConfig {
            concurrency: 2,
            ..SyncConfig::default()
        });

        let mut fresh = account("Fresh");
        fresh.current_rank = "Gold 3".into();
        fresh.last_rank_update = Some(Utc::now());
        let mut accounts = vec![account("One"), account("Two"), account("Three"), fresh];

        let summary = sync.update_all(&mut accounts).await;

        assert_eq!(
            summary,
            SyncSummary {
                total: 4,
                succeeded: 3,
                skipped: 1,
                failed: 0,
            }
        );
        assert_eq!(h.source.calls(), 3);

        let stored = h.store.load().await;
        assert_eq!(stored.len(), 4);
        assert!(stored.iter().all(|a| !a.current_rank.is_empty()));
    }

    /// Rank source that tracks how many fetches overlap.
    #[derive(Default)]
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl RankSource for SlowSource {
        async fn fetch_profile(
            &self,
            username: &str,
            tag: &str,
            _region: &str,
            _api_key: &str,
            _max_retries: u32,
        ) -> Reply {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            // Earlier accounts take longer, so completions arrive out of order.
            let index: u64 = username.trim_start_matches("Player").parse().unwrap_or(0);
            tokio::time::sleep(std::time::Duration::from_millis(2 * (12 - index))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Some(profile(username, tag, "Gold 1")))
        }
    }

    #[tokio::test]
    async fn test_update_all_bounds_concurrency_and_saves_last() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(AccountStore::new(dir.path().join("accounts.json")));
        let source = Arc::new(SlowSource::default());
        let limit = 3;
        let sync = RankSyncOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&source),
            Arc::new(StaticApiKey::new(Some("HDEV-key".to_string()))),
        )
        .with_config(SyncConfig {
            concurrency: limit,
            ..SyncConfig::default()
        });

        let mut accounts: Vec<Account> = (0..12).map(|i| account(&format!("Player{i}"))).collect();
        let summary = sync.update_all(&mut accounts).await;

        assert_eq!(summary.succeeded, 12);
        assert_eq!(source.in_flight.load(Ordering::SeqCst), 0);
        let peak = source.peak.load(Ordering::SeqCst);
        assert!(peak <= limit, "{peak} fetches overlapped");
        assert!(peak > 1, "fetches never overlapped");

        // Per-account merges append in completion order; the closing bulk
        // save restores input order, so it ran after every fetch.
        let stored: Vec<String> = store.load().await.iter().map(|a| a.game_name.clone()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("Player{i}")).collect();
        assert_eq!(stored, expected);
        assert!(store.load().await.iter().all(|a| a.is_rank_loaded));
    }

    #[test]
    fn test_summary_display() {
        let summary = SyncSummary {
            total: 5,
            succeeded: 3,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            summary.to_string(),
            "5 accounts: 3 updated, 1 skipped, 1 failed (75% success)"
        );
        assert!((SyncSummary::default().success_rate() - 100.0).abs() < f64::EPSILON);
    }
}
