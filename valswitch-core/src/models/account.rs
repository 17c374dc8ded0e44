//! Stored accounts.
//!
//! Accounts are persisted with PascalCase field names so existing
//! `accounts.json` files from the Windows tool load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rank::{NO_PEAK, UNRANKED, is_real_rank};
use crate::error::CoreError;

// ============================================================================
// Identity
// ============================================================================

/// The `(game name, tag line)` pair that identifies an account.
///
/// Comparison trims whitespace and ignores case, so `Foo#1234` and
/// `foo#1234` are the same account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Riot game name.
    pub game_name: String,
    /// Riot tag line (without `#`).
    pub tag_line: String,
}

impl AccountIdentity {
    /// Creates a new identity.
    pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
        }
    }

    fn normalized(value: &str) -> String {
        value.trim().to_lowercase()
    }
}

impl PartialEq for AccountIdentity {
    fn eq(&self, other: &Self) -> bool {
        Self::normalized(&self.game_name) == Self::normalized(&other.game_name)
            && Self::normalized(&self.tag_line) == Self::normalized(&other.tag_line)
    }
}

impl Eq for AccountIdentity {}

impl fmt::Display for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

impl FromStr for AccountIdentity {
    type Err = CoreError;

    /// Parses `Name#Tag`. The last `#` splits, since names may not contain one
    /// but stray input sometimes does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, tag) = s
            .rsplit_once('#')
            .ok_or_else(|| CoreError::InvalidIdentity(s.to_string()))?;
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return Err(CoreError::InvalidIdentity(s.to_string()));
        }
        Ok(Self::new(name, tag))
    }
}

// ============================================================================
// Rank Snapshot
// ============================================================================

/// The rank triple captured before a fetch, used to roll back on failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankSnapshot {
    /// Current tier label.
    pub current_rank: String,
    /// Peak tier label.
    pub peak_rank: String,
    /// Ranked rating.
    pub rank_rating: i32,
}

impl RankSnapshot {
    /// Returns true if the snapshot holds an actual tier worth restoring.
    pub fn is_real(&self) -> bool {
        is_real_rank(&self.current_rank)
    }
}

// ============================================================================
// Account
// ============================================================================

/// A stored Riot account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Account {
    /// Riot game name (left half of the Riot ID).
    pub game_name: String,
    /// Riot tag line (right half of the Riot ID).
    pub tag_line: String,
    /// Login user name for the Riot Client.
    pub account_name: String,
    /// Vault token for the login password.
    pub encrypted_password: String,
    /// Region code ("NA", "AP", ...). Empty means "use the default server".
    pub region: String,
    /// Avatar image path, kept opaque.
    pub avatar_path: String,

    // Rank fields. Always written together.
    /// Current tier label or a sentinel.
    pub current_rank: String,
    /// Peak tier label.
    pub peak_rank: String,
    /// Ranked rating.
    pub rank_rating: i32,
    /// Last successful rank update.
    #[serde(with = "timestamp")]
    pub last_rank_update: Option<DateTime<Utc>>,
    /// Whether a real competitive rank is loaded.
    pub is_rank_loaded: bool,
    /// Whether the last rank fetch failed.
    pub is_rank_failed: bool,
    /// Message describing the last failure, empty on success.
    pub last_error: String,
    /// Set while a fetch is in flight. Never persisted.
    #[serde(skip)]
    pub is_rank_loading: bool,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            game_name: String::new(),
            tag_line: String::new(),
            account_name: String::new(),
            encrypted_password: String::new(),
            region: "NA".to_string(),
            avatar_path: String::new(),
            current_rank: String::new(),
            peak_rank: String::new(),
            rank_rating: 0,
            last_rank_update: None,
            is_rank_loaded: false,
            is_rank_failed: false,
            last_error: String::new(),
            is_rank_loading: false,
        }
    }
}

impl Account {
    /// Creates an account with no rank data.
    pub fn new(
        game_name: impl Into<String>,
        tag_line: impl Into<String>,
        account_name: impl Into<String>,
        encrypted_password: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            game_name: game_name.into(),
            tag_line: tag_line.into(),
            account_name: account_name.into(),
            encrypted_password: encrypted_password.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Returns the account's identity.
    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity::new(self.game_name.clone(), self.tag_line.clone())
    }

    /// Returns true if both accounts share an identity.
    pub fn same_identity(&self, other: &Account) -> bool {
        self.identity() == other.identity()
    }

    /// `name#tag`.
    pub fn full_username(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    /// Current rank for display; "Unranked" when empty.
    pub fn display_rank(&self) -> &str {
        if self.current_rank.trim().is_empty() {
            UNRANKED
        } else {
            &self.current_rank
        }
    }

    /// Peak rank for display; "No Peak" when empty.
    pub fn display_peak_rank(&self) -> &str {
        if self.peak_rank.trim().is_empty() {
            NO_PEAK
        } else {
            &self.peak_rank
        }
    }

    /// Returns true if the last fetch left an error message.
    pub fn has_error(&self) -> bool {
        !self.last_error.trim().is_empty()
    }

    /// Returns true if the account holds a real tier.
    pub fn has_valid_rank(&self) -> bool {
        is_real_rank(&self.current_rank)
    }

    /// Captures the rank triple.
    pub fn rank_snapshot(&self) -> RankSnapshot {
        RankSnapshot {
            current_rank: self.current_rank.clone(),
            peak_rank: self.peak_rank.clone(),
            rank_rating: self.rank_rating,
        }
    }

    /// Copies every persisted rank field from `source`, leaving identity,
    /// credential and region untouched.
    pub fn copy_rank_fields_from(&mut self, source: &Account) {
        self.current_rank.clone_from(&source.current_rank);
        self.peak_rank.clone_from(&source.peak_rank);
        self.rank_rating = source.rank_rating;
        self.last_rank_update = source.last_rank_update;
        self.is_rank_loaded = source.is_rank_loaded;
        self.is_rank_failed = source.is_rank_failed;
        self.last_error.clone_from(&source.last_error);
    }

    /// Copies identity, credential, region and avatar from `source`, leaving
    /// every rank field untouched. The counterpart of
    /// [`copy_rank_fields_from`](Self::copy_rank_fields_from) for user edits.
    pub fn copy_profile_fields_from(&mut self, source: &Account) {
        self.game_name.clone_from(&source.game_name);
        self.tag_line.clone_from(&source.tag_line);
        self.account_name.clone_from(&source.account_name);
        self.encrypted_password.clone_from(&source.encrypted_password);
        self.region.clone_from(&source.region);
        self.avatar_path.clone_from(&source.avatar_path);
    }
}

// ============================================================================
// Timestamp Serde
// ============================================================================

/// `LastRankUpdate` accepts RFC 3339, offset-less ISO timestamps and the
/// year-1 "never" marker written by .NET; the marker and `null` both map to
/// `None`.
mod timestamp {
    use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|n| n.and_utc()))
            .filter(|ts| ts.year() > 1)
    }
}
