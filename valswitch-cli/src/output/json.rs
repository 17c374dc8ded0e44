//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use valswitch_core::Account;
use valswitch_store::SyncSummary;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one account. Never includes the password token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutput {
    pub riot_id: String,
    pub login: String,
    pub region: String,
    pub current_rank: String,
    pub peak_rank: String,
    pub rank_rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rank_update: Option<DateTime<Utc>>,
    pub rank_loaded: bool,
    pub rank_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Account> for AccountOutput {
    fn from(account: &Account) -> Self {
        Self {
            riot_id: account.full_username(),
            login: account.account_name.clone(),
            region: account.region.clone(),
            current_rank: account.display_rank().to_string(),
            peak_rank: account.display_peak_rank().to_string(),
            rank_rating: account.rank_rating,
            last_rank_update: account.last_rank_update,
            rank_loaded: account.is_rank_loaded,
            rank_failed: account.is_rank_failed,
            error: account.has_error().then(|| account.last_error.clone()),
        }
    }
}

/// Rank sync output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub accounts: Vec<AccountOutput>,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the account list.
    pub fn format_accounts(&self, accounts: &[Account]) -> Result<String> {
        let outputs: Vec<AccountOutput> = accounts.iter().map(AccountOutput::from).collect();
        self.format(&outputs)
    }

    /// Formats a rank sync result.
    pub fn format_summary(&self, summary: &SyncSummary, accounts: &[Account]) -> Result<String> {
        self.format(&SyncOutput {
            total: summary.total,
            succeeded: summary.succeeded,
            skipped: summary.skipped,
            failed: summary.failed,
            accounts: accounts.iter().map(AccountOutput::from).collect(),
        })
    }
}
