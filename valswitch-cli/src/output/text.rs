//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use valswitch_core::{Account, FAILED_TO_LOAD};
use valswitch_store::SyncSummary;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the account table.
    pub fn format_accounts(&self, accounts: &[Account]) -> String {
        if accounts.is_empty() {
            return self.dim("No accounts stored. Add one with `valswitch accounts add`.");
        }

        let mut lines = Vec::with_capacity(accounts.len() + 2);
        lines.push(self.bold(&format!(
            "{:<24} {:<6} {:<16} {:<16} {:>5}  {}",
            "ACCOUNT", "REGION", "RANK", "PEAK", "RR", "UPDATED"
        )));
        lines.push("─".repeat(84));
        lines.extend(accounts.iter().map(|a| self.format_account_line(a)));
        lines.join("\n")
    }

    /// Formats one account row.
    pub fn format_account_line(&self, account: &Account) -> String {
        let rank = format!("{:<16}", account.display_rank());
        let rank = if account.is_rank_loaded {
            self.green(&rank)
        } else if account.current_rank == FAILED_TO_LOAD {
            self.red(&rank)
        } else {
            self.dim(&rank)
        };

        let mut line = format!(
            "{:<24} {:<6} {} {:<16} {:>5}  {}",
            account.full_username(),
            account.region,
            rank,
            account.display_peak_rank(),
            account.rank_rating,
            self.format_updated(account.last_rank_update),
        );

        if account.has_error() {
            line.push_str(&format!("  {}", self.yellow(&account.last_error)));
        }
        line
    }

    /// Formats the result of a rank sync.
    pub fn format_summary(&self, summary: &SyncSummary) -> String {
        let text = summary.to_string();
        if summary.failed == 0 {
            self.green(&text)
        } else if summary.succeeded == 0 && summary.skipped == 0 {
            self.red(&text)
        } else {
            self.yellow(&text)
        }
    }

    /// Formats an error message.
    pub fn format_error(&self, subject: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(subject), self.red("Error"), error)
    }

    fn format_updated(&self, updated: Option<DateTime<Utc>>) -> String {
        match updated {
            Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => self.dim("never"),
        }
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}
