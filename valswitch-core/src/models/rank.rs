//! Rank labels and fetch results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Sentinel Labels
// ============================================================================

/// Shown when an account has no competitive rank (or no data came back).
pub const UNRANKED: &str = "Unranked";

/// Label the rank API uses when it cannot name a tier.
pub const UNKNOWN: &str = "Unknown";

/// Marks an account whose last fetch failed with nothing to restore.
pub const FAILED_TO_LOAD: &str = "Failed to load";

/// Placeholder for a missing peak rank.
pub const NO_PEAK: &str = "No Peak";

/// Labels that mean "no usable competitive rank".
pub const SENTINEL_RANKS: [&str; 3] = [UNRANKED, UNKNOWN, FAILED_TO_LOAD];

/// Returns true if `label` is one of the [`SENTINEL_RANKS`].
pub fn is_sentinel_rank(label: &str) -> bool {
    let label = label.trim();
    SENTINEL_RANKS.iter().any(|s| s.eq_ignore_ascii_case(label))
}

/// Returns true if `label` names an actual tier (non-empty, not a sentinel).
pub fn is_real_rank(label: &str) -> bool {
    !label.trim().is_empty() && !is_sentinel_rank(label)
}

/// Returns true for labels meaning "no competitive rank yet".
///
/// The provider answers with any of these for players that have not finished
/// placements, which is a successful fetch rather than a failure.
pub fn is_unrated_label(label: &str) -> bool {
    matches!(
        label.trim().to_lowercase().as_str(),
        "unrated" | "unranked" | "unknown"
    )
}

// ============================================================================
// Rank Profile
// ============================================================================

/// Result of one successful rank lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankProfile {
    /// Game name the lookup was made for.
    pub username: String,
    /// Tag line the lookup was made for.
    pub tag: String,
    /// Provider region code used for the lookup.
    pub region: String,
    /// Current tier label, e.g. "Diamond 2".
    pub current_rank: String,
    /// Highest tier ever reached.
    pub peak_rank: String,
    /// Ranked rating (elo) reported by the provider.
    pub rank_rating: i32,
    /// When the profile was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl RankProfile {
    /// Returns true if the profile carries a tier label worth storing.
    ///
    /// An empty label or the literal `"Unknown"` counts as no data.
    pub fn has_label(&self) -> bool {
        let label = self.current_rank.trim();
        !label.is_empty() && label != UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_not_real() {
        for s in SENTINEL_RANKS {
            assert!(is_sentinel_rank(s));
            assert!(!is_real_rank(s));
        }
        assert!(!is_real_rank(""));
        assert!(!is_real_rank("   "));
        assert!(is_real_rank("Gold 3"));
    }

    #[test]
    fn test_unrated_labels() {
        assert!(is_unrated_label("Unrated"));
        assert!(is_unrated_label("  unranked "));
        assert!(is_unrated_label("UNKNOWN"));
        assert!(!is_unrated_label("Iron 1"));
    }

    #[test]
    fn test_profile_has_label() {
        let mut profile = RankProfile {
            username: "Foo".into(),
            tag: "1234".into(),
            region: "na".into(),
            current_rank: "Unknown".into(),
            peak_rank: NO_PEAK.into(),
            rank_rating: 0,
            fetched_at: Utc::now(),
        };
        assert!(!profile.has_label());
        profile.current_rank = "Unrated".into();
        assert!(profile.has_label());
        profile.current_rank = String::new();
        assert!(!profile.has_label());
    }
}
