//! Error types for Valswitch core.

use thiserror::Error;

/// Core error type for Valswitch.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A Riot ID could not be parsed into name and tag.
    #[error("Invalid Riot ID: {0} (expected Name#Tag)")]
    InvalidIdentity(String),

    /// Unknown region code.
    #[error("Unknown region: {0}")]
    InvalidRegion(String),

    /// Invalid data encountered.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

/// Distinguishable outcomes of a rank fetch that did not produce a profile.
///
/// Plain absence of data is not an error; rank sources report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RankFetchError {
    /// The provider kept answering "too many requests" until retries ran out.
    #[error("Rate limited by rank API: {message}")]
    RateLimited {
        /// Provider-supplied message.
        message: String,
    },

    /// The provider rejected the API key.
    #[error("Rank API rejected the API key: {message}")]
    Unauthorized {
        /// Provider-supplied message.
        message: String,
    },

    /// Anything else that escaped the retry loop.
    #[error("Rank fetch failed: {0}")]
    Failed(String),
}

impl RankFetchError {
    /// Returns true for the rate-limited signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
