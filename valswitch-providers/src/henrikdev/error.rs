//! HenrikDev-specific errors.

use thiserror::Error;
use valswitch_core::RankFetchError;
use valswitch_fetch::FetchError;

/// Errors from a single `HenrikDev` request.
#[derive(Debug, Error)]
pub enum HenrikDevError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The API answered "too many requests".
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The API rejected the key.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<FetchError> for HenrikDevError {
    fn from(err: FetchError) -> Self {
        HenrikDevError::HttpError(err.to_string())
    }
}

impl From<reqwest::Error> for HenrikDevError {
    fn from(err: reqwest::Error) -> Self {
        HenrikDevError::HttpError(err.to_string())
    }
}

impl From<HenrikDevError> for RankFetchError {
    fn from(err: HenrikDevError) -> Self {
        match err {
            HenrikDevError::RateLimited(message) => RankFetchError::RateLimited { message },
            HenrikDevError::AuthenticationFailed(message) => {
                RankFetchError::Unauthorized { message }
            }
            other => RankFetchError::Failed(other.to_string()),
        }
    }
}
