//! Trait seams between the rank sync pipeline and its collaborators.

use std::future::Future;
use std::sync::Arc;

use crate::error::RankFetchError;
use crate::models::RankProfile;

/// Anything that can look up a player's competitive rank.
///
/// Implementations own their retry policy. Plain absence of data after all
/// retries is `Ok(None)`; only distinguishable conditions (rate limiting,
/// a rejected key) are errors.
pub trait RankSource: Send + Sync {
    /// Fetches the rank profile for `username#tag` in `region`.
    ///
    /// `region` is the stored region code; mapping to provider codes is the
    /// implementation's job.
    fn fetch_profile(
        &self,
        username: &str,
        tag: &str,
        region: &str,
        api_key: &str,
        max_retries: u32,
    ) -> impl Future<Output = Result<Option<RankProfile>, RankFetchError>> + Send;
}

impl<T: RankSource> RankSource for Arc<T> {
    fn fetch_profile(
        &self,
        username: &str,
        tag: &str,
        region: &str,
        api_key: &str,
        max_retries: u32,
    ) -> impl Future<Output = Result<Option<RankProfile>, RankFetchError>> + Send {
        (**self).fetch_profile(username, tag, region, api_key, max_retries)
    }
}

/// Hands out the rank API key.
pub trait ApiKeySource: Send + Sync {
    /// Returns the configured key, or `None` when none is set.
    fn api_key(&self) -> Option<String>;
}

/// Fixed key, for callers that resolved the key themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticApiKey(Option<String>);

impl StaticApiKey {
    /// Wraps a key. Blank keys count as missing.
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.trim().is_empty()))
    }
}

impl ApiKeySource for StaticApiKey {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
