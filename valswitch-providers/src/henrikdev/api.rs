//! HenrikDev API client.

use reqwest::StatusCode;
use tracing::{debug, error, info, instrument, warn};
use url::Url;
use valswitch_core::{RankFetchError, RankProfile, RankSource, provider_region_code};
use valswitch_fetch::{HttpClient, RetryStrategy, redact};

use super::error::HenrikDevError;
use super::parser::{parse_error_body, parse_mmr_response};

// ============================================================================
// Constants
// ============================================================================

/// `HenrikDev` API base URL.
pub const HENRIKDEV_API_BASE: &str = "https://api.henrikdev.xyz";

/// MMR endpoint path, followed by `/{region}/{name}/{tag}`.
const MMR_PATH: [&str; 3] = ["valorant", "v2", "mmr"];

// ============================================================================
// API Client
// ============================================================================

/// Rank client for the `HenrikDev` MMR endpoint.
///
/// Each attempt sleeps a random jitter first. Empty results back off
/// exponentially, "too many requests" waits out a fixed cooldown, and a
/// rejected key stops immediately.
#[derive(Debug, Clone)]
pub struct HenrikDevClient {
    http: HttpClient,
    base_url: String,
    retry: RetryStrategy,
}

impl HenrikDevClient {
    /// Creates a client against the public API with default timings.
    pub fn new() -> Result<Self, HenrikDevError> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: HENRIKDEV_API_BASE.to_string(),
            retry: RetryStrategy::default(),
        })
    }

    /// Points the client at another host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the retry timings. Attempt counts still come from each call.
    pub fn with_retry_strategy(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the MMR URL with each path segment percent-encoded.
    pub fn mmr_url(&self, region: &str, username: &str, tag: &str) -> Result<Url, HenrikDevError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| HenrikDevError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| HenrikDevError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(MMR_PATH)
            .extend([provider_region_code(region), username, tag]);
        Ok(url)
    }

    /// One request.
    async fn try_fetch(
        &self,
        username: &str,
        tag: &str,
        region: &str,
        api_key: &str,
    ) -> Result<Option<RankProfile>, HenrikDevError> {
        let url = self.mmr_url(region, username, tag)?;
        debug!(url = %redact(url.as_str(), api_key), "Requesting MMR");

        let response = self.http.get_with_auth(url.as_str(), api_key).await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(parse_mmr_response(&body, username, tag, region));
        }

        let parsed = parse_error_body(&body);
        let body_status = parsed.as_ref().map(|p| p.status);
        let message = parsed
            .map(|p| p.message)
            .unwrap_or_else(|| status.to_string());

        match parsed_status(status, body_status) {
            StatusCode::TOO_MANY_REQUESTS => Err(HenrikDevError::RateLimited(message)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(HenrikDevError::AuthenticationFailed(message))
            }
            other => {
                if body_status.is_none() {
                    warn!(status = %status, body = %redact(&body, api_key), "Non-JSON error response");
                } else {
                    warn!(status = %other, message = %message, "Rank API error");
                }
                Ok(None)
            }
        }
    }

    /// Fetches a profile with up to `max_retries` attempts.
    ///
    /// Returns `Ok(None)` when every attempt came back empty or failed
    /// generically. Returns an error only when the last attempt was rate
    /// limited, or as soon as the key is rejected.
    #[instrument(skip(self, api_key), fields(player = %format!("{username}#{tag}")))]
    pub async fn fetch_profile(
        &self,
        username: &str,
        tag: &str,
        region: &str,
        api_key: &str,
        max_retries: u32,
    ) -> Result<Option<RankProfile>, RankFetchError> {
        with_retries(&self.retry, max_retries, || {
            self.try_fetch(username, tag, region, api_key)
        })
        .await
    }
}

/// Runs up to `max_retries` attempts under `retry`'s timings.
///
/// Every attempt sleeps a jitter first. An empty attempt backs off
/// by `delay_for_attempt`, a rate-limited one waits the cooldown, and a
/// rejected key ends the loop at once.
async fn with_retries<F, Fut>(
    retry: &RetryStrategy,
    max_retries: u32,
    mut attempt_once: F,
) -> Result<Option<RankProfile>, RankFetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<RankProfile>, HenrikDevError>>,
{
    let attempts = max_retries.max(1);

    for attempt in 1..=attempts {
        let has_next = attempt < attempts;
        tokio::time::sleep(retry.jitter()).await;

        match attempt_once().await {
            Ok(Some(profile)) => {
                info!(attempt, rank = %profile.current_rank, "Rank fetched");
                return Ok(Some(profile));
            }
            Ok(None) => {
                if has_next {
                    let delay = retry.delay_for_attempt(attempt);
                    debug!(attempt, attempts, delay_ms = delay.as_millis(), "Empty result, backing off");
                    tokio::time::sleep(delay).await;
                }
            }
            Err(HenrikDevError::RateLimited(message)) => {
                warn!(attempt, attempts, message = %message, "Rate limited");
                if !has_next {
                    return Err(RankFetchError::RateLimited { message });
                }
                tokio::time::sleep(retry.rate_limit_cooldown).await;
            }
            Err(e @ HenrikDevError::AuthenticationFailed(_)) => {
                warn!(error = %e, "API key rejected");
                return Err(e.into());
            }
            Err(e) => {
                error!(attempt, attempts, error = %e, "Rank request failed");
                if !has_next {
                    break;
                }
            }
        }
    }

    Ok(None)
}

/// Folds the body status into the HTTP status; the body wins when present.
fn parsed_status(http: StatusCode, body: Option<u16>) -> StatusCode {
    body.and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| !s.is_success())
        .unwrap_or(http)
}

impl RankSource for HenrikDevClient {
    async fn fetch_profile(
        &self,
        username: &str,
        tag: &str,
        region: &str,
        api_key: &str,
        max_retries: u32,
    ) -> Result<Option<RankProfile>, RankFetchError> {
        HenrikDevClient::fetch_profile(self, username, tag, region, api_key, max_retries).await
    }
}

// ============================================================================
// Tests
// ============================================================================
