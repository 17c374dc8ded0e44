//! HTTP client used for rank API calls.

use crate::error::FetchError;
use reqwest::{Client, Response, header};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin wrapper over [`reqwest::Client`] with Valswitch defaults.
///
/// Retries are owned by the caller; this client issues exactly one request
/// per call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("valswitch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs a GET request with a raw `Authorization` header.
    ///
    /// Any status is returned as-is; the header value is never logged.
    #[instrument(skip(self, auth_header), fields(url = %url))]
    pub async fn get_with_auth(&self, url: &str, auth_header: &str) -> Result<Response, FetchError> {
        debug!("Making GET request");

        let response = self
            .inner
            .get(url)
            .header(header::AUTHORIZATION, auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout.as_secs())
                } else {
                    FetchError::Http(e)
                }
            })?;

        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

/// Replaces every occurrence of `secret` in `text` with `***`.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new().is_ok());
        assert!(HttpClient::with_timeout(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_timeout_reports_configured_duration() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(1));

        let err = client
            .get_with_auth(&format!("http://{addr}/"), "HDEV-key")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(1)), "{err:?}");
        server.abort();
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("key=HDEV-123 sent", "HDEV-123"), "key=*** sent");
        assert_eq!(redact("nothing here", ""), "nothing here");
    }
}
