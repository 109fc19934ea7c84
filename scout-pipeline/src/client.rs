//! Shared HTTP client for source adapters
//!
//! One `reqwest::Client` with a browser-like user agent, a per-request
//! timeout, a minimum interval between requests (politeness toward career
//! portals and the OpenAlex API), and a small retry budget with exponential
//! backoff for idempotent GETs. Parse failures are never retried.

use scout_common::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 250;

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// HTTP fetcher shared across all source adapters in a run
pub struct HttpClient {
    inner: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl HttpClient {
    pub fn new(min_interval_ms: u64) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            rate_limiter: RateLimiter::new(min_interval_ms),
        })
    }

    /// GET a page body as text, retrying transient failures.
    pub async fn get_text(&self, source: &str, url: &str) -> Result<String> {
        let response = self.get_with_retry(source, url, &[]).await?;
        response.text().await.map_err(|e| Error::SourceUnavailable {
            source: source.to_string(),
            reason: format!("Failed to read body from {}: {}", url, e),
        })
    }

    /// GET a JSON endpoint with query parameters, retrying transient failures.
    ///
    /// A body that fetches but does not deserialize is a malformed record,
    /// not a retryable network failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        source: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.get_with_retry(source, url, query).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::MalformedRecord(format!("Bad JSON from {}: {}", url, e)))
    }

    async fn get_with_retry(
        &self,
        source: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let mut last_reason = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let backoff = Duration::from_millis(BACKOFF_BASE_MS * (1 << (attempt - 1)));
                tracing::debug!(url = %url, attempt, "Backing off {:?} before retry", backoff);
                tokio::time::sleep(backoff).await;
            }
            self.rate_limiter.wait().await;

            let result = self.inner.get(url).query(query).send().await;
            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    // 5xx and 429 are worth retrying; other client errors are not
                    if status.is_server_error() || status.as_u16() == 429 {
                        last_reason = format!("HTTP {} from {}", status, url);
                        tracing::warn!(url = %url, status = %status, attempt, "Retryable HTTP status");
                        continue;
                    }
                    return Err(Error::SourceUnavailable {
                        source: source.to_string(),
                        reason: format!("HTTP {} from {}", status, url),
                    });
                }
                Err(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                    last_reason = format!("{}", e);
                    tracing::warn!(url = %url, attempt, error = %e, "Retryable network failure");
                }
                Err(e) => {
                    return Err(Error::SourceUnavailable {
                        source: source.to_string(),
                        reason: format!("Request to {} failed: {}", url, e),
                    });
                }
            }
        }

        Err(Error::SourceUnavailable {
            source: source.to_string(),
            reason: format!(
                "Gave up on {} after {} attempts: {}",
                url, MAX_ATTEMPTS, last_reason
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new(250).is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(100);

        let start = Instant::now();
        limiter.wait().await;
        let first_elapsed = start.elapsed();
        limiter.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(50));
        assert!(second_elapsed >= Duration::from_millis(90));
    }
}
