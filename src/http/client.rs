//! Explorer transport
//!
//! Every explorer call is a `GET <api_url>?<query>` returning a JSON
//! envelope. [`HttpClient`] sends those requests, waits on the rate limiter,
//! retries throttled or failed attempts and decodes the body.
//!
//! The query carries the `apikey`, so transport errors are stripped of their
//! URL before they leave this module.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Seconds to wait on a 429 without a usable `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Characters of a bad body kept in decode errors
const BODY_PREVIEW_CHARS: usize = 200;

/// Transport settings
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any retry delay
    pub max_backoff: Duration,
    /// How the delay grows between retries
    pub backoff_type: BackoffType,
    /// Request quota, `None` to send unthrottled
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

impl HttpClientConfig {
    /// Start from the defaults
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the retry delay curve
    #[must_use]
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Send requests without a quota
    #[must_use]
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// GET-only JSON client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("scanpager/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Transport settings in use
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send `GET url?query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &StringMap) -> Result<T> {
        let response = self.send(url, query).await?;
        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::decode(format!("Response is not valid JSON ({e}): {}", preview(&body)))
        })
    }

    /// Send `GET url?query`, retrying until a non-retryable answer arrives
    async fn send(&self, url: &str, query: &StringMap) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let outcome = self.client.get(url).query(query).send().await;
            let retry = attempt < max_retries;

            match outcome {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if !retry {
                            return Err(Error::RateLimited {
                                retry_after_seconds: retry_after,
                            });
                        }
                        warn!(
                            "Throttled by {url}, attempt {}/{}, waiting {retry_after}s",
                            attempt + 1,
                            max_retries + 1,
                        );
                        tokio::time::sleep(Duration::from_secs(retry_after)).await;
                        attempt += 1;
                        continue;
                    }

                    if is_retryable_status(status) && retry {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "{url} answered {}, attempt {}/{}, retrying in {delay:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::http_status(status.as_u16(), ""));
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!("GET {url} answered {}", status.as_u16());
                    return Ok(response);
                }
                Err(e) if e.is_timeout() => {
                    let timeout_ms = self.config.timeout.as_millis() as u64;
                    if !retry {
                        return Err(Error::Timeout { timeout_ms });
                    }
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "GET {url} timed out, attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1,
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    last_error = Some(Error::Timeout { timeout_ms });
                }
                Err(e) if e.is_connect() && retry => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        "Cannot connect to {url}, attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1,
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    last_error = Some(transport(e));
                }
                Err(e) => return Err(transport(e)),
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Wrap a reqwest failure, dropping the signed request URL
fn transport(e: reqwest::Error) -> Error {
    Error::Http(e.without_url())
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
