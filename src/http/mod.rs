//! HTTP transport
//!
//! GET requests with retry, backoff and rate limiting. The explorer API
//! client in [`crate::api`] sits on top of this.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connection errors
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig, DEFAULT_REQUESTS_PER_SECOND};
