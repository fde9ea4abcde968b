//! Client configuration
//!
//! Everything needed to talk to one explorer network, loadable from YAML:
//!
//! ```yaml
//! api_key: YourApiKeyToken
//! api_kind: eth
//! network: main
//! http:
//!   timeout_seconds: 30
//!   max_retries: 3
//!   retry_backoff:
//!     type: exponential
//!     initial_ms: 100
//!     max_ms: 60000
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! streams:
//!   offset: 1000
//!   block_limit: 50000
//! ```
//!
//! Every field has a default, so an empty document is a valid config.

use crate::api::{ApiKind, MAIN_NETWORK};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable read when no API key is configured
pub const API_KEY_ENV: &str = "ETHERSCAN_API_KEY";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Explorer client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as `apikey`
    #[serde(default)]
    pub api_key: String,

    /// Explorer family
    #[serde(default)]
    pub api_kind: ApiKind,

    /// Network name (`main`, `goerli`, `testnet`, …)
    #[serde(default = "default_network")]
    pub network: String,

    /// Override for the API endpoint
    #[serde(default)]
    pub api_url: Option<String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Stream defaults
    #[serde(default)]
    pub streams: StreamDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_kind: ApiKind::default(),
            network: default_network(),
            api_url: None,
            http: HttpConfig::default(),
            streams: StreamDefaults::default(),
        }
    }
}

fn default_network() -> String {
    MAIN_NETWORK.to_string()
}

impl ClientConfig {
    /// Config for an API key with every other field defaulted
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = if yaml.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Fill an empty API key from [`API_KEY_ENV`]
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.api_key = key;
            }
        }
        self
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.network.trim().is_empty() {
            return Err(Error::invalid_config("network", "cannot be empty"));
        }
        if self.streams.offset == 0 {
            return Err(Error::invalid_config("streams.offset", "must be positive"));
        }
        if self.streams.block_limit == 0 {
            return Err(Error::invalid_config(
                "streams.block_limit",
                "must be positive",
            ));
        }
        if let Some(url) = &self.api_url {
            url::Url::parse(url)?;
        }
        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn to_http_config(&self) -> HttpClientConfig {
        let backoff = &self.http.retry_backoff;
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .connect_timeout(Duration::from_secs(self.http.connect_timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                backoff.backoff_type,
                Duration::from_millis(backoff.initial_ms),
                Duration::from_millis(backoff.max_ms),
            );

        match &self.http.rate_limit {
            Some(rate_limit) => builder.rate_limit(rate_limit.clone()),
            None => builder.no_rate_limit(),
        }
        .build()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Rate limiting; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: default_rate_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

// ============================================================================
// Stream Defaults
// ============================================================================

/// Page and interval sizes used by the account streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefaults {
    /// Records per page (`offset`)
    #[serde(default = "default_offset")]
    pub offset: u64,

    /// Blocks per interval
    #[serde(default = "default_block_limit")]
    pub block_limit: u64,
}

impl Default for StreamDefaults {
    fn default() -> Self {
        Self {
            offset: default_offset(),
            block_limit: default_block_limit(),
        }
    }
}

// page × offset may not exceed 10000 records per query
fn default_offset() -> u64 {
    1_000
}

fn default_block_limit() -> u64 {
    50_000
}
