//! Explorer URLs
//!
//! Every Etherscan-family explorer follows the same layout with a handful
//! of exceptions (Optimism, Polygon testnet). [`UrlBuilder`] knows the API
//! endpoint and web root for each `(api_kind, network)` pair and signs
//! queries with the API key; [`LinkHelper`] builds explorer web links.

use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The main network name
pub const MAIN_NETWORK: &str = "main";

/// Supported explorer families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    /// Etherscan
    #[default]
    Eth,
    /// BscScan
    Bsc,
    /// Snowtrace
    Avax,
    /// PolygonScan
    Polygon,
    /// Optimistic Etherscan
    Optimism,
    /// Arbiscan
    Arbitrum,
    /// FtmScan
    Fantom,
}

impl ApiKind {
    /// All supported kinds
    pub const ALL: [ApiKind; 7] = [
        ApiKind::Eth,
        ApiKind::Bsc,
        ApiKind::Avax,
        ApiKind::Polygon,
        ApiKind::Optimism,
        ApiKind::Arbitrum,
        ApiKind::Fantom,
    ];

    /// Config/CLI name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKind::Eth => "eth",
            ApiKind::Bsc => "bsc",
            ApiKind::Avax => "avax",
            ApiKind::Polygon => "polygon",
            ApiKind::Optimism => "optimism",
            ApiKind::Arbitrum => "arbitrum",
            ApiKind::Fantom => "fantom",
        }
    }

    /// Explorer domain
    pub fn domain(&self) -> &'static str {
        match self {
            ApiKind::Eth | ApiKind::Optimism => "etherscan.io",
            ApiKind::Bsc => "bscscan.com",
            ApiKind::Avax => "snowtrace.io",
            ApiKind::Polygon => "polygonscan.com",
            ApiKind::Arbitrum => "arbiscan.io",
            ApiKind::Fantom => "ftmscan.com",
        }
    }

    /// Native currency ticker
    pub fn currency(&self) -> &'static str {
        match self {
            ApiKind::Eth | ApiKind::Optimism | ApiKind::Arbitrum => "ETH",
            ApiKind::Bsc => "BNB",
            ApiKind::Avax => "AVAX",
            ApiKind::Polygon => "MATIC",
            ApiKind::Fantom => "FTM",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ApiKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                let supported: Vec<_> = ApiKind::ALL.iter().map(ApiKind::as_str).collect();
                Error::invalid_config(
                    "api_kind",
                    format!(
                        "Incorrect api_kind '{s}', supported: {}",
                        supported.join(", ")
                    ),
                )
            })
    }
}

/// Builds API and web URLs for one explorer network
#[derive(Clone)]
pub struct UrlBuilder {
    api_key: String,
    api_kind: ApiKind,
    network: String,
    api_url: String,
    base_url: String,
}

impl UrlBuilder {
    /// Create a builder for an explorer network
    pub fn new(api_key: impl Into<String>, api_kind: ApiKind, network: impl Into<String>) -> Self {
        let network = network.into().to_lowercase();
        Self {
            api_key: api_key.into(),
            api_url: api_url(api_kind, &network),
            base_url: base_url(api_kind, &network),
            api_kind,
            network,
        }
    }

    /// Point API calls somewhere else (proxies, mock servers)
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// API endpoint, e.g. `https://api.etherscan.io/api`
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Explorer web root, e.g. `https://etherscan.io`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Explorer family
    pub fn api_kind(&self) -> ApiKind {
        self.api_kind
    }

    /// Network name
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Native currency ticker
    pub fn currency(&self) -> &'static str {
        self.api_kind.currency()
    }

    /// Add the API key to a query
    pub fn sign(&self, query: &mut StringMap) {
        query.insert("apikey".to_string(), self.api_key.clone());
    }

    /// Web links for this explorer
    pub fn links(&self) -> LinkHelper {
        LinkHelper::new(self.base_url.clone())
    }
}

impl fmt::Debug for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlBuilder")
            .field("api_kind", &self.api_kind)
            .field("network", &self.network)
            .field("api_url", &self.api_url)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn api_url(kind: ApiKind, network: &str) -> String {
    let host = match (kind, network) {
        (ApiKind::Optimism, MAIN_NETWORK) => "api-optimistic.etherscan.io".to_string(),
        (ApiKind::Optimism, network) => format!("api-{network}-optimistic.etherscan.io"),
        (kind, MAIN_NETWORK) => format!("api.{}", kind.domain()),
        (kind, network) => format!("api-{network}.{}", kind.domain()),
    };
    format!("https://{host}/api")
}

fn base_url(kind: ApiKind, network: &str) -> String {
    let host = match (kind, network) {
        (ApiKind::Optimism, MAIN_NETWORK) => "optimistic.etherscan.io".to_string(),
        (ApiKind::Optimism, network) => format!("{network}-optimism.etherscan.io"),
        (ApiKind::Polygon, "testnet") => "mumbai.polygonscan.com".to_string(),
        (kind, MAIN_NETWORK) => kind.domain().to_string(),
        (kind, network) => format!("{network}.{}", kind.domain()),
    };
    format!("https://{host}")
}

/// Explorer web links
#[derive(Debug, Clone)]
pub struct LinkHelper {
    base_url: String,
}

impl LinkHelper {
    /// Create a helper for an explorer web root
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link to an address page
    pub fn address(&self, address: &str) -> String {
        self.link("address", address)
    }

    /// Link to a transaction page
    pub fn tx(&self, tx_hash: &str) -> String {
        self.link("tx", tx_hash)
    }

    /// Link to a block page
    pub fn block(&self, block: u64) -> String {
        self.link("block", &block.to_string())
    }

    /// Link to a token page
    pub fn token(&self, token_address: &str) -> String {
        self.link("token", token_address)
    }

    fn link(&self, kind: &str, id: &str) -> String {
        format!("{}/{kind}/{id}", self.base_url)
    }
}
