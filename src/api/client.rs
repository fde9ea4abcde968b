//! Explorer API client

use super::response::parse_response;
use super::urls::{LinkHelper, UrlBuilder};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::{JsonValue, StringMap};
use tracing::debug;

/// Calls `GET <api_url>?module=…&action=…` and unwraps the response envelope
#[derive(Debug)]
pub struct Client {
    http: HttpClient,
    urls: UrlBuilder,
}

impl Client {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut urls = UrlBuilder::new(&config.api_key, config.api_kind, &config.network);
        if let Some(api_url) = &config.api_url {
            urls = urls.with_api_url(api_url);
        }
        let http = HttpClient::new(config.to_http_config())?;

        Ok(Self::from_parts(http, urls))
    }

    /// Create a client from an HTTP client and URL builder
    pub fn from_parts(http: HttpClient, urls: UrlBuilder) -> Self {
        Self { http, urls }
    }

    /// URL builder in use
    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Explorer web links
    pub fn links(&self) -> LinkHelper {
        self.urls.links()
    }

    /// Native currency ticker of the network
    pub fn currency(&self) -> &'static str {
        self.urls.currency()
    }

    /// Call one API action and return its `result`
    pub async fn call(&self, module: &str, action: &str, query: StringMap) -> Result<JsonValue> {
        debug!("Calling {module}/{action} with {query:?}");

        let mut query = query;
        query.insert("module".to_string(), module.to_string());
        query.insert("action".to_string(), action.to_string());
        self.urls.sign(&mut query);

        let body: JsonValue = self.http.get_json(self.urls.api_url(), &query).await?;
        parse_response(body)
    }
}
