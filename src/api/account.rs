//! Account module endpoints
//!
//! Page-sized calls to `module=account`. Callers pass snake_case parameter
//! names (`start_block`, `contract_address`, …); they are renamed to the
//! API's spelling here.

use super::client::Client;
use super::response::expect_records;
use crate::error::Result;
use crate::pagination::PageFetcher;
use crate::types::{JsonValue, Params, StringMap};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Parameter names that differ between callers and the API
const PARAM_RENAMES: &[(&str, &str)] = &[
    ("start_block", "startblock"),
    ("end_block", "endblock"),
    ("contract_address", "contractaddress"),
    ("block_type", "blocktype"),
    ("tx_hash", "txhash"),
];

// ============================================================================
// Actions
// ============================================================================

/// Token standard of a transfer listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenStandard {
    /// Fungible tokens
    #[default]
    Erc20,
    /// NFTs
    Erc721,
    /// Multi-tokens
    Erc1155,
}

impl TokenStandard {
    /// API action listing transfers of this standard
    pub fn action(&self) -> &'static str {
        match self {
            TokenStandard::Erc20 => "tokentx",
            TokenStandard::Erc721 => "tokennfttx",
            TokenStandard::Erc1155 => "token1155tx",
        }
    }
}

/// A paged account listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    /// `getminedblocks`
    MinedBlocks,
    /// `txlist`
    NormalTxs,
    /// `txlistinternal`
    InternalTxs,
    /// `tokentx`, `tokennfttx` or `token1155tx`
    TokenTransfers(TokenStandard),
}

impl AccountAction {
    /// API action name
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountAction::MinedBlocks => "getminedblocks",
            AccountAction::NormalTxs => "txlist",
            AccountAction::InternalTxs => "txlistinternal",
            AccountAction::TokenTransfers(standard) => standard.action(),
        }
    }
}

impl fmt::Display for AccountAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of mined blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Canonical blocks
    #[default]
    Blocks,
    /// Uncle blocks
    Uncles,
}

impl BlockType {
    /// API value
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Blocks => "blocks",
            BlockType::Uncles => "uncles",
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl SortOrder {
    /// API value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Render parameters as an account query, using the API's names
pub fn account_query(params: &Params) -> StringMap {
    params
        .to_query()
        .into_iter()
        .map(|(key, value)| (api_param_name(&key).to_string(), value))
        .collect()
}

fn api_param_name(name: &str) -> &str {
    PARAM_RENAMES
        .iter()
        .find(|(ours, _)| *ours == name)
        .map_or(name, |(_, theirs)| *theirs)
}

impl Client {
    /// Fetch one page of an account listing
    pub async fn account_page(
        &self,
        action: AccountAction,
        params: &Params,
    ) -> Result<Vec<JsonValue>> {
        let result = self
            .call("account", action.as_str(), account_query(params))
            .await?;
        expect_records(result)
    }
}

/// One account action bound to a client, usable as a page fetcher
#[derive(Debug, Clone)]
pub struct AccountEndpoint {
    client: Arc<Client>,
    action: AccountAction,
}

impl AccountEndpoint {
    /// Bind an action to a client
    pub fn new(client: Arc<Client>, action: AccountAction) -> Self {
        Self { client, action }
    }

    /// The bound action
    pub fn action(&self) -> AccountAction {
        self.action
    }
}

#[async_trait]
impl PageFetcher<JsonValue> for AccountEndpoint {
    async fn fetch_page(&self, params: Params) -> Result<Vec<JsonValue>> {
        self.client.account_page(self.action, &params).await
    }
}
