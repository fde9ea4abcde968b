//! Account listings as item streams
//!
//! [`AccountStreams`] binds the pagination drivers to the account endpoints:
//! mined blocks are walked page by page, transaction and transfer listings
//! interval by interval over the block range. Arguments are validated before
//! a stream is returned, so a bad call never reaches the network.

use crate::api::{AccountAction, AccountEndpoint, BlockType, Client, SortOrder, TokenStandard};
use crate::config::StreamDefaults;
use crate::error::{Error, Result};
use crate::pagination::{parse_by_blocks, parse_by_pages, BlockRange, ItemStream};
use crate::types::{JsonValue, Params};
use std::sync::Arc;
use tracing::debug;

/// Page size parameter
pub const OFFSET_PARAM: &str = "offset";

/// Block bounds and ordering of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxRange {
    /// First block (inclusive)
    pub start_block: u64,
    /// Last block (inclusive); `None` means the chain head
    pub end_block: Option<u64>,
    /// Ordering inside each page
    pub sort: Option<SortOrder>,
}

impl TxRange {
    /// Everything from the genesis block to the chain head
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first block
    #[must_use]
    pub fn start_block(mut self, block: u64) -> Self {
        self.start_block = block;
        self
    }

    /// Set the last block
    #[must_use]
    pub fn end_block(mut self, block: u64) -> Self {
        self.end_block = Some(block);
        self
    }

    /// Set the ordering
    #[must_use]
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Stream factory for account listings
#[derive(Debug, Clone)]
pub struct AccountStreams {
    client: Arc<Client>,
    defaults: StreamDefaults,
}

impl AccountStreams {
    /// Create streams over a client with default page and interval sizes
    pub fn new(client: Arc<Client>) -> Self {
        Self::with_defaults(client, StreamDefaults::default())
    }

    /// Create streams with explicit page and interval sizes
    pub fn with_defaults(client: Arc<Client>, defaults: StreamDefaults) -> Self {
        Self { client, defaults }
    }

    /// Page and interval sizes in use
    pub fn defaults(&self) -> StreamDefaults {
        self.defaults
    }

    /// Blocks mined by `address`
    pub fn mined_blocks(
        &self,
        address: &str,
        block_type: BlockType,
    ) -> Result<ItemStream<JsonValue>> {
        let address = require("address", Some(address))?;

        let params = self
            .base_params()
            .with("address", address)
            .with("block_type", block_type.as_str());
        let endpoint = self.endpoint(AccountAction::MinedBlocks);

        debug!("Streaming mined blocks of {address}");
        Ok(parse_by_pages(endpoint, params))
    }

    /// Normal transactions of `address`
    pub fn normal_txs(&self, address: &str, range: TxRange) -> Result<ItemStream<JsonValue>> {
        let address = require("address", Some(address))?;

        let params = self.base_params().with("address", address);
        Ok(self.by_blocks(AccountAction::NormalTxs, params, range))
    }

    /// Internal transactions of `address`, or of the transaction `tx_hash`
    pub fn internal_txs(
        &self,
        address: Option<&str>,
        tx_hash: Option<&str>,
        range: TxRange,
    ) -> Result<ItemStream<JsonValue>> {
        let (address, tx_hash) = one_of(("address", address), ("txhash", tx_hash))?;

        let params = self
            .base_params()
            .with("address", address)
            .with("tx_hash", tx_hash);
        Ok(self.by_blocks(AccountAction::InternalTxs, params, range))
    }

    /// Token transfers of `address`, of the token `contract_address`, or both
    pub fn token_transfers(
        &self,
        address: Option<&str>,
        contract_address: Option<&str>,
        standard: TokenStandard,
        range: TxRange,
    ) -> Result<ItemStream<JsonValue>> {
        let (address, contract_address) = one_of(
            ("address", address),
            ("contract_address", contract_address),
        )?;

        let params = self
            .base_params()
            .with("address", address)
            .with("contract_address", contract_address);
        Ok(self.by_blocks(AccountAction::TokenTransfers(standard), params, range))
    }

    fn base_params(&self) -> Params {
        Params::new().with(OFFSET_PARAM, self.defaults.offset)
    }

    fn endpoint(&self, action: AccountAction) -> Arc<AccountEndpoint> {
        Arc::new(AccountEndpoint::new(Arc::clone(&self.client), action))
    }

    fn by_blocks(
        &self,
        action: AccountAction,
        params: Params,
        range: TxRange,
    ) -> ItemStream<JsonValue> {
        let params = params.with("sort", range.sort.map(|sort| sort.as_str()));
        let blocks = BlockRange::new(range.start_block, range.end_block, self.defaults.block_limit);

        debug!(
            "Streaming {action} from block {} to {:?}",
            range.start_block, range.end_block
        );
        parse_by_blocks(
            self.endpoint(action),
            Arc::clone(&self.client),
            params,
            blocks,
        )
    }
}

/// Treat blank identifiers as missing
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    present(value).ok_or_else(|| Error::validation(format!("{name} must be specified.")))
}

/// At least one of two identifiers must be given
fn one_of<'a>(
    (first_name, first): (&str, Option<&'a str>),
    (second_name, second): (&str, Option<&'a str>),
) -> Result<(Option<&'a str>, Option<&'a str>)> {
    let (first, second) = (present(first), present(second));
    if first.is_none() && second.is_none() {
        return Err(Error::validation(format!(
            "At least one of {first_name} or {second_name} must be specified."
        )));
    }
    Ok((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use futures::{StreamExt, TryStreamExt};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn streams_for(server: &MockServer, defaults: StreamDefaults) -> AccountStreams {
        let mut config = ClientConfig::new("key");
        config.api_url = Some(format!("{}/api", server.uri()));
        config.http.max_retries = 0;
        config.http.rate_limit = None;
        let client = Arc::new(Client::new(&config).unwrap());
        AccountStreams::with_defaults(client, defaults)
    }

    fn records(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "message": "OK", "result": result,
        }))
    }

    fn no_records() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "0", "message": "No transactions found", "result": [],
        }))
    }

    fn validation_message(result: Result<ItemStream<JsonValue>>) -> String {
        match result {
            Err(Error::Validation { message }) => message,
            Err(other) => panic!("expected a validation error, got {other}"),
            Ok(_) => panic!("expected a validation error"),
        }
    }

    #[tokio::test]
    async fn test_token_transfers_requires_an_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(records(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        let streams = streams_for(&server, StreamDefaults::default());

        let message = validation_message(streams.token_transfers(
            None,
            None,
            TokenStandard::Erc20,
            TxRange::new().end_block(1),
        ));
        assert_eq!(
            message,
            "At least one of address or contract_address must be specified."
        );

        let message = validation_message(streams.token_transfers(
            Some(" "),
            Some(""),
            TokenStandard::Erc721,
            TxRange::new(),
        ));
        assert!(message.starts_with("At least one of"));
    }

    #[tokio::test]
    async fn test_other_listings_validate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(records(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        let streams = streams_for(&server, StreamDefaults::default());

        assert_eq!(
            validation_message(streams.mined_blocks("", BlockType::Blocks)),
            "address must be specified."
        );
        assert_eq!(
            validation_message(streams.normal_txs("  ", TxRange::new())),
            "address must be specified."
        );
        assert_eq!(
            validation_message(streams.internal_txs(None, None, TxRange::new())),
            "At least one of address or txhash must be specified."
        );
    }

    #[tokio::test]
    async fn test_mined_blocks_walks_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "getminedblocks"))
            .and(query_param("blocktype", "uncles"))
            .and(query_param("offset", "2"))
            .and(query_param("page", "1"))
            .respond_with(records(json!([{"blockNumber": "1"}, {"blockNumber": "2"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(records(json!([{"blockNumber": "3"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "3"))
            .respond_with(no_records())
            .mount(&server)
            .await;
        let defaults = StreamDefaults {
            offset: 2,
            block_limit: 10,
        };
        let streams = streams_for(&server, defaults);

        let items: Vec<JsonValue> = streams
            .mined_blocks("0xminer", BlockType::Uncles)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(
            items,
            vec![
                json!({"blockNumber": "1"}),
                json!({"blockNumber": "2"}),
                json!({"blockNumber": "3"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_token_transfers_resolve_chain_head() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("module", "proxy"))
            .and(query_param("action", "eth_blockNumber"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 83, "result": "0x14",
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "tokentx"))
            .and(query_param("contractaddress", "0xtoken"))
            .and(query_param("startblock", "0"))
            .and(query_param("endblock", "9"))
            .and(query_param("page", "1"))
            .respond_with(records(json!([{"hash": "a"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "tokentx"))
            .and(query_param("startblock", "10"))
            .and(query_param("endblock", "19"))
            .and(query_param("page", "1"))
            .respond_with(records(json!([{"hash": "b"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "tokentx"))
            .and(query_param("startblock", "20"))
            .and(query_param("endblock", "20"))
            .and(query_param("page", "1"))
            .respond_with(records(json!([{"hash": "c"}])))
            .mount(&server)
            .await;
        // every second page is empty
        Mock::given(method("GET"))
            .and(query_param("action", "tokentx"))
            .and(query_param("page", "2"))
            .respond_with(no_records())
            .mount(&server)
            .await;
        let defaults = StreamDefaults {
            offset: 100,
            block_limit: 10,
        };
        let streams = streams_for(&server, defaults);

        let hashes: Vec<JsonValue> = streams
            .token_transfers(None, Some("0xtoken"), TokenStandard::Erc20, TxRange::new())
            .unwrap()
            .map_ok(|item| item["hash"].clone())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(hashes, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[tokio::test]
    async fn test_normal_txs_with_end_block_skips_chain_head() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("module", "proxy"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlist"))
            .and(query_param("address", "0xabc"))
            .and(query_param("sort", "desc"))
            .and(query_param("page", "1"))
            .respond_with(records(json!([{"hash": "x"}])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlist"))
            .and(query_param("page", "2"))
            .respond_with(no_records())
            .mount(&server)
            .await;
        let streams = streams_for(&server, StreamDefaults::default());

        let items: Vec<JsonValue> = streams
            .normal_txs(
                "0xabc",
                TxRange::new().start_block(5).end_block(6).sort(SortOrder::Desc),
            )
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![json!({"hash": "x"})]);
    }

    #[tokio::test]
    async fn test_internal_txs_api_error_ends_stream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlistinternal"))
            .and(query_param("txhash", "0xfeed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0", "message": "NOTOK", "result": "Invalid API Key",
            })))
            .expect(1)
            .mount(&server)
            .await;
        let streams = streams_for(&server, StreamDefaults::default());

        let results: Vec<Result<JsonValue>> = streams
            .internal_txs(None, Some("0xfeed"), TxRange::new().end_block(100))
            .unwrap()
            .collect()
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().to_string(),
            "[NOTOK] Invalid API Key"
        );
    }

    #[tokio::test]
    async fn test_unreachable_explorer_error_hides_api_key() {
        let mut config = ClientConfig::new("SECRETKEY123");
        config.api_url = Some("http://127.0.0.1:1/api".to_string());
        config.http.max_retries = 0;
        config.http.rate_limit = None;
        let streams = AccountStreams::new(Arc::new(Client::new(&config).unwrap()));

        let err = streams
            .normal_txs("0xabc", TxRange::new().end_block(10))
            .unwrap()
            .try_collect::<Vec<JsonValue>>()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
    }
}
