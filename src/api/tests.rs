//! Tests for the explorer API client

use super::*;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::pagination::{BlockNumberSource, PageFetcher};
use crate::types::{Params, StringMap};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test_api_key";

async fn mock_client(server: &MockServer) -> Client {
    let mut config = ClientConfig::new(API_KEY);
    config.api_url = Some(format!("{}/api", server.uri()));
    config.http.max_retries = 0;
    config.http.rate_limit = None;
    Client::new(&config).unwrap()
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "1",
        "message": "OK",
        "result": result,
    }))
}

// ============================================================================
// URLs
// ============================================================================

#[test_case("eth", "main", "https://api.etherscan.io/api")]
#[test_case("eth", "ropsten", "https://api-ropsten.etherscan.io/api")]
#[test_case("eth", "kovan", "https://api-kovan.etherscan.io/api")]
#[test_case("eth", "rinkeby", "https://api-rinkeby.etherscan.io/api")]
#[test_case("eth", "goerli", "https://api-goerli.etherscan.io/api")]
#[test_case("eth", "sepolia", "https://api-sepolia.etherscan.io/api")]
#[test_case("bsc", "main", "https://api.bscscan.com/api")]
#[test_case("bsc", "testnet", "https://api-testnet.bscscan.com/api")]
#[test_case("avax", "main", "https://api.snowtrace.io/api")]
#[test_case("avax", "testnet", "https://api-testnet.snowtrace.io/api")]
#[test_case("polygon", "main", "https://api.polygonscan.com/api")]
#[test_case("polygon", "testnet", "https://api-testnet.polygonscan.com/api")]
#[test_case("optimism", "main", "https://api-optimistic.etherscan.io/api")]
#[test_case("optimism", "goerli", "https://api-goerli-optimistic.etherscan.io/api")]
#[test_case("arbitrum", "main", "https://api.arbiscan.io/api")]
#[test_case("arbitrum", "nova", "https://api-nova.arbiscan.io/api")]
#[test_case("arbitrum", "goerli", "https://api-goerli.arbiscan.io/api")]
#[test_case("fantom", "main", "https://api.ftmscan.com/api")]
#[test_case("fantom", "testnet", "https://api-testnet.ftmscan.com/api")]
fn test_api_url(api_kind: &str, network: &str, expected: &str) {
    let kind = ApiKind::from_str(api_kind).unwrap();
    let urls = UrlBuilder::new(API_KEY, kind, network);
    assert_eq!(urls.api_url(), expected);
}

#[test_case("eth", "main", "https://etherscan.io")]
#[test_case("eth", "ropsten", "https://ropsten.etherscan.io")]
#[test_case("eth", "kovan", "https://kovan.etherscan.io")]
#[test_case("eth", "rinkeby", "https://rinkeby.etherscan.io")]
#[test_case("eth", "goerli", "https://goerli.etherscan.io")]
#[test_case("eth", "sepolia", "https://sepolia.etherscan.io")]
#[test_case("bsc", "main", "https://bscscan.com")]
#[test_case("bsc", "testnet", "https://testnet.bscscan.com")]
#[test_case("avax", "main", "https://snowtrace.io")]
#[test_case("avax", "testnet", "https://testnet.snowtrace.io")]
#[test_case("polygon", "main", "https://polygonscan.com")]
#[test_case("polygon", "testnet", "https://mumbai.polygonscan.com")]
#[test_case("optimism", "main", "https://optimistic.etherscan.io")]
#[test_case("optimism", "goerli", "https://goerli-optimism.etherscan.io")]
#[test_case("arbitrum", "main", "https://arbiscan.io")]
#[test_case("arbitrum", "nova", "https://nova.arbiscan.io")]
#[test_case("arbitrum", "goerli", "https://goerli.arbiscan.io")]
#[test_case("fantom", "main", "https://ftmscan.com")]
#[test_case("fantom", "testnet", "https://testnet.ftmscan.com")]
fn test_base_url(api_kind: &str, network: &str, expected: &str) {
    let kind = ApiKind::from_str(api_kind).unwrap();
    let urls = UrlBuilder::new(API_KEY, kind, network);
    assert_eq!(urls.base_url(), expected);
}

#[test_case(ApiKind::Eth, "ETH")]
#[test_case(ApiKind::Bsc, "BNB")]
#[test_case(ApiKind::Avax, "AVAX")]
#[test_case(ApiKind::Polygon, "MATIC")]
#[test_case(ApiKind::Optimism, "ETH")]
#[test_case(ApiKind::Arbitrum, "ETH")]
#[test_case(ApiKind::Fantom, "FTM")]
fn test_currency(kind: ApiKind, expected: &str) {
    assert_eq!(UrlBuilder::new(API_KEY, kind, "main").currency(), expected);
}

#[test]
fn test_invalid_api_kind() {
    let err = ApiKind::from_str("wrong").unwrap_err();
    assert!(err.to_string().contains("Incorrect api_kind"));
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[test]
fn test_api_kind_names_round_trip() {
    for kind in ApiKind::ALL {
        assert_eq!(ApiKind::from_str(kind.as_str()).unwrap(), kind);
    }
    assert_eq!(ApiKind::from_str("BSC").unwrap(), ApiKind::Bsc);
}

#[test]
fn test_sign() {
    let urls = UrlBuilder::new(API_KEY, ApiKind::Eth, "main");

    let mut query = StringMap::new();
    urls.sign(&mut query);
    assert_eq!(query.get("apikey").map(String::as_str), Some(API_KEY));

    let mut query = StringMap::new();
    query.insert("something".to_string(), "something".to_string());
    urls.sign(&mut query);
    assert_eq!(query.len(), 2);
}

#[test]
fn test_debug_hides_api_key() {
    let urls = UrlBuilder::new(API_KEY, ApiKind::Eth, "main");
    let debug = format!("{urls:?}");
    assert!(debug.contains("api.etherscan.io"));
    assert!(!debug.contains(API_KEY));
}

#[test]
fn test_links() {
    let links = UrlBuilder::new(API_KEY, ApiKind::Eth, "goerli").links();
    assert_eq!(links.address("0xabc"), "https://goerli.etherscan.io/address/0xabc");
    assert_eq!(links.tx("0x123"), "https://goerli.etherscan.io/tx/0x123");
    assert_eq!(links.block(42), "https://goerli.etherscan.io/block/42");
    assert_eq!(links.token("0xdef"), "https://goerli.etherscan.io/token/0xdef");

    let links = LinkHelper::new("https://bscscan.com/");
    assert_eq!(links.address("0x1"), "https://bscscan.com/address/0x1");
}

// ============================================================================
// Envelope
// ============================================================================

#[test]
fn test_parse_response_ok() {
    let result = parse_response(json!({"status": "1", "message": "OK", "result": [1, 2]})).unwrap();
    assert_eq!(result, json!([1, 2]));
}

#[test]
fn test_parse_response_proxy_result() {
    let result = parse_response(json!({"jsonrpc": "2.0", "id": 83, "result": "0x10d4f"})).unwrap();
    assert_eq!(result, json!("0x10d4f"));
}

#[test]
fn test_parse_response_empty_result() {
    let err = parse_response(json!({
        "status": "0",
        "message": "No transactions found",
        "result": [],
    }))
    .unwrap_err();
    assert!(err.is_empty_result());
}

#[test]
fn test_parse_response_api_error() {
    let err = parse_response(json!({
        "status": "0",
        "message": "NOTOK",
        "result": "Invalid API Key",
    }))
    .unwrap_err();
    assert!(!err.is_empty_result());
    assert_eq!(err.to_string(), "[NOTOK] Invalid API Key");

    let err = parse_response(json!({"status": "0", "message": "Error"})).unwrap_err();
    assert_eq!(err.to_string(), "[Error] None");
}

#[test]
fn test_parse_response_notok_message_without_status() {
    let err = parse_response(json!({"message": "NOTOK-rate", "result": null})).unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
}

#[test]
fn test_parse_response_rpc_error() {
    let err = parse_response(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": -32602, "message": "invalid argument"},
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Proxy { code: -32602, .. }));
}

#[test]
fn test_parse_response_missing_result() {
    let err = parse_response(json!({"status": "1", "message": "OK"})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_expect_records() {
    assert_eq!(expect_records(json!([{"a": 1}])).unwrap(), vec![json!({"a": 1})]);
    assert!(matches!(
        expect_records(json!("0x1")).unwrap_err(),
        Error::Decode { .. }
    ));
}

// ============================================================================
// Account Endpoints
// ============================================================================

#[test]
fn test_account_query_renames_params() {
    let params = Params::new()
        .with("address", "0xabc")
        .with("start_block", 10)
        .with("end_block", 20)
        .with("contract_address", "0xdef")
        .with("block_type", "uncles")
        .with("tx_hash", "0x123")
        .with("sort", serde_json::Value::Null)
        .with("page", 0);

    let query = account_query(&params);
    assert_eq!(query.get("address").map(String::as_str), Some("0xabc"));
    assert_eq!(query.get("startblock").map(String::as_str), Some("10"));
    assert_eq!(query.get("endblock").map(String::as_str), Some("20"));
    assert_eq!(query.get("contractaddress").map(String::as_str), Some("0xdef"));
    assert_eq!(query.get("blocktype").map(String::as_str), Some("uncles"));
    assert_eq!(query.get("txhash").map(String::as_str), Some("0x123"));
    // unset values are dropped, falsy ones are kept
    assert!(!query.contains_key("sort"));
    assert_eq!(query.get("page").map(String::as_str), Some("0"));
}

#[test_case(AccountAction::MinedBlocks, "getminedblocks")]
#[test_case(AccountAction::NormalTxs, "txlist")]
#[test_case(AccountAction::InternalTxs, "txlistinternal")]
#[test_case(AccountAction::TokenTransfers(TokenStandard::Erc20), "tokentx")]
#[test_case(AccountAction::TokenTransfers(TokenStandard::Erc721), "tokennfttx")]
#[test_case(AccountAction::TokenTransfers(TokenStandard::Erc1155), "token1155tx")]
fn test_account_action_names(action: AccountAction, expected: &str) {
    assert_eq!(action.as_str(), expected);
    assert_eq!(action.to_string(), expected);
}

#[tokio::test]
async fn test_account_page_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("module", "account"))
        .and(query_param("action", "txlist"))
        .and(query_param("apikey", API_KEY))
        .and(query_param("address", "0xabc"))
        .and(query_param("startblock", "1"))
        .and(query_param("page", "2"))
        .and(query_param_is_missing("sort"))
        .respond_with(ok(json!([{"hash": "0x1"}, {"hash": "0x2"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let params = Params::new()
        .with("address", "0xabc")
        .with("start_block", 1)
        .with("page", 2)
        .with("sort", serde_json::Value::Null);
    let records = client
        .account_page(AccountAction::NormalTxs, &params)
        .await
        .unwrap();

    assert_eq!(records, vec![json!({"hash": "0x1"}), json!({"hash": "0x2"})]);
}

#[tokio::test]
async fn test_account_endpoint_reports_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "tokennfttx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0",
            "message": "No transactions found",
            "result": [],
        })))
        .mount(&server)
        .await;

    let client = Arc::new(mock_client(&server).await);
    let endpoint = AccountEndpoint::new(
        client,
        AccountAction::TokenTransfers(TokenStandard::Erc721),
    );
    assert_eq!(
        endpoint.action(),
        AccountAction::TokenTransfers(TokenStandard::Erc721)
    );

    let err = endpoint.fetch_page(Params::new()).await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn test_account_page_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Max rate limit reached",
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let err = client
        .account_page(AccountAction::MinedBlocks, &Params::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "[NOTOK] Max rate limit reached");
}

// ============================================================================
// Proxy Endpoints
// ============================================================================

#[tokio::test]
async fn test_block_number() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("module", "proxy"))
        .and(query_param("action", "eth_blockNumber"))
        .and(query_param("apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 83,
            "result": "0x10d4f",
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    assert_eq!(client.block_number().await.unwrap(), "0x10d4f");
    assert_eq!(client.latest_block().await.unwrap(), 0x10d4f);

    let source: &dyn BlockNumberSource = &client;
    assert_eq!(source.block_number().await.unwrap(), "0x10d4f");
}

#[tokio::test]
async fn test_block_number_rpc_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 83,
            "error": {"code": -32000, "message": "header not found"},
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let err = client.block_number().await.unwrap_err();
    assert_eq!(err.to_string(), "[-32000] header not found");
}

#[test]
fn test_client_from_config() {
    let mut config = ClientConfig::new(API_KEY);
    config.api_kind = ApiKind::Polygon;
    config.network = "testnet".to_string();

    let client = Client::new(&config).unwrap();
    assert_eq!(client.urls().api_url(), "https://api-testnet.polygonscan.com/api");
    assert_eq!(client.currency(), "MATIC");
    assert_eq!(
        client.links().block(1),
        "https://mumbai.polygonscan.com/block/1"
    );
}
