use core_logic::models::TokenType;
use core_logic::{AlchemyClient, Chain, ChainScanner, ClientConfig, NetworkError, RecordingSleeper};
use evm_scanner::{EvmApi, EvmScanner};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_KEY: &str = "evm-test-key";
const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const RPC_PATH: &str = "/eth-mainnet/v2/evm-test-key";
const NFT_PATH: &str = "/eth-mainnet/nft/v3/evm-test-key/getNFTsForOwner";
const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const MYSTERY: &str = "0x1111111111111111111111111111111111111111";
const DUST: &str = "0x2222222222222222222222222222222222222222";

fn client_for(server: &MockServer) -> Arc<AlchemyClient> {
    let config = ClientConfig::new(API_KEY).with_endpoint_override(server.uri());
    let client = AlchemyClient::new(config)
        .unwrap()
        .with_sleeper(Arc::new(RecordingSleeper::new()))
        .with_rng_seed(7);
    Arc::new(client)
}

/// Matches a JSON-RPC call by method name
fn rpc_method(name: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |req: &Request| {
        req.body_json::<Value>()
            .map(|body| body["method"] == name)
            .unwrap_or(false)
    }
}

/// Matches `alchemy_getTokenMetadata` for one contract
fn metadata_for(contract: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |req: &Request| {
        req.body_json::<Value>()
            .map(|body| {
                body["method"] == "alchemy_getTokenMetadata" && body["params"][0] == contract
            })
            .unwrap_or(false)
    }
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

async fn mount_empty_wallet(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("eth_getBalance"))
        .respond_with(rpc_result(json!("0x0")))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("alchemy_getTokenBalances"))
        .respond_with(rpc_result(json!({"address": WALLET, "tokenBalances": []})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(NFT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ownedNfts": [], "totalCount": 0})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scan_orders_and_classifies_assets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("eth_getBalance"))
        .respond_with(rpc_result(json!("0xde0b6b3a7640000")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("alchemy_getTokenBalances"))
        .respond_with(rpc_result(json!({
            "address": WALLET,
            "tokenBalances": [
                {"contractAddress": USDC, "tokenBalance": "0x16e360"},
                {"contractAddress": DUST, "tokenBalance": "0x0000000000000000000000000000000000000000000000000000000000000000"},
                {"contractAddress": MYSTERY, "tokenBalance": "0x2a"}
            ],
            "pageKey": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(metadata_for(USDC))
        .respond_with(rpc_result(json!({
            "name": "USD Coin", "symbol": "USDC", "decimals": 6, "logo": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(metadata_for(MYSTERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32000, "message": "contract not found"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NFT_PATH))
        .and(query_param("owner", WALLET))
        .and(query_param("withMetadata", "true"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ownedNfts": [
                {
                    "contract": {"address": "0xbc4c", "name": "BoredApes", "tokenType": "ERC721", "isSpam": false},
                    "tokenId": "1234", "tokenType": "ERC721", "name": "Ape #1234", "balance": "1"
                },
                {
                    "contract": {"address": "0x76be", "name": "Parallel", "tokenType": "ERC1155", "isSpam": null},
                    "tokenId": "10", "tokenType": "ERC1155", "name": "Card", "balance": "3"
                },
                {
                    "contract": {"address": "0xdead", "name": "Free Airdrop", "tokenType": "ERC1155", "isSpam": true},
                    "tokenId": "1", "tokenType": "ERC1155", "name": "Claim now", "balance": "1"
                }
            ],
            "totalCount": 3,
            "pageKey": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let scanner = EvmScanner::new(client_for(&server), Chain::Ethereum);
    let result = scanner.scan(WALLET).await.unwrap();

    let rows: Vec<(String, String, TokenType)> = result
        .assets
        .iter()
        .map(|a| (a.asset_address.clone(), a.quantity.clone(), a.token_type.clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("NATIVE".to_string(), "1".to_string(), TokenType::Native),
            (USDC.to_string(), "1.5".to_string(), TokenType::Erc20),
            (MYSTERY.to_string(), "42".to_string(), TokenType::Erc20),
            ("0xbc4c".to_string(), "1".to_string(), TokenType::Erc721),
            ("0x76be".to_string(), "3".to_string(), TokenType::Erc1155),
        ]
    );

    assert_eq!(result.assets[0].symbol, "ETH");
    assert_eq!(result.assets[2].asset_name, "");
    assert_eq!(result.assets[3].collection_name.as_deref(), Some("BoredApes"));
    assert_eq!(result.assets[3].token_id.as_deref(), Some("1234"));

    assert_eq!(result.spam_assets.len(), 1);
    assert_eq!(result.spam_assets[0].asset_address, "0xdead");

    assert_eq!(result.native_count, 1);
    assert_eq!(result.token_count, 2);
    assert_eq!(result.nft_count, 2);
    assert_eq!(result.erc721_count, 1);
    assert_eq!(result.erc1155_count, 1);
    assert_eq!(result.spam_count, 1);
    assert_eq!(result.tokens_without_metadata, 1);
}

#[tokio::test]
async fn test_zero_holdings_yield_no_rows() {
    let server = MockServer::start().await;
    mount_empty_wallet(&server).await;

    let scanner = EvmScanner::new(client_for(&server), Chain::Ethereum);
    let result = scanner.scan(WALLET).await.unwrap();

    assert!(result.assets.is_empty());
    assert!(result.spam_assets.is_empty());
    assert_eq!(result.total_assets(), 0);
}

#[tokio::test]
async fn test_nft_pagination_collects_every_page() {
    let server = MockServer::start().await;

    let page = |start: usize, count: usize, next: Option<&str>| {
        let nfts: Vec<Value> = (start..start + count)
            .map(|i| {
                json!({
                    "contract": {"address": "0xabc", "tokenType": "ERC721"},
                    "tokenId": i.to_string(),
                    "tokenType": "ERC721"
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"ownedNfts": nfts, "pageKey": next}))
    };

    Mock::given(method("GET"))
        .and(path(NFT_PATH))
        .and(query_param("pageKey", "page-2"))
        .respond_with(page(100, 100, Some("page-3")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NFT_PATH))
        .and(query_param("pageKey", "page-3"))
        .respond_with(page(200, 37, None))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NFT_PATH))
        .respond_with(page(0, 100, Some("page-2")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let api = EvmApi::new(&client, Chain::Ethereum);
    let nfts = api.nfts(WALLET).await.unwrap();

    assert_eq!(nfts.len(), 237);
    let ids: Vec<usize> = nfts.iter().map(|n| n.token_id.parse().unwrap()).collect();
    assert_eq!(ids, (0..237).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_token_balances_follow_page_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(|req: &Request| {
            req.body_json::<Value>()
                .map(|b| b["params"][2]["pageKey"] == "next-1")
                .unwrap_or(false)
        })
        .respond_with(rpc_result(json!({
            "tokenBalances": [{"contractAddress": DUST, "tokenBalance": "0x01"}],
            "pageKey": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("alchemy_getTokenBalances"))
        .respond_with(rpc_result(json!({
            "tokenBalances": [
                {"contractAddress": USDC, "tokenBalance": "0x10"},
                {"contractAddress": MYSTERY, "tokenBalance": "not-hex"}
            ],
            "pageKey": "next-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let api = EvmApi::new(&client, Chain::Ethereum);
    let balances = api.token_balances(WALLET).await.unwrap();

    let addresses: Vec<&str> = balances.iter().map(|b| b.contract_address.as_str()).collect();
    assert_eq!(addresses, vec![USDC, DUST]);
}

#[tokio::test]
async fn test_server_error_fails_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("eth_getBalance"))
        .respond_with(rpc_result(json!("0x1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("alchemy_getTokenBalances"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let scanner = EvmScanner::new(client_for(&server), Chain::Ethereum);
    let err = scanner.scan(WALLET).await.unwrap_err();

    assert!(matches!(err, NetworkError::HttpError { status_code: 503, .. }));
}

#[tokio::test]
async fn test_metadata_rate_limit_fails_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("eth_getBalance"))
        .respond_with(rpc_result(json!("0x0")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(rpc_method("alchemy_getTokenBalances"))
        .respond_with(rpc_result(json!({
            "tokenBalances": [{"contractAddress": USDC, "tokenBalance": "0x10"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(metadata_for(USDC))
        .respond_with(ResponseTemplate::new(429))
        .expect(6)
        .mount(&server)
        .await;

    let scanner = EvmScanner::new(client_for(&server), Chain::Ethereum);
    let err = scanner.scan(WALLET).await.unwrap_err();

    assert!(matches!(err, NetworkError::RateLimited { retries: 5, .. }));
}
