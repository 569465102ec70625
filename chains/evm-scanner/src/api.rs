//! Alchemy EVM calls: native balance, ERC-20 balances and metadata, NFT listing.

use core_logic::client::pagination::{collect_pages, next_page_key, Page};
use core_logic::quantity::parse_hex_amount;
use core_logic::{AlchemyClient, Chain, NetworkError};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Largest page the token balance listing accepts
pub const TOKEN_PAGE_SIZE: u32 = 100;
/// Largest page the NFT listing accepts
pub const NFT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalancesResponse {
    #[serde(default)]
    token_balances: Vec<RawTokenBalance>,
    page_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenBalance {
    #[serde(default)]
    contract_address: String,
    token_balance: Option<String>,
}

/// Non-zero ERC-20 balance
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub contract_address: String,
    pub raw_balance: BigUint,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NftsResponse {
    #[serde(default)]
    owned_nfts: Vec<NftItem>,
    page_key: Option<String>,
}

/// Item of `getNFTsForOwner`, restricted to the fields the report uses
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftItem {
    #[serde(default)]
    pub contract: NftContract,
    #[serde(default)]
    pub token_id: String,
    pub token_type: Option<String>,
    pub name: Option<String>,
    pub balance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftContract {
    #[serde(default)]
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub token_type: Option<String>,
    pub is_spam: Option<bool>,
}

/// Calls for one EVM network, borrowing the shared client
pub struct EvmApi<'a> {
    client: &'a AlchemyClient,
    chain: Chain,
}

impl<'a> EvmApi<'a> {
    pub fn new(client: &'a AlchemyClient, chain: Chain) -> Self {
        Self { client, chain }
    }

    /// Native balance in wei
    pub async fn native_balance(&self, wallet: &str) -> Result<BigUint, NetworkError> {
        let hex: String = self
            .client
            .rpc(self.chain, "eth_getBalance", json!([wallet, "latest"]))
            .await?;

        parse_hex_amount(&hex).ok_or_else(|| NetworkError::InvalidResponse {
            endpoint: format!("{}/eth_getBalance", self.chain),
            reason: format!("balance '{}' is not a hex quantity", hex),
        })
    }

    async fn token_balance_page(
        &self,
        wallet: &str,
        page_key: Option<String>,
    ) -> Result<Page<TokenBalance, String>, NetworkError> {
        let mut options = json!({ "maxCount": TOKEN_PAGE_SIZE });
        if let Some(key) = page_key {
            options["pageKey"] = Value::String(key);
        }

        let response: TokenBalancesResponse = self
            .client
            .rpc(
                self.chain,
                "alchemy_getTokenBalances",
                json!([wallet, "erc20", options]),
            )
            .await?;

        let items = response
            .token_balances
            .into_iter()
            .filter_map(|raw| self.non_zero_balance(raw))
            .collect();

        Ok(Page::new(items, next_page_key(response.page_key)))
    }

    fn non_zero_balance(&self, raw: RawTokenBalance) -> Option<TokenBalance> {
        let hex = raw.token_balance?;
        match parse_hex_amount(&hex) {
            Some(balance) if !balance.is_zero() => Some(TokenBalance {
                contract_address: raw.contract_address,
                raw_balance: balance,
            }),
            Some(_) => None,
            None => {
                debug!(
                    "[{}] Dropping token {} with malformed balance '{}'",
                    self.chain, raw.contract_address, hex
                );
                None
            }
        }
    }

    /// Every non-zero ERC-20 balance, across all pages
    pub async fn token_balances(&self, wallet: &str) -> Result<Vec<TokenBalance>, NetworkError> {
        let label = format!("{}/alchemy_getTokenBalances", self.chain);
        collect_pages(&label, |cursor| self.token_balance_page(wallet, cursor)).await
    }

    /// Metadata for one token contract.
    ///
    /// `Ok(None)` when the provider answers with a JSON-RPC error for this
    /// contract; transport failures are returned as errors.
    pub async fn token_metadata(
        &self,
        contract: &str,
    ) -> Result<Option<TokenMetadata>, NetworkError> {
        let result = self
            .client
            .rpc::<TokenMetadata>(self.chain, "alchemy_getTokenMetadata", json!([contract]))
            .await;

        match result {
            Ok(metadata) => Ok(Some(metadata)),
            Err(NetworkError::RpcError { message, .. }) => {
                debug!(
                    "[{}] No metadata for {}: {}",
                    self.chain, contract, message
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn nft_page(
        &self,
        wallet: &str,
        page_key: Option<String>,
    ) -> Result<Page<NftItem, String>, NetworkError> {
        let mut query = vec![
            ("owner", wallet.to_string()),
            ("withMetadata", "true".to_string()),
            ("pageSize", NFT_PAGE_SIZE.to_string()),
        ];
        if let Some(key) = page_key {
            query.push(("pageKey", key));
        }

        let response: NftsResponse = self
            .client
            .rest_get(self.chain, "getNFTsForOwner", &query)
            .await?;

        Ok(Page::new(response.owned_nfts, next_page_key(response.page_key)))
    }

    /// Every NFT the wallet owns. Page keys expire quickly, so pages are
    /// fetched back to back.
    pub async fn nfts(&self, wallet: &str) -> Result<Vec<NftItem>, NetworkError> {
        let label = format!("{}/getNFTsForOwner", self.chain);
        collect_pages(&label, |cursor| self.nft_page(wallet, cursor)).await
    }
}
