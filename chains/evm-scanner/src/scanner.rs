use crate::api::{EvmApi, NftItem, TokenBalance, TokenMetadata};
use async_trait::async_trait;
use core_logic::models::{Holding, ScanResult, TokenType};
use core_logic::quantity::{format_quantity, parse_quantity};
use core_logic::{AlchemyClient, Chain, ChainScanner, NetworkError, PROGRESS_TARGET};
use num_traits::Zero;
use std::sync::Arc;
use tracing::info;

/// Decimals assumed when token metadata does not report any
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

pub struct EvmScanner {
    client: Arc<AlchemyClient>,
    chain: Chain,
}

impl EvmScanner {
    pub fn new(client: Arc<AlchemyClient>, chain: Chain) -> Self {
        Self { client, chain }
    }
}

#[async_trait]
impl ChainScanner for EvmScanner {
    fn chain(&self) -> Chain {
        self.chain
    }

    async fn scan(&self, wallet: &str) -> Result<ScanResult, NetworkError> {
        let chain = self.chain;
        let api = EvmApi::new(&self.client, chain);
        let mut result = ScanResult::new(chain);

        info!(target: PROGRESS_TARGET, "[{}] Starting wallet scan...", chain);

        // 1. Native balance
        let native = chain.native_token();
        let balance = api.native_balance(wallet).await?;
        if balance.is_zero() {
            info!(target: PROGRESS_TARGET, "[{}] Found 0 native tokens", chain);
        } else {
            result.push(Holding::Native {
                name: native.name.to_string(),
                symbol: native.symbol.to_string(),
                quantity: format_quantity(&balance, native.decimals),
            });
            info!(
                target: PROGRESS_TARGET,
                "[{}] Found 1 native token ({})", chain, native.symbol
            );
        }

        // 2. ERC-20 tokens, one metadata lookup each
        let balances = api.token_balances(wallet).await?;
        for token in balances {
            let metadata = api.token_metadata(&token.contract_address).await?;
            if metadata.is_none() {
                result.tokens_without_metadata += 1;
            }
            result.push(token_holding(token, metadata));
        }
        info!(
            target: PROGRESS_TARGET,
            "[{}] Found {} ERC-20 tokens", chain, result.token_count
        );
        if result.tokens_without_metadata > 0 {
            info!(
                target: PROGRESS_TARGET,
                "[{}] {} token(s) listed without metadata", chain, result.tokens_without_metadata
            );
        }

        // 3. NFTs
        for item in api.nfts(wallet).await? {
            result.push(nft_holding(item));
        }
        info!(
            target: PROGRESS_TARGET,
            "[{}] Found {} NFTs ({} ERC-721, {} ERC-1155)",
            chain,
            result.nft_count,
            result.erc721_count,
            result.erc1155_count
        );
        if result.spam_count > 0 {
            info!(
                target: PROGRESS_TARGET,
                "[{}] {} assets marked as spam", chain, result.spam_count
            );
        }

        Ok(result)
    }
}

/// ERC-20 row. Without metadata the raw integer amount is listed.
pub fn token_holding(token: TokenBalance, metadata: Option<TokenMetadata>) -> Holding {
    let (name, symbol, decimals) = match metadata {
        Some(m) => (
            m.name.unwrap_or_default(),
            m.symbol.unwrap_or_default(),
            m.decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS),
        ),
        None => (String::new(), String::new(), 0),
    };

    Holding::Fungible {
        address: token.contract_address,
        name,
        symbol,
        quantity: format_quantity(&token.raw_balance, decimals),
        token_type: TokenType::Erc20,
    }
}

/// Canonical whole-number form of a provider NFT balance
fn nft_balance(raw: &str) -> Option<String> {
    parse_quantity(raw.trim(), 0).map(|amount| format_quantity(&amount, 0))
}

pub fn nft_holding(item: NftItem) -> Holding {
    let standard = item
        .token_type
        .or(item.contract.token_type)
        .unwrap_or_default();
    let token_type = TokenType::from_nft_standard(&standard);

    let quantity = match token_type {
        TokenType::Erc721 => "1".to_string(),
        _ => item
            .balance
            .as_deref()
            .and_then(nft_balance)
            .unwrap_or_else(|| "1".to_string()),
    };

    Holding::Nft {
        address: item.contract.address,
        token_id: item.token_id,
        name: item.name.unwrap_or_default(),
        symbol: item.contract.symbol.unwrap_or_default(),
        collection_name: item.contract.name,
        quantity,
        token_type,
        is_spam: item.contract.is_spam.unwrap_or(false),
    }
}
