use crate::api::{DasApi, DasAsset, DasEntry, WRAPPED_SOL_MINT};
use async_trait::async_trait;
use core_logic::models::{Holding, ScanResult, TokenType};
use core_logic::quantity::format_quantity;
use core_logic::{AlchemyClient, Chain, ChainScanner, NetworkError, PROGRESS_TARGET};
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;
use tracing::{debug, info};

/// Decimals assumed for fungible assets that do not report any
pub const DEFAULT_SPL_DECIMALS: u32 = 9;

pub struct SolanaScanner {
    client: Arc<AlchemyClient>,
}

impl SolanaScanner {
    pub fn new(client: Arc<AlchemyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainScanner for SolanaScanner {
    fn chain(&self) -> Chain {
        Chain::Solana
    }

    async fn scan(&self, wallet: &str) -> Result<ScanResult, NetworkError> {
        let chain = Chain::Solana;
        info!(target: PROGRESS_TARGET, "[{}] Starting wallet scan...", chain);

        let entries = DasApi::new(&self.client).assets_by_owner(wallet).await?;
        let result = classify_entries(entries);

        if result.native_count > 0 {
            info!(
                target: PROGRESS_TARGET,
                "[{}] Found 1 native token ({})",
                chain,
                chain.native_token().symbol
            );
        } else {
            info!(target: PROGRESS_TARGET, "[{}] Found 0 native tokens", chain);
        }
        info!(
            target: PROGRESS_TARGET,
            "[{}] Found {} SPL tokens", chain, result.token_count
        );
        info!(target: PROGRESS_TARGET, "[{}] Found {} NFTs", chain, result.nft_count);
        info!(
            target: PROGRESS_TARGET,
            "[{}] Spam detection not available for Solana", chain
        );

        Ok(result)
    }
}

/// Turn the DAS listing into holdings: native, then fungible tokens, then
/// NFTs. Provider order is kept within each group.
pub fn classify_entries(entries: Vec<DasEntry>) -> ScanResult {
    let native = Chain::Solana.native_token();
    let mut result = ScanResult::new(Chain::Solana);

    let native_lamports = entries.iter().find_map(|entry| match entry {
        DasEntry::NativeBalance(lamports) => Some(*lamports),
        DasEntry::Asset(_) => None,
    });

    let mut natives = Vec::new();
    let mut fungibles = Vec::new();
    let mut nfts = Vec::new();

    if let Some(lamports) = native_lamports.filter(|l| *l > 0) {
        natives.push(Holding::Native {
            name: native.name.to_string(),
            symbol: native.symbol.to_string(),
            quantity: format_quantity(&BigUint::from(lamports), native.decimals),
        });
    }

    let assets = entries.into_iter().filter_map(|entry| match entry {
        DasEntry::Asset(asset) => Some(asset),
        DasEntry::NativeBalance(_) => None,
    });
    for holding in assets.filter_map(|asset| asset_holding(asset, native_lamports.is_some())) {
        match holding {
            Holding::Native { .. } => natives.push(holding),
            Holding::Fungible { .. } => fungibles.push(holding),
            Holding::Nft { .. } => nfts.push(holding),
        }
    }

    for holding in natives.into_iter().chain(fungibles).chain(nfts) {
        result.push(holding);
    }
    result
}

fn is_fungible(interface: &str) -> bool {
    matches!(interface, "FungibleToken" | "FungibleAsset")
}

/// Holding for one DAS asset, `None` for fungibles with no balance.
///
/// Wrapped SOL stands in for the native balance only when the response did
/// not report one at result level.
pub fn asset_holding(asset: DasAsset, has_native_balance: bool) -> Option<Holding> {
    if !is_fungible(&asset.interface) {
        return Some(Holding::Nft {
            token_type: TokenType::from_das_interface(&asset.interface),
            token_id: asset.id.clone(),
            address: asset.id,
            name: asset.name.unwrap_or_default(),
            symbol: asset.symbol.unwrap_or_default(),
            collection_name: asset.collection_name,
            quantity: "1".to_string(),
            is_spam: false,
        });
    }

    let balance = match asset.balance {
        Some(balance) if !balance.is_zero() => balance,
        _ => {
            debug!("[solana] Skipping fungible asset {} without balance", asset.id);
            return None;
        }
    };
    let quantity = format_quantity(&balance, asset.decimals.unwrap_or(DEFAULT_SPL_DECIMALS));

    let is_wrapped_sol =
        asset.id == WRAPPED_SOL_MINT && asset.symbol.as_deref() == Some("SOL");
    if is_wrapped_sol && !has_native_balance {
        let native = Chain::Solana.native_token();
        return Some(Holding::Native {
            name: asset.name.unwrap_or_else(|| native.name.to_string()),
            symbol: native.symbol.to_string(),
            quantity,
        });
    }

    Some(Holding::Fungible {
        address: asset.id,
        name: asset.name.unwrap_or_default(),
        symbol: asset.symbol.unwrap_or_default(),
        quantity,
        token_type: TokenType::Spl,
    })
}
