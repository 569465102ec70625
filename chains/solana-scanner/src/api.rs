use core_logic::client::pagination::{collect_pages, next_page_number, Page};
use core_logic::{AlchemyClient, Chain, NetworkError};
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::{json, Value};

/// Largest page `getAssetsByOwner` returns
pub const DAS_PAGE_LIMIT: u32 = 1000;

/// Wrapped SOL mint, used by some responses to carry the native balance
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetsByOwnerResponse {
    #[serde(default)]
    items: Vec<RawDasItem>,
    native_balance: Option<NativeBalance>,
}

#[derive(Debug, Deserialize)]
struct NativeBalance {
    #[serde(default)]
    lamports: u64,
}

#[derive(Debug, Default, Deserialize)]
struct RawDasItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    interface: String,
    #[serde(default)]
    content: Content,
    #[serde(default)]
    token_info: Option<TokenInfo>,
    #[serde(default)]
    grouping: Vec<Grouping>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    metadata: ContentMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct ContentMetadata {
    name: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenInfo {
    balance: Option<Value>,
    decimals: Option<u32>,
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Grouping {
    #[serde(default)]
    group_key: String,
    collection_metadata: Option<CollectionMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct CollectionMetadata {
    name: Option<String>,
}

/// DAS asset with the fields the report needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DasAsset {
    pub id: String,
    pub interface: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    /// Raw amount for fungible assets
    pub balance: Option<BigUint>,
    pub decimals: Option<u32>,
    pub collection_name: Option<String>,
}

/// One entry of the flattened listing
#[derive(Debug, Clone, PartialEq)]
pub enum DasEntry {
    /// Result-level native balance in lamports
    NativeBalance(u64),
    Asset(DasAsset),
}

impl From<RawDasItem> for DasAsset {
    fn from(raw: RawDasItem) -> Self {
        let token_info = raw.token_info.unwrap_or_default();
        let collection_name = raw
            .grouping
            .into_iter()
            .find(|g| g.group_key == "collection")
            .and_then(|g| g.collection_metadata)
            .and_then(|m| m.name)
            .filter(|name| !name.is_empty());

        DasAsset {
            id: raw.id,
            interface: raw.interface,
            name: raw.content.metadata.name,
            symbol: raw.content.metadata.symbol.or(token_info.symbol),
            balance: token_info.balance.as_ref().and_then(amount_from_value),
            decimals: token_info.decimals,
            collection_name,
        }
    }
}

/// DAS balances arrive as JSON numbers, occasionally as decimal strings.
fn amount_from_value(value: &Value) -> Option<BigUint> {
    match value {
        Value::Number(n) => n.as_u64().map(BigUint::from),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub struct DasApi<'a> {
    client: &'a AlchemyClient,
}

impl<'a> DasApi<'a> {
    pub fn new(client: &'a AlchemyClient) -> Self {
        Self { client }
    }

    async fn assets_page(
        &self,
        owner: &str,
        page: Option<u32>,
    ) -> Result<Page<DasEntry, u32>, NetworkError> {
        let page = page.unwrap_or(1);
        let params = json!({
            "ownerAddress": owner,
            "page": page,
            "limit": DAS_PAGE_LIMIT,
            "displayOptions": {
                "showFungible": true,
                "showNativeBalance": true,
            },
        });

        let response: AssetsByOwnerResponse = self
            .client
            .rpc(Chain::Solana, "getAssetsByOwner", params)
            .await?;

        let returned = response.items.len();
        let mut entries = Vec::with_capacity(returned + 1);
        if let Some(native) = response.native_balance {
            entries.push(DasEntry::NativeBalance(native.lamports));
        }
        entries.extend(
            response
                .items
                .into_iter()
                .map(|item| DasEntry::Asset(item.into())),
        );

        let next = next_page_number(page, returned, DAS_PAGE_LIMIT as usize);
        Ok(Page::new(entries, next))
    }

    /// Every entry across all pages, in provider order
    pub async fn assets_by_owner(&self, owner: &str) -> Result<Vec<DasEntry>, NetworkError> {
        collect_pages("solana/getAssetsByOwner", |page| self.assets_page(owner, page)).await
    }
}
