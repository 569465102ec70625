//! # Asset Model
//!
//! Unified asset record written to the report, the per-chain holdings the
//! scanners produce, and the per-network scan result.

use crate::chain::Chain;
use std::fmt;

/// Report column order
pub const CSV_COLUMNS: [&str; 8] = [
    "chain",
    "asset_name",
    "symbol",
    "asset_address",
    "quantity",
    "token_type",
    "token_id",
    "collection_name",
];

/// `asset_address` value used for native coins
pub const NATIVE_ADDRESS: &str = "NATIVE";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    Native,
    Erc20,
    Erc721,
    Erc1155,
    Spl,
    /// Metaplex V1/V2 NFT
    Nft,
    /// Metaplex programmable NFT
    ProgrammableNft,
    /// Metaplex Core asset
    MplCore,
    /// Standard reported by the provider that has no dedicated variant
    Other(String),
}

impl TokenType {
    /// Map an EVM NFT standard as reported by the NFT API
    pub fn from_nft_standard(standard: &str) -> Self {
        match standard {
            "ERC721" => TokenType::Erc721,
            "ERC1155" => TokenType::Erc1155,
            other => TokenType::Other(other.to_string()),
        }
    }

    /// Map a Solana DAS asset interface
    pub fn from_das_interface(interface: &str) -> Self {
        match interface {
            "FungibleToken" | "FungibleAsset" => TokenType::Spl,
            "V1_NFT" | "V2_NFT" => TokenType::Nft,
            "ProgrammableNFT" => TokenType::ProgrammableNft,
            "MplCoreAsset" => TokenType::MplCore,
            other => TokenType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Native => "NATIVE",
            TokenType::Erc20 => "ERC20",
            TokenType::Erc721 => "ERC721",
            TokenType::Erc1155 => "ERC1155",
            TokenType::Spl => "SPL",
            TokenType::Nft => "NFT",
            TokenType::ProgrammableNft => "pNFT",
            TokenType::MplCore => "MPL",
            TokenType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a chain adapter found in the wallet, before it is flattened into
/// an [`Asset`].
#[derive(Debug, Clone, PartialEq)]
pub enum Holding {
    Native {
        name: String,
        symbol: String,
        quantity: String,
    },
    Fungible {
        address: String,
        name: String,
        symbol: String,
        quantity: String,
        token_type: TokenType,
    },
    Nft {
        address: String,
        token_id: String,
        name: String,
        symbol: String,
        collection_name: Option<String>,
        quantity: String,
        token_type: TokenType,
        is_spam: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub chain: Chain,
    /// Empty if unknown
    pub asset_name: String,
    /// Empty if unknown
    pub symbol: String,
    pub asset_address: String,
    /// Decimal string, full precision, trailing zeros trimmed
    pub quantity: String,
    pub token_type: TokenType,
    pub token_id: Option<String>,
    pub collection_name: Option<String>,
    pub is_spam: bool,
}

impl Asset {
    pub fn from_holding(chain: Chain, holding: Holding) -> Self {
        match holding {
            Holding::Native {
                name,
                symbol,
                quantity,
            } => Asset {
                chain,
                asset_name: name,
                symbol,
                asset_address: NATIVE_ADDRESS.to_string(),
                quantity,
                token_type: TokenType::Native,
                token_id: None,
                collection_name: None,
                is_spam: false,
            },
            Holding::Fungible {
                address,
                name,
                symbol,
                quantity,
                token_type,
            } => Asset {
                chain,
                asset_name: name,
                symbol,
                asset_address: address,
                quantity,
                token_type,
                token_id: None,
                collection_name: None,
                is_spam: false,
            },
            Holding::Nft {
                address,
                token_id,
                name,
                symbol,
                collection_name,
                quantity,
                token_type,
                is_spam,
            } => Asset {
                chain,
                asset_name: name,
                symbol,
                asset_address: address,
                quantity,
                token_type,
                token_id: Some(token_id),
                collection_name,
                // the provider has no spam signal on Solana
                is_spam: is_spam && chain != Chain::Solana,
            },
        }
    }

    /// Row in [`CSV_COLUMNS`] order
    pub fn to_csv_row(&self) -> [String; 8] {
        [
            self.chain.to_string(),
            self.asset_name.clone(),
            self.symbol.clone(),
            self.asset_address.clone(),
            self.quantity.clone(),
            self.token_type.to_string(),
            self.token_id.clone().unwrap_or_default(),
            self.collection_name.clone().unwrap_or_default(),
        ]
    }
}

/// Everything one network contributed to the run
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub chain: Chain,
    pub assets: Vec<Asset>,
    pub spam_assets: Vec<Asset>,
    pub native_count: usize,
    pub token_count: usize,
    pub nft_count: usize,
    pub erc721_count: usize,
    pub erc1155_count: usize,
    pub spam_count: usize,
    /// Tokens listed with blank name/symbol because the metadata lookup failed
    pub tokens_without_metadata: usize,
}

impl ScanResult {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            assets: Vec::new(),
            spam_assets: Vec::new(),
            native_count: 0,
            token_count: 0,
            nft_count: 0,
            erc721_count: 0,
            erc1155_count: 0,
            spam_count: 0,
            tokens_without_metadata: 0,
        }
    }

    /// Convert a holding and route it to the main or spam list.
    ///
    /// Counters only track assets that land in the main list.
    pub fn push(&mut self, holding: Holding) {
        let asset = Asset::from_holding(self.chain, holding);

        if asset.is_spam {
            self.spam_count += 1;
            self.spam_assets.push(asset);
            return;
        }

        match asset.token_type {
            TokenType::Native => self.native_count += 1,
            TokenType::Erc20 | TokenType::Spl => self.token_count += 1,
            TokenType::Erc721 => {
                self.nft_count += 1;
                self.erc721_count += 1;
            }
            TokenType::Erc1155 => {
                self.nft_count += 1;
                self.erc1155_count += 1;
            }
            _ => self.nft_count += 1,
        }
        self.assets.push(asset);
    }

    pub fn total_assets(&self) -> usize {
        self.assets.len() + self.spam_assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nft(is_spam: bool, token_type: TokenType) -> Holding {
        Holding::Nft {
            address: "0xabc".to_string(),
            token_id: "42".to_string(),
            name: "Punk #42".to_string(),
            symbol: String::new(),
            collection_name: Some("Punks".to_string()),
            quantity: "1".to_string(),
            token_type,
            is_spam,
        }
    }

    #[test]
    fn test_csv_row_includes_all_columns() {
        let asset = Asset::from_holding(Chain::Ethereum, nft(false, TokenType::Erc721));
        assert_eq!(
            asset.to_csv_row(),
            [
                "ethereum", "Punk #42", "", "0xabc", "1", "ERC721", "42", "Punks"
            ]
            .map(String::from)
        );
    }

    #[test]
    fn test_csv_row_blanks_missing_optional_fields() {
        let asset = Asset::from_holding(
            Chain::Polygon,
            Holding::Native {
                name: "Polygon".to_string(),
                symbol: "MATIC".to_string(),
                quantity: "2.5".to_string(),
            },
        );
        let row = asset.to_csv_row();
        assert_eq!(row[3], NATIVE_ADDRESS);
        assert_eq!(row[5], "NATIVE");
        assert_eq!(row[6], "");
        assert_eq!(row[7], "");
    }

    #[test]
    fn test_push_routes_spam_separately() {
        let mut result = ScanResult::new(Chain::Ethereum);
        result.push(nft(false, TokenType::Erc721));
        result.push(nft(true, TokenType::Erc1155));

        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.spam_assets.len(), 1);
        assert_eq!(result.nft_count, 1);
        assert_eq!(result.erc721_count, 1);
        assert_eq!(result.erc1155_count, 0);
        assert_eq!(result.spam_count, 1);
        assert!(result.spam_assets[0].is_spam);
    }

    #[test]
    fn test_solana_never_routes_to_spam() {
        let mut result = ScanResult::new(Chain::Solana);
        result.push(nft(true, TokenType::Nft));

        assert!(result.spam_assets.is_empty());
        assert_eq!(result.assets.len(), 1);
        assert!(!result.assets[0].is_spam);
    }

    #[test]
    fn test_counts_by_kind() {
        let mut result = ScanResult::new(Chain::Solana);
        result.push(Holding::Native {
            name: "Solana".to_string(),
            symbol: "SOL".to_string(),
            quantity: "1".to_string(),
        });
        result.push(Holding::Fungible {
            address: "mint".to_string(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            quantity: "50".to_string(),
            token_type: TokenType::Spl,
        });
        result.push(nft(false, TokenType::ProgrammableNft));

        assert_eq!(result.native_count, 1);
        assert_eq!(result.token_count, 1);
        assert_eq!(result.nft_count, 1);
        assert_eq!(result.total_assets(), 3);
    }

    #[test]
    fn test_token_type_mapping() {
        assert_eq!(TokenType::from_nft_standard("ERC1155"), TokenType::Erc1155);
        assert_eq!(
            TokenType::from_nft_standard("NO_SUPPORTED_NFT_STANDARD").as_str(),
            "NO_SUPPORTED_NFT_STANDARD"
        );
        assert_eq!(TokenType::from_das_interface("FungibleAsset"), TokenType::Spl);
        assert_eq!(TokenType::from_das_interface("V1_NFT").as_str(), "NFT");
        assert_eq!(
            TokenType::from_das_interface("ProgrammableNFT").as_str(),
            "pNFT"
        );
        assert_eq!(TokenType::from_das_interface("MplCoreAsset").as_str(), "MPL");
        assert_eq!(
            TokenType::from_das_interface("SomeUnknownInterface").as_str(),
            "SomeUnknownInterface"
        );
    }
}
