//! # Supported Networks
//!
//! Static catalogue of the networks the scanner understands: endpoint slugs,
//! chain families and native token parameters.

use crate::error::ConfigError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Base,
    Bnb,
    Solana,
}

/// Provider API family a chain is queried through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    Evm,
    Solana,
}

/// Native coin parameters for a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeToken {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u32,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Polygon,
        Chain::Base,
        Chain::Bnb,
        Chain::Solana,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Base => "base",
            Chain::Bnb => "bnb",
            Chain::Solana => "solana",
        }
    }

    pub fn family(&self) -> ChainFamily {
        match self {
            Chain::Solana => ChainFamily::Solana,
            _ => ChainFamily::Evm,
        }
    }

    /// Host prefix under `g.alchemy.com`
    pub fn endpoint_slug(&self) -> &'static str {
        match self {
            Chain::Ethereum => "eth-mainnet",
            Chain::Polygon => "polygon-mainnet",
            Chain::Base => "base-mainnet",
            Chain::Bnb => "bnb-mainnet",
            Chain::Solana => "solana-mainnet",
        }
    }

    pub fn native_token(&self) -> NativeToken {
        match self {
            Chain::Ethereum | Chain::Base => NativeToken {
                symbol: "ETH",
                name: "Ethereum",
                decimals: 18,
            },
            Chain::Polygon => NativeToken {
                symbol: "MATIC",
                name: "Polygon",
                decimals: 18,
            },
            Chain::Bnb => NativeToken {
                symbol: "BNB",
                name: "BNB",
                decimals: 18,
            },
            Chain::Solana => NativeToken {
                symbol: "SOL",
                name: "Solana",
                decimals: 9,
            },
        }
    }

    pub fn supported_names() -> String {
        Chain::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Chain::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ConfigError::UnsupportedNetwork {
                name: s.to_string(),
                supported: Chain::supported_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Ethereum".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!("BNB".parse::<Chain>().unwrap(), Chain::Bnb);
        assert_eq!(" solana ".parse::<Chain>().unwrap(), Chain::Solana);
    }

    #[test]
    fn test_parse_rejects_unknown_network() {
        let err = "arbitrum".parse::<Chain>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("arbitrum"));
        assert!(msg.contains("ethereum, polygon, base, bnb, solana"));
    }

    #[test]
    fn test_endpoint_slugs() {
        assert_eq!(Chain::Ethereum.endpoint_slug(), "eth-mainnet");
        assert_eq!(Chain::Polygon.endpoint_slug(), "polygon-mainnet");
        assert_eq!(Chain::Base.endpoint_slug(), "base-mainnet");
        assert_eq!(Chain::Bnb.endpoint_slug(), "bnb-mainnet");
        assert_eq!(Chain::Solana.endpoint_slug(), "solana-mainnet");
    }

    #[test]
    fn test_native_tokens() {
        assert_eq!(Chain::Polygon.native_token().symbol, "MATIC");
        assert_eq!(Chain::Base.native_token().symbol, "ETH");
        assert_eq!(Chain::Bnb.native_token().decimals, 18);
        assert_eq!(Chain::Solana.native_token().decimals, 9);
    }

    #[test]
    fn test_families() {
        assert_eq!(Chain::Solana.family(), ChainFamily::Solana);
        for chain in [Chain::Ethereum, Chain::Polygon, Chain::Base, Chain::Bnb] {
            assert_eq!(chain.family(), ChainFamily::Evm);
        }
    }
}
