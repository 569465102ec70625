//! EVM wallet scanner for Ethereum, Polygon, Base and BNB Smart Chain.
//!
//! - [`api`] wraps the Alchemy JSON-RPC and NFT v3 calls and their paging.
//! - [`scanner`] turns the responses into holdings, native first, then
//!   ERC-20 tokens, then NFTs.

pub mod api;
pub mod scanner;

pub use api::{EvmApi, NftItem, TokenBalance, TokenMetadata};
pub use scanner::EvmScanner;
