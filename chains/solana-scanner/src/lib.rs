//! Solana wallet scanner built on the Alchemy DAS `getAssetsByOwner` call.
//!
//! One paged listing returns the native balance, fungible SPL tokens and
//! every Metaplex NFT flavour. The provider has no spam signal for Solana.

pub mod api;
pub mod scanner;

pub use api::{DasApi, DasAsset, DasEntry, WRAPPED_SOL_MINT};
pub use scanner::SolanaScanner;
