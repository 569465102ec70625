//! # Core Logic - Shared Pieces for the Wallet Asset Scanner
//!
//! This crate holds everything the chain scanners and the CLI share:
//! the network catalogue, the asset model, the Alchemy transport and the
//! error taxonomy.
//!
//! ## Modules
//!
//! - [`chain`] - Supported networks and their endpoint slugs
//! - [`client`] - Retrying Alchemy HTTP client and pagination driver
//! - [`config`] - Client configuration and tuning values
//! - [`error`] - Typed error handling with thiserror
//! - [`models`] - Holdings, assets and per-network scan results
//! - [`quantity`] - Exact decimal rendering of on-chain amounts
//! - [`traits`] - The `ChainScanner` trait
//! - [`utils`] - Logger and retry policy
//! - [`wallet`] - Wallet address validation

pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod quantity;
pub mod traits;
pub mod utils;
pub mod wallet;

pub use chain::{Chain, ChainFamily, NativeToken};
pub use client::pagination::{collect_pages, Page};
pub use client::{AlchemyClient, RecordingSleeper};
pub use config::{ClientConfig, TuningConfig};
pub use error::{ConfigError, CoreError, NetworkError, ReportError, WalletError};
pub use models::{Asset, Holding, ScanResult, TokenType, CSV_COLUMNS};
pub use traits::ChainScanner;
pub use utils::{setup_logger, RetryConfig, Sleeper, PROGRESS_TARGET};
