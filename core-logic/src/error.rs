//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use crate::chain::Chain;
use thiserror::Error;

/// Unified error type for core-logic operations.
///
/// Wraps the specific error types so the application layer can decide
/// whether a failure ends one network's scan or the whole run.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Wallet(WalletError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Report(ReportError),
}

impl CoreError {
    /// Fatal errors abort the whole run instead of skipping a single network.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Network(NetworkError::Unauthorized { .. }))
    }
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<WalletError> for CoreError {
    fn from(e: WalletError) -> Self {
        CoreError::Wallet(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<ReportError> for CoreError {
    fn from(e: ReportError) -> Self {
        CoreError::Report(e)
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unsupported network: '{name}'. Supported: {supported}")]
    UnsupportedNetwork { name: String, supported: String },

    #[error("Failed to load configuration from {path}: {msg}")]
    LoadFailed { path: String, msg: String },
}

/// Wallet address errors, raised before any request is made
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Invalid {chain} wallet address '{address}': {reason}")]
    InvalidAddress {
        chain: Chain,
        address: String,
        reason: String,
    },
}

/// Network and RPC-related errors.
///
/// `endpoint` is always `<network>/<method>` and never contains the API key.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Invalid API key (HTTP {status_code})")]
    Unauthorized { status_code: u16 },

    #[error("Rate limit exceeded on {endpoint} after {retries} retries")]
    RateLimited { endpoint: String, retries: u32 },

    #[error("HTTP error {status_code} from {endpoint}")]
    HttpError { status_code: u16, endpoint: String },

    #[error("Request to {endpoint} timed out after {attempts} attempts")]
    Timeout { endpoint: String, attempts: u32 },

    #[error("Connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("API error from {endpoint}: {message}")]
    RpcError {
        endpoint: String,
        code: Option<i64>,
        message: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Report writing errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(String),
}
