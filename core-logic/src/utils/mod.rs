//! # Utilities Module
//!
//! Logging setup and the retry/backoff policy used by the Alchemy client.

pub mod logger;
pub mod retry;

pub use logger::{setup_logger, PROGRESS_TARGET};
pub use retry::{Backoff, RetryConfig, Sleeper, TokioSleeper};
