//! Retry Helper - Exponential backoff with jitter for rate-limited requests
//!
//! The backoff schedule is a small bounded state machine that knows nothing
//! about HTTP, so the transport can drive it and tests can step through it
//! with a seeded random source and a recording sleeper.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Cap applied before jitter, in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff (2.0 = double each time)
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the delay (0.1 = ±10%)
    pub jitter: f64,
    /// Treat 5xx responses like 429 instead of failing at once
    pub retry_server_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 32000,
            backoff_multiplier: 2.0,
            jitter: 0.1,
            retry_server_errors: false,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            ..Default::default()
        }
    }

    pub fn with_max_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = 0.0;
        self
    }

    pub fn with_server_error_retries(mut self, enabled: bool) -> Self {
        self.retry_server_errors = enabled;
        self
    }

    /// Un-jittered delay before retry number `attempt` (0-based), capped.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay_ms.min(self.max_delay_ms as f64);
        Duration::from_secs_f64(delay_ms.max(0.0) / 1000.0)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            config: *self,
            attempt: 0,
        }
    }
}

/// Bounded backoff schedule.
///
/// Each call to [`Backoff::next_delay`] spends one retry; `None` means the
/// retry budget is exhausted and the caller must give up.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: RetryConfig,
    attempt: u32,
}

impl Backoff {
    pub fn next_delay<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Duration> {
        if self.attempt >= self.config.max_retries {
            return None;
        }
        let base = self.config.base_delay(self.attempt);
        self.attempt += 1;
        Some(apply_jitter(base, self.config.jitter, rng))
    }

    /// Retries handed out so far
    pub fn retries_used(&self) -> u32 {
        self.attempt
    }
}

/// Randomize `delay` uniformly within ±`fraction` of itself.
pub fn apply_jitter<R: Rng + ?Sized>(delay: Duration, fraction: f64, rng: &mut R) -> Duration {
    if fraction <= 0.0 || delay.is_zero() {
        return delay;
    }
    let secs = delay.as_secs_f64();
    let range = secs * fraction;
    let jittered = secs + rng.gen_range(-range..=range);
    Duration::from_secs_f64(jittered.max(0.0))
}

/// Where backoff waits go. Production uses tokio's timer; tests record.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
