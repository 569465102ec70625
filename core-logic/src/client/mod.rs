//! # Alchemy Client
//!
//! Retrying HTTP transport shared by every chain scanner.
//!
//! - JSON-RPC calls are POSTed to `https://{slug}.g.alchemy.com/v2/{api_key}`.
//! - NFT API calls are GETs on `https://{slug}.g.alchemy.com/nft/v3/{api_key}/{method}`.
//! - HTTP 429 is retried on the [`RetryConfig`](crate::utils::retry::RetryConfig)
//!   schedule; timeouts and connection failures use the same bounded schedule.
//! - 401/403 are reported as [`NetworkError::Unauthorized`]; other 4xx/5xx fail at once.
//!
//! The API key is part of every URL, so any transport message that reaches
//! an error is passed through [`AlchemyClient::sanitize`] first.

pub mod pagination;

use crate::chain::Chain;
use crate::config::ClientConfig;
use crate::error::{ConfigError, NetworkError};
use crate::utils::retry::{Sleeper, TokioSleeper};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Why the previous attempt is being retried
enum RetryReason {
    RateLimited,
    ServerError(u16),
    Timeout,
    Connection(String),
}

impl RetryReason {
    fn into_error(self, endpoint: &str, retries: u32, attempts: u32) -> NetworkError {
        let endpoint = endpoint.to_string();
        match self {
            RetryReason::RateLimited => NetworkError::RateLimited { endpoint, retries },
            RetryReason::ServerError(status_code) => NetworkError::HttpError {
                status_code,
                endpoint,
            },
            RetryReason::Timeout => NetworkError::Timeout { endpoint, attempts },
            RetryReason::Connection(reason) => NetworkError::ConnectionFailed { endpoint, reason },
        }
    }

    fn describe(&self) -> String {
        match self {
            RetryReason::RateLimited => "rate limited (429)".to_string(),
            RetryReason::ServerError(code) => format!("server error ({})", code),
            RetryReason::Timeout => "timed out".to_string(),
            RetryReason::Connection(reason) => format!("connection failed: {}", reason),
        }
    }
}

pub struct AlchemyClient {
    http: reqwest::Client,
    config: ClientConfig,
    sleeper: Arc<dyn Sleeper>,
    rng: Mutex<StdRng>,
    request_id: AtomicU64,
}

impl AlchemyClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "http_client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            sleeper: Arc::new(TokioSleeper),
            rng: Mutex::new(StdRng::from_entropy()),
            request_id: AtomicU64::new(1),
        })
    }

    /// Replace the backoff sleeper (tests use a recording no-op)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Make jitter reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Scheme and host for a chain, without the API key
    pub fn base_url(&self, chain: Chain) -> String {
        match &self.config.endpoint_override {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), chain.endpoint_slug()),
            None => format!("https://{}.g.alchemy.com", chain.endpoint_slug()),
        }
    }

    pub fn rpc_url(&self, chain: Chain) -> String {
        format!("{}/v2/{}", self.base_url(chain), self.config.api_key)
    }

    pub fn nft_api_url(&self, chain: Chain, method: &str) -> String {
        format!(
            "{}/nft/v3/{}/{}",
            self.base_url(chain),
            self.config.api_key,
            method
        )
    }

    /// Strip the API key from any message that may end up in logs or errors
    pub fn sanitize(&self, message: &str) -> String {
        if self.config.api_key.is_empty() {
            return message.to_string();
        }
        message.replace(&self.config.api_key, "[REDACTED]")
    }

    /// JSON-RPC call returning the decoded `result` field.
    pub async fn rpc<T: DeserializeOwned>(
        &self,
        chain: Chain,
        method: &str,
        params: Value,
    ) -> Result<T, NetworkError> {
        let endpoint = endpoint_label(chain, method);
        let url = self.rpc_url(chain);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.request_id.fetch_add(1, Ordering::Relaxed),
        });

        let response = self
            .send_with_retry(&endpoint, || self.http.post(&url).json(&payload))
            .await?;
        let envelope: RpcEnvelope<T> = self.decode(&endpoint, response).await?;

        if let Some(error) = envelope.error {
            return Err(NetworkError::RpcError {
                endpoint,
                code: error.code,
                message: self.sanitize(&error.message.unwrap_or_else(|| "unknown error".to_string())),
            });
        }

        envelope
            .result
            .ok_or_else(|| NetworkError::InvalidResponse {
                endpoint,
                reason: "response has neither result nor error".to_string(),
            })
    }

    /// REST GET against the NFT API, decoding the whole body.
    pub async fn rest_get<T: DeserializeOwned>(
        &self,
        chain: Chain,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, NetworkError> {
        let endpoint = endpoint_label(chain, method);
        let url = self.nft_api_url(chain, method);

        let response = self
            .send_with_retry(&endpoint, || self.http.get(&url).query(query))
            .await?;
        self.decode(&endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: Response,
    ) -> Result<T, NetworkError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::ConnectionFailed {
                endpoint: endpoint.to_string(),
                reason: self.sanitize(&e.to_string()),
            })?;

        serde_json::from_slice(&body).map_err(|e| NetworkError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Issue the request built by `build`, retrying per the retry policy.
    async fn send_with_retry<F>(&self, endpoint: &str, build: F) -> Result<Response, NetworkError>
    where
        F: Fn() -> RequestBuilder,
    {
        let retry = self.config.retry;
        let mut backoff = retry.backoff();
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let reason = match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        if attempts > 1 {
                            debug!("{} succeeded on attempt {}", endpoint, attempts);
                        }
                        return Ok(response);
                    }
                    match status {
                        StatusCode::TOO_MANY_REQUESTS => RetryReason::RateLimited,
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            return Err(NetworkError::Unauthorized {
                                status_code: status.as_u16(),
                            })
                        }
                        s if s.is_server_error() && retry.retry_server_errors => {
                            RetryReason::ServerError(s.as_u16())
                        }
                        s => {
                            return Err(NetworkError::HttpError {
                                status_code: s.as_u16(),
                                endpoint: endpoint.to_string(),
                            })
                        }
                    }
                }
                Err(e) if e.is_timeout() => RetryReason::Timeout,
                Err(e) if e.is_connect() => {
                    RetryReason::Connection(self.sanitize(&e.to_string()))
                }
                Err(e) => {
                    return Err(NetworkError::ConnectionFailed {
                        endpoint: endpoint.to_string(),
                        reason: self.sanitize(&e.to_string()),
                    })
                }
            };

            let delay = {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                backoff.next_delay(&mut *rng)
            };

            match delay {
                Some(delay) => {
                    debug!(
                        "{} {} (attempt {}/{}). Retrying in {:?}",
                        endpoint,
                        reason.describe(),
                        attempts,
                        retry.max_retries + 1,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                }
                None => {
                    debug!("{} failed after {} retries", endpoint, backoff.retries_used());
                    return Err(reason.into_error(endpoint, backoff.retries_used(), attempts));
                }
            }
        }
    }
}

fn endpoint_label(chain: Chain, method: &str) -> String {
    format!("{}/{}", chain, method)
}

/// Delay recorded by [`RecordingSleeper`]
pub type SleepLog = Arc<Mutex<Vec<Duration>>>;

/// Sleeper that records requested delays and returns immediately.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    pub log: SleepLog,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
    }
}
