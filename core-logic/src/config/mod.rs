use crate::error::ConfigError;
use crate::utils::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tunables that may come from a config file; everything but the API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    /// Replaces `https://{slug}.g.alchemy.com` with `{endpoint_override}/{slug}`
    pub endpoint_override: Option<String>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry: RetryConfig::default(),
            endpoint_override: None,
        }
    }
}

impl TuningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.retry.jitter) {
            return Err(ConfigError::InvalidValue {
                field: "retry.jitter".to_string(),
                reason: format!("{} is outside [0, 1)", self.retry.jitter),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_multiplier".to_string(),
                reason: "must be >= 1.0".to_string(),
            });
        }
        if let Some(base) = &self.endpoint_override {
            url::Url::parse(base).map_err(|e| ConfigError::InvalidValue {
                field: "endpoint_override".to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Everything the Alchemy client needs, passed explicitly per client.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub endpoint_override: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_tuning(api_key, TuningConfig::default())
    }

    pub fn from_tuning(api_key: impl Into<String>, tuning: TuningConfig) -> Self {
        Self {
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(tuning.request_timeout_secs),
            retry: tuning.retry,
            endpoint_override: tuning.endpoint_override,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_endpoint_override(mut self, base: impl Into<String>) -> Self {
        self.endpoint_override = Some(base.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api_key".to_string(),
            });
        }
        Ok(())
    }
}

// Keeps the key out of debug logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("secret-key-123");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        assert!(ClientConfig::new("  ").validate().is_err());
        assert!(ClientConfig::new("key").validate().is_ok());
    }

    #[test]
    fn test_tuning_validation() {
        let mut tuning = TuningConfig::default();
        assert!(tuning.validate().is_ok());

        tuning.retry.jitter = 1.5;
        assert!(tuning.validate().is_err());

        let tuning = TuningConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = TuningConfig {
            endpoint_override: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
