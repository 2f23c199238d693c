//! Backend configuration, decoded from the JSON blob passed to `init`.

use crate::RetryPolicy;
use core::time::Duration;
use dalc_da::DaError;
use serde::{Deserialize, Serialize};

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_retrieve_max_attempts() -> u32 {
    10
}

const fn default_retrieve_initial_backoff_ms() -> u64 {
    500
}

const fn default_retrieve_max_backoff_ms() -> u64 {
    8_000
}

/// Configuration of the Avail backend.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailConfig {
    /// The url of the light client HTTP API, used for confidence and app data.
    pub base_url: String,
    /// Key material of the submitter.
    pub seed: String,
    /// The url of the submission API.
    pub api_url: String,
    /// Application the rollup submits under and reads from.
    pub app_id: u32,
    /// Confidence threshold, between 0 and 100. Data is available above it.
    pub confidence: f64,
    /// Timeout of a single HTTP request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Requests made for a height that is still processing before giving up.
    #[serde(default = "default_retrieve_max_attempts")]
    pub retrieve_max_attempts: u32,
    #[serde(default = "default_retrieve_initial_backoff_ms")]
    pub retrieve_initial_backoff_ms: u64,
    #[serde(default = "default_retrieve_max_backoff_ms")]
    pub retrieve_max_backoff_ms: u64,
}

impl AvailConfig {
    /// Decodes and validates a configuration blob.
    pub fn from_slice(raw: &[u8]) -> Result<Self, DaError> {
        if raw.is_empty() {
            return Err(DaError::Config("empty avail configuration".to_string()));
        }
        let mut config: Self =
            serde_json::from_slice(raw).map_err(|e| DaError::Config(e.to_string()))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DaError> {
        if self.base_url.is_empty() {
            return Err(DaError::Config("base_url must be set".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(DaError::Config("api_url must be set".to_string()));
        }
        if self.seed.is_empty() {
            return Err(DaError::Config("seed must be set".to_string()));
        }
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(DaError::Config(format!(
                "confidence must be within 0 and 100, got {}",
                self.confidence
            )));
        }
        if self.retrieve_max_attempts == 0 {
            return Err(DaError::Config(
                "retrieve_max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retrieve_max_attempts,
            initial_backoff: Duration::from_millis(self.retrieve_initial_backoff_ms),
            max_backoff: Duration::from_millis(self.retrieve_max_backoff_ms),
        }
    }
}

impl core::fmt::Debug for AvailConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AvailConfig")
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("app_id", &self.app_id)
            .field("confidence", &self.confidence)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retrieve_max_attempts", &self.retrieve_max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "base_url": "http://localhost:7000/v1/",
        "seed": "bottom drive obey lake curtain smoke basket hold race lonely fit walk//Alice",
        "api_url": "http://localhost:7000",
        "app_id": 1,
        "confidence": 92.5
    }"#;

    #[test]
    fn test_defaults() {
        let config = AvailConfig::from_slice(CONFIG.as_bytes()).unwrap();
        assert_eq!(config.base_url, "http://localhost:7000/v1");
        assert_eq!(config.app_id, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_seed_is_not_printed() {
        let config = AvailConfig::from_slice(CONFIG.as_bytes()).unwrap();
        assert!(!format!("{config:?}").contains("Alice"));
    }

    #[test]
    fn test_rejects_malformed_config() {
        for raw in [
            "",
            "{",
            r#"{"base_url": "http://a", "seed": "s", "api_url": "http://b", "app_id": 1}"#,
            r#"{"base_url": "", "seed": "s", "api_url": "http://b", "app_id": 1, "confidence": 1}"#,
            r#"{"base_url": "http://a", "seed": "", "api_url": "http://b", "app_id": 1, "confidence": 1}"#,
            r#"{"base_url": "http://a", "seed": "s", "api_url": "http://b", "app_id": 1, "confidence": 100.5}"#,
            r#"{"base_url": "http://a", "seed": "s", "api_url": "http://b", "app_id": 1, "confidence": 1, "retrieve_max_attempts": 0}"#,
        ] {
            assert!(
                matches!(AvailConfig::from_slice(raw.as_bytes()), Err(DaError::Config(_))),
                "accepted {raw}"
            );
        }
    }
}
