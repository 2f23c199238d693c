//! Errors raised while talking to the light client.

use thiserror::Error;

/// A failed call against the light client or the submission endpoint.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    /// The endpoint answered with a non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },
    /// The endpoint answered with a payload that could not be decoded.
    #[error("failed to decode response from {url}: {reason}")]
    Decode {
        url: String,
        reason: String,
        /// The raw payload, kept for diagnosis.
        payload: String,
    },
}

impl ProviderError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn decode(url: &str, err: impl ToString, payload: &[u8]) -> Self {
        Self::Decode {
            url: url.to_string(),
            reason: err.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        }
    }
}
