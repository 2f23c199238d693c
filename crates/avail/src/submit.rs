//! Data submission.

use crate::{provider::status_error, ProviderError};
use async_trait::async_trait;
use core::{fmt, str::FromStr, time::Duration};
use hex::FromHex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Hash of a submitted transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <[u8; 32]>::from_hex(s.trim_start_matches("0x")).map(Self)
    }
}

/// Everything a transport needs to put data on chain.
#[derive(Clone, Copy)]
pub struct SubmitRequest<'a> {
    /// Key material of the submitter.
    pub seed: &'a str,
    pub app_id: u32,
    /// The serialized block.
    pub data: &'a [u8],
}

impl fmt::Debug for SubmitRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitRequest")
            .field("app_id", &self.app_id)
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// Transport putting submitted data on the layer.
#[async_trait]
pub trait DataSubmitter: Send + Sync + fmt::Debug {
    /// Submits the data and returns the hash of the resulting transaction.
    async fn submit_data(&self, request: SubmitRequest<'_>) -> Result<TxHash, ProviderError>;
}

#[derive(Serialize)]
struct SubmitBody {
    data: String,
    app_id: u32,
}

#[derive(Deserialize)]
struct SubmitResponse {
    hash: String,
}

/// Submits through the `/v2/submit` endpoint of a light client running in app mode.
///
/// The light client signs with its own key, the seed of the request never
/// leaves the process.
#[derive(Debug, Clone)]
pub struct HttpDataSubmitter {
    submit_url: String,
    client: Client,
}

impl HttpDataSubmitter {
    pub fn new(api_url: &str, request_timeout: Duration) -> Result<Self, ProviderError> {
        let submit_url = format!("{api_url}/v2/submit");
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::from_reqwest(&submit_url, e))?;
        Ok(Self { submit_url, client })
    }
}

#[async_trait]
impl DataSubmitter for HttpDataSubmitter {
    async fn submit_data(&self, request: SubmitRequest<'_>) -> Result<TxHash, ProviderError> {
        let url = self.submit_url.as_str();
        let body = SubmitBody {
            data: format!("0x{}", hex::encode(request.data)),
            app_id: request.app_id,
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(url, e))?;
        let status = response.status();
        let payload = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(url, e))?;
        if !status.is_success() {
            return Err(status_error(url, status, &payload));
        }

        let submitted: SubmitResponse = serde_json::from_slice(&payload)
            .map_err(|e| ProviderError::decode(url, e, &payload))?;
        submitted
            .hash
            .parse()
            .map_err(|e| ProviderError::decode(url, e, &payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const HASH: &str = "0x8f3a9b2c01d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e";

    #[test]
    fn test_tx_hash_round_trip() {
        let hash: TxHash = HASH.parse().unwrap();
        assert_eq!(format!("0x{hash}"), HASH);
        assert!("0x1234".parse::<TxHash>().is_err());
    }

    #[tokio::test]
    async fn test_submit_posts_hex_data() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v2/submit")
                .json_body(serde_json::json!({"data": "0x010203", "app_id": 7}));
            then.status(200).json_body(serde_json::json!({
                "block_number": 120,
                "block_hash": "0x00",
                "hash": HASH,
                "index": 1
            }));
        });

        let submitter = HttpDataSubmitter::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let hash = submitter
            .submit_data(SubmitRequest {
                seed: "//Alice",
                app_id: 7,
                data: &[1, 2, 3],
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(hash, HASH.parse().unwrap());
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_hash() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v2/submit");
            then.status(200).json_body(serde_json::json!({"hash": "0xnothex"}));
        });

        let submitter = HttpDataSubmitter::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = submitter
            .submit_data(SubmitRequest {
                seed: "//Alice",
                app_id: 7,
                data: &[],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
