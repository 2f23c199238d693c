//! Contains the HTTP client of the light client API.

use crate::{AppData, Confidence, ProviderError};
use core::time::Duration;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Body the light client sends for a height it holds no application data for.
const NOT_FOUND: &str = "Not found";
/// Body the light client sends for a height it is still verifying.
const PROCESSING: &str = "Processing block";

/// Classified answer of the application data endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppDataResponse {
    /// The light client holds no data of this application at the height.
    NotFound,
    /// The height is still being produced or indexed.
    Processing,
    /// The decoded application data.
    Ready(AppData),
}

/// Reads confidence and application data from an Avail light client.
#[derive(Debug, Clone)]
pub struct LightClientProvider {
    /// The url of the light client HTTP API.
    base_url: String,
    /// The http client, carrying the request timeout.
    client: Client,
}

impl LightClientProvider {
    /// Creates a new `LightClientProvider` for the given url.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::from_reqwest(&base_url, e))?;
        Ok(Self { base_url, client })
    }

    /// Fetches the confidence record of the given height.
    pub async fn confidence(&self, height: u64) -> Result<Confidence, ProviderError> {
        let url = format!("{}/confidence/{height}", self.base_url);
        let (status, body) = self.get(&url).await?;
        if !status.is_success() {
            return Err(status_error(&url, status, &body));
        }
        decode(&url, &body)
    }

    /// Fetches the application data of the given height.
    pub async fn app_data(&self, height: u64) -> Result<AppDataResponse, ProviderError> {
        let url = format!("{}/appdata/{height}?decode=true", self.base_url);
        let (status, body) = self.get(&url).await?;

        // The light client reports both states as a bare string, whatever the status.
        let message = serde_json::from_slice::<String>(&body)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        match message.trim() {
            NOT_FOUND => return Ok(AppDataResponse::NotFound),
            PROCESSING => return Ok(AppDataResponse::Processing),
            _ => {}
        }
        if !status.is_success() {
            return Err(status_error(&url, status, &body));
        }
        decode(&url, &body).map(AppDataResponse::Ready)
    }

    async fn get(&self, url: &str) -> Result<(reqwest::StatusCode, Vec<u8>), ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(url, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(url, e))?;
        Ok((status, body.to_vec()))
    }
}

pub(crate) fn status_error(url: &str, status: reqwest::StatusCode, body: &[u8]) -> ProviderError {
    ProviderError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body).map_err(|e| ProviderError::decode(url, e, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn provider(server: &MockServer) -> LightClientProvider {
        LightClientProvider::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_app_data_states() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/appdata/1").query_param("decode", "true");
            then.status(404).body("\"Not found\"");
        });
        server.mock(|when, then| {
            when.method(GET).path("/appdata/2");
            then.status(200).body("\"Processing block\"");
        });
        server.mock(|when, then| {
            when.method(GET).path("/appdata/4");
            then.status(200).body("Processing block\n");
        });
        server.mock(|when, then| {
            when.method(GET).path("/appdata/3");
            then.status(200)
                .json_body(serde_json::json!({"block": 3, "extrinsics": ["a", "b"]}));
        });

        let provider = provider(&server);
        assert_eq!(provider.app_data(1).await.unwrap(), AppDataResponse::NotFound);
        assert_eq!(provider.app_data(2).await.unwrap(), AppDataResponse::Processing);
        assert_eq!(provider.app_data(4).await.unwrap(), AppDataResponse::Processing);
        assert_eq!(
            provider.app_data(3).await.unwrap(),
            AppDataResponse::Ready(AppData {
                block: 3,
                extrinsics: vec!["a".into(), "b".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_app_data_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/appdata/9");
            then.status(500).body("internal error");
        });

        let err = provider(&server).app_data(9).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 500, .. }));
        assert!(err.to_string().contains("internal error"));
    }

    #[tokio::test]
    async fn test_malformed_confidence_keeps_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/confidence/4");
            then.status(200).body("{\"block\": 4,");
        });

        match provider(&server).confidence(4).await.unwrap_err() {
            ProviderError::Decode { payload, .. } => assert_eq!(payload, "{\"block\": 4,"),
            err => panic!("unexpected error {err}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_light_client() {
        // Nothing listens on the discard port.
        let provider =
            LightClientProvider::new("http://127.0.0.1:9", Duration::from_secs(5)).unwrap();
        let err = provider.confidence(1).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Transport { .. } | ProviderError::Timeout { .. }
        ));
    }
}
