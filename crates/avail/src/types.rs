use serde::{Deserialize, Serialize};

/// Confidence record served by `GET /confidence/{height}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Height the record refers to, as reported by the light client.
    pub block: u32,
    /// Confidence that the data at `block` is available, between 0 and 100.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialised_confidence: Option<String>,
}

/// Application data served by `GET /appdata/{height}?decode=true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub block: u32,
    /// Decoded extrinsics of the configured application, in block order.
    pub extrinsics: Vec<String>,
}

impl AppData {
    /// Concatenates the raw bytes of all extrinsics, in order and without delimiters.
    pub fn concat_extrinsics(&self) -> Vec<u8> {
        let mut txs = Vec::with_capacity(self.extrinsics.iter().map(String::len).sum());
        for extrinsic in &self.extrinsics {
            txs.extend_from_slice(extrinsic.as_bytes());
        }
        txs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_is_byte_exact() {
        let app_data = AppData {
            block: 5,
            extrinsics: vec!["ab".into(), String::new(), "c d".into(), "ü".into()],
        };
        assert_eq!(app_data.concat_extrinsics(), "abc dü".as_bytes());
        assert!(AppData::default().concat_extrinsics().is_empty());
    }

    #[test]
    fn test_confidence_without_serialised_field() {
        let confidence: Confidence =
            serde_json::from_str(r#"{"block": 12, "confidence": 93.75}"#).unwrap();
        assert_eq!(confidence.block, 12);
        assert_eq!(confidence.serialised_confidence, None);
    }
}
