//! Minimal rollup block shape consumed and produced by the clients.

use crate::DaError;
use core::{fmt, str::FromStr};
use hex::FromHex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An opaque rollup transaction.
///
/// Human readable encodings (JSON) carry the bytes as a hex string, binary
/// encodings carry them as raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tx(pub Vec<u8>);

impl AsRef<[u8]> for Tx {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Tx {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for Tx {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(&self.0))
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Tx {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let encoded = String::deserialize(deserializer)?;
            hex::decode(encoded.trim_start_matches("0x"))
                .map(Self)
                .map_err(de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer).map(Self)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub height: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    pub txs: Vec<Tx>,
}

/// A rollup block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub data: Data,
}

impl Block {
    /// Creates a block at `height` holding `txs`.
    pub fn new(height: u64, txs: Vec<Tx>) -> Self {
        Self {
            header: Header { height },
            data: Data { txs },
        }
    }

    /// Creates a block at `height` without transactions.
    pub fn empty(height: u64) -> Self {
        Self::new(height, Vec::new())
    }

    pub const fn height(&self) -> u64 {
        self.header.height
    }

    /// Encodes the block into its canonical binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DaError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a block from its canonical binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DaError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Identifies the partition of the layer a rollup writes to and reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub [u8; 8]);

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for NamespaceId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <[u8; 8]>::from_hex(s.trim_start_matches("0x")).map(Self)
    }
}

impl Serialize for NamespaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for NamespaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            String::deserialize(deserializer)?
                .parse()
                .map_err(de::Error::custom)
        } else {
            <[u8; 8]>::deserialize(deserializer).map(Self)
        }
    }
}
