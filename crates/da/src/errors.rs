//! Errors returned by the lifecycle calls of a data availability client.

use crate::Phase;
use thiserror::Error;

/// Failure of a lifecycle call or of a local (non-network) step.
///
/// Operations never return this type directly; backends translate it into a
/// result with [crate::StatusCode::Error] at the interface boundary.
#[derive(Debug, Error)]
pub enum DaError {
    /// The backend configuration could not be parsed or is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A call was made in a phase that does not allow it.
    #[error("client is {found}, expected {expected}")]
    Lifecycle {
        /// The phase the call requires.
        expected: Phase,
        /// The phase the client was in.
        found: Phase,
    },
    /// A block could not be converted to or from its binary form.
    #[error("block serialization failed: {0}")]
    Serialization(String),
    /// The key-value store rejected an operation.
    #[error("key-value store error: {0}")]
    Store(String),
}

impl From<bincode::Error> for DaError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
