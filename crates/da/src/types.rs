//! Typed outcomes of data availability operations.

use crate::Block;
use serde::{Deserialize, Serialize};

/// Terminal classification of an operation outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u64)]
pub enum StatusCode {
    #[default]
    Unknown = 0,
    Success = 1,
    NotFound = 2,
    Error = 3,
    /// The layer is still producing the requested data and the retry budget ran out.
    Processing = 4,
}

/// Fields shared by every result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResult {
    /// Determines whether the action succeeded.
    pub code: StatusCode,
    /// Layer specific information, e.g. a transaction hash or an error diagnostic.
    pub message: String,
    /// Height on the data availability layer this result refers to, `0` if unknown.
    pub da_height: u64,
}

impl BaseResult {
    pub fn success(message: impl Into<String>, da_height: u64) -> Self {
        Self {
            code: StatusCode::Success,
            message: message.into(),
            da_height,
        }
    }

    /// An error result. An empty diagnostic is replaced, errors always carry a message.
    pub fn error(message: impl ToString) -> Self {
        Self::failure(StatusCode::Error, message.to_string())
    }

    pub fn processing(message: impl ToString) -> Self {
        Self::failure(StatusCode::Processing, message.to_string())
    }

    fn failure(code: StatusCode, mut message: String) -> Self {
        if message.is_empty() {
            message = format!("unspecified {code:?} status");
        }
        Self {
            code,
            message,
            da_height: 0,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.code, StatusCode::Success)
    }
}

/// Outcome of a block submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmitBlock {
    #[serde(flatten)]
    pub base: BaseResult,
}

impl From<BaseResult> for ResultSubmitBlock {
    fn from(base: BaseResult) -> Self {
        Self { base }
    }
}

/// Outcome of an availability check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCheckBlock {
    #[serde(flatten)]
    pub base: BaseResult,
    /// Whether the layer is confident enough that data at the height is available.
    pub data_available: bool,
}

impl ResultCheckBlock {
    pub fn checked(message: impl Into<String>, da_height: u64, data_available: bool) -> Self {
        Self {
            base: BaseResult::success(message, da_height),
            data_available,
        }
    }
}

impl From<BaseResult> for ResultCheckBlock {
    fn from(base: BaseResult) -> Self {
        Self {
            base,
            data_available: false,
        }
    }
}

/// Blocks reconstructed from a data availability layer height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRetrieveBlocks {
    #[serde(flatten)]
    pub base: BaseResult,
    pub blocks: Vec<Block>,
}

impl ResultRetrieveBlocks {
    pub fn retrieved(da_height: u64, blocks: Vec<Block>) -> Self {
        Self {
            base: BaseResult::success(String::new(), da_height),
            blocks,
        }
    }
}

impl From<BaseResult> for ResultRetrieveBlocks {
    fn from(base: BaseResult) -> Self {
        Self {
            base,
            blocks: Vec::new(),
        }
    }
}
