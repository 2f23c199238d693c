//! Data availability layer client contract.
//!
//! A rollup node talks to an external data availability layer through the
//! [DataAvailabilityLayerClient] trait. Every operation returns a typed result
//! carrying a [StatusCode]; only the lifecycle calls return raw errors.
//! Backends able to reconstruct blocks additionally expose a [BlockRetriever],
//! which callers discover through [DataAvailabilityLayerClient::as_block_retriever].

mod block;
pub use block::{Block, Data, Header, NamespaceId, Tx};

mod types;
pub use types::{BaseResult, ResultCheckBlock, ResultRetrieveBlocks, ResultSubmitBlock, StatusCode};

mod client;
pub use client::{BlockRetriever, DataAvailabilityLayerClient};

mod lifecycle;
pub use lifecycle::{Lifecycle, Phase};

mod store;
pub use store::{KeyValueStore, MemoryKeyValueStore, SharedKeyValueStore};

pub mod errors;
pub use errors::DaError;

pub mod mock;
