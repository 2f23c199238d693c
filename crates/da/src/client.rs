//! The operation set every data availability backend implements.

use crate::{
    Block, DaError, NamespaceId, ResultCheckBlock, ResultRetrieveBlocks, ResultSubmitBlock,
    SharedKeyValueStore,
};
use async_trait::async_trait;
use core::fmt::Debug;
use tracing::Span;

/// Generic client of a data availability layer.
///
/// The lifecycle is `init` once, `start` once, then any number of operations,
/// then `stop`. Lifecycle calls return raw errors since no result envelope
/// exists before a client is set up; operations always return a typed result
/// and report failures through its status code.
///
/// Operations are futures: dropping one aborts its in-flight network calls.
#[async_trait]
pub trait DataAvailabilityLayerClient: Send + Sync + Debug {
    /// Reads the backend configuration and wires in the persistence handle.
    ///
    /// `logger` is the span every event emitted by the client is recorded in.
    /// Fails with [DaError::Config] on malformed configuration and with
    /// [DaError::Lifecycle] when the client was already initialized.
    fn init(
        &self,
        namespace_id: NamespaceId,
        config: &[u8],
        kv_store: SharedKeyValueStore,
        logger: Span,
    ) -> Result<(), DaError>;

    /// Starts serving operations.
    fn start(&self) -> Result<(), DaError>;

    /// Stops the client. Operations issued afterwards fail with an error result.
    fn stop(&self) -> Result<(), DaError>;

    /// Submits `block` to the layer.
    async fn submit_block(&self, block: &Block) -> ResultSubmitBlock;

    /// Checks whether data at `da_height` is available on the layer.
    async fn check_block_availability(&self, da_height: u64) -> ResultCheckBlock;

    /// Returns the block retrieval capability, if the backend has one.
    ///
    /// Callers must probe this rather than assume retrieval is possible.
    fn as_block_retriever(&self) -> Option<&dyn BlockRetriever> {
        None
    }
}

/// Optional capability of a client able to rebuild blocks from the layer.
/// Such a client can be used for block synchronization.
#[async_trait]
pub trait BlockRetriever: Send + Sync {
    /// Returns the blocks stored at `da_height`.
    async fn retrieve_blocks(&self, da_height: u64) -> ResultRetrieveBlocks;
}
