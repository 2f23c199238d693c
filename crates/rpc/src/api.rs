//! The `da` JSON-RPC namespace.

use dalc_da::{Block, NamespaceId, ResultCheckBlock, ResultRetrieveBlocks, ResultSubmitBlock};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// Data availability client operations, one method per client call.
#[rpc(server, client, namespace = "da")]
pub trait DaRpc {
    /// Initializes the served client. `config` is the backend's JSON configuration.
    #[method(name = "init")]
    async fn init(&self, namespace_id: NamespaceId, config: String) -> RpcResult<()>;

    #[method(name = "start")]
    async fn start(&self) -> RpcResult<()>;

    #[method(name = "stop")]
    async fn stop(&self) -> RpcResult<()>;

    #[method(name = "submit_block")]
    async fn submit_block(&self, block: Block) -> RpcResult<ResultSubmitBlock>;

    #[method(name = "check_block_availability")]
    async fn check_block_availability(&self, da_height: u64) -> RpcResult<ResultCheckBlock>;

    /// Fails with a method-not-found error when the backend cannot retrieve blocks.
    #[method(name = "retrieve_blocks")]
    async fn retrieve_blocks(&self, da_height: u64) -> RpcResult<ResultRetrieveBlocks>;

    /// Whether `retrieve_blocks` is available.
    #[method(name = "supports_block_retrieval")]
    async fn supports_block_retrieval(&self) -> RpcResult<bool>;
}
