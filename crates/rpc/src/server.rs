//! Serves a data availability client over JSON-RPC.

use crate::{
    api::DaRpcServer,
    errors::{da_error, retrieval_unsupported},
};
use dalc_da::{
    Block, DataAvailabilityLayerClient, NamespaceId, ResultCheckBlock, ResultRetrieveBlocks,
    ResultSubmitBlock, SharedKeyValueStore,
};
use jsonrpsee::{
    core::{async_trait, RpcResult},
    server::{Server, ServerHandle},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn};

/// Serves one client instance, shared by every connection.
#[derive(Clone)]
pub struct DaRpcHandler {
    client: Arc<dyn DataAvailabilityLayerClient>,
    /// Handed to the client when a node initializes it.
    kv_store: SharedKeyValueStore,
}

impl DaRpcHandler {
    pub fn new(client: Arc<dyn DataAvailabilityLayerClient>, kv_store: SharedKeyValueStore) -> Self {
        Self { client, kv_store }
    }
}

#[async_trait]
impl DaRpcServer for DaRpcHandler {
    async fn init(&self, namespace_id: NamespaceId, config: String) -> RpcResult<()> {
        let logger = info_span!("da_client", %namespace_id);
        self.client
            .init(namespace_id, config.as_bytes(), self.kv_store.clone(), logger)
            .map_err(da_error)
    }

    async fn start(&self) -> RpcResult<()> {
        self.client.start().map_err(da_error)
    }

    async fn stop(&self) -> RpcResult<()> {
        self.client.stop().map_err(da_error)
    }

    async fn submit_block(&self, block: Block) -> RpcResult<ResultSubmitBlock> {
        Ok(self.client.submit_block(&block).await)
    }

    async fn check_block_availability(&self, da_height: u64) -> RpcResult<ResultCheckBlock> {
        Ok(self.client.check_block_availability(da_height).await)
    }

    async fn retrieve_blocks(&self, da_height: u64) -> RpcResult<ResultRetrieveBlocks> {
        match self.client.as_block_retriever() {
            Some(retriever) => Ok(retriever.retrieve_blocks(da_height).await),
            None => Err(retrieval_unsupported()),
        }
    }

    async fn supports_block_retrieval(&self) -> RpcResult<bool> {
        Ok(self.client.as_block_retriever().is_some())
    }
}

/// JSON-RPC server exposing a data availability client.
pub struct RpcServer {
    handler: DaRpcHandler,
    listen_addr: SocketAddr,
}

impl RpcServer {
    pub fn new(handler: DaRpcHandler, listen_addr: SocketAddr) -> Self {
        Self {
            handler,
            listen_addr,
        }
    }

    /// Binds the listener and starts serving. Returns the bound address.
    pub async fn start(self) -> anyhow::Result<(SocketAddr, ServerHandle)> {
        let server = Server::builder().build(self.listen_addr).await?;
        let local_addr = server.local_addr()?;
        let handle = server.start(self.handler.into_rpc());
        info!(target: "da-rpc", %local_addr, "JSON-RPC server is listening");
        Ok((local_addr, handle))
    }

    /// Serves until a stop signal is received, then stops the served client.
    pub async fn run(self, mut stop_receiver: watch::Receiver<bool>) -> anyhow::Result<()> {
        let client = self.handler.client.clone();
        let (_, handle) = self.start().await?;

        let stop_handle = handle.clone();
        tokio::spawn(async move {
            if stop_receiver.changed().await.is_err() {
                warn!(
                    target: "da-rpc",
                    "Stop signal sender for JSON-RPC server was dropped \
                     without sending a signal"
                );
            }

            stop_handle.stop().ok()
        });

        handle.stopped().await;
        info!(target: "da-rpc", "JSON-RPC server stopped");
        if let Err(err) = client.stop() {
            debug!(target: "da-rpc", "client was not running at shutdown: {err}");
        }
        Ok(())
    }
}
