use async_trait::async_trait;
use dalc_avail::AvailClient;
use dalc_da::{
    mock::MockDataAvailabilityLayerClient, BaseResult, Block, DaError,
    DataAvailabilityLayerClient, MemoryKeyValueStore, NamespaceId, ResultCheckBlock,
    ResultSubmitBlock, SharedKeyValueStore, StatusCode, Tx,
};
use dalc_rpc::{DaRpcClient, DaRpcHandler, RpcServer, LIFECYCLE_ERROR_CODE};
use jsonrpsee::{
    core::ClientError,
    http_client::{HttpClient, HttpClientBuilder},
    server::ServerHandle,
    types::error::{INVALID_PARAMS_CODE, METHOD_NOT_FOUND_CODE},
};
use std::sync::Arc;
use tracing::Span;

/// A backend that submits but cannot retrieve.
#[derive(Debug, Default)]
struct SubmitOnlyClient;

#[async_trait]
impl DataAvailabilityLayerClient for SubmitOnlyClient {
    fn init(
        &self,
        _: NamespaceId,
        _: &[u8],
        _: SharedKeyValueStore,
        _: Span,
    ) -> Result<(), DaError> {
        Ok(())
    }

    fn start(&self) -> Result<(), DaError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), DaError> {
        Ok(())
    }

    async fn submit_block(&self, block: &Block) -> ResultSubmitBlock {
        BaseResult::success("accepted", block.height()).into()
    }

    async fn check_block_availability(&self, da_height: u64) -> ResultCheckBlock {
        ResultCheckBlock::checked("always available", da_height, true)
    }
}

async fn serve(client: Arc<dyn DataAvailabilityLayerClient>) -> (HttpClient, ServerHandle) {
    let handler = DaRpcHandler::new(client, MemoryKeyValueStore::shared());
    let (addr, handle) = RpcServer::new(handler, "127.0.0.1:0".parse().unwrap())
        .start()
        .await
        .unwrap();
    let rpc_client = HttpClientBuilder::default()
        .build(format!("http://{addr}"))
        .unwrap();
    (rpc_client, handle)
}

fn error_code(err: ClientError) -> i32 {
    match err {
        ClientError::Call(err) => err.code(),
        err => panic!("unexpected client error {err}"),
    }
}

#[tokio::test]
async fn test_mock_backend_lifecycle_over_rpc() {
    let (rpc, handle) = serve(Arc::new(MockDataAvailabilityLayerClient::new())).await;
    let namespace_id: NamespaceId = "0102030405060708".parse().unwrap();

    let early = rpc.submit_block(Block::empty(1)).await.unwrap();
    assert_eq!(early.base.code, StatusCode::Error);

    rpc.init(namespace_id, String::new()).await.unwrap();
    rpc.start().await.unwrap();
    assert!(rpc.supports_block_retrieval().await.unwrap());

    let block = Block::new(5, vec![Tx(vec![1, 2, 3]), Tx(b"abc".to_vec())]);
    let submitted = rpc.submit_block(block.clone()).await.unwrap();
    assert_eq!(submitted.base.code, StatusCode::Success);

    let checked = rpc
        .check_block_availability(submitted.base.da_height)
        .await
        .unwrap();
    assert!(checked.data_available);

    let retrieved = rpc.retrieve_blocks(submitted.base.da_height).await.unwrap();
    assert_eq!(retrieved.base.code, StatusCode::Success);
    assert_eq!(retrieved.blocks, vec![block]);

    rpc.stop().await.unwrap();
    let err = rpc.stop().await.unwrap_err();
    assert_eq!(error_code(err), LIFECYCLE_ERROR_CODE);
    let after_stop = rpc.check_block_availability(1).await.unwrap();
    assert_eq!(after_stop.base.code, StatusCode::Error);

    handle.stop().unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_connections_share_client() {
    let (rpc, handle) = serve(Arc::new(MockDataAvailabilityLayerClient::new())).await;
    rpc.init(NamespaceId::default(), String::new()).await.unwrap();
    rpc.start().await.unwrap();

    let submissions = (0..16u64).map(|height| {
        let rpc = rpc.clone();
        tokio::spawn(async move { rpc.submit_block(Block::empty(height)).await.unwrap() })
    });
    let mut da_heights = Vec::new();
    for submission in submissions {
        let result = submission.await.unwrap();
        assert!(result.base.is_success());
        da_heights.push(result.base.da_height);
    }
    da_heights.sort_unstable();
    assert_eq!(da_heights, (1..=16).collect::<Vec<_>>());

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_retrieval_capability_probe() {
    let (rpc, handle) = serve(Arc::new(SubmitOnlyClient)).await;
    rpc.init(NamespaceId::default(), String::new()).await.unwrap();
    rpc.start().await.unwrap();

    assert!(!rpc.supports_block_retrieval().await.unwrap());
    let err = rpc.retrieve_blocks(1).await.unwrap_err();
    assert_eq!(error_code(err), METHOD_NOT_FOUND_CODE);

    let submitted = rpc.submit_block(Block::empty(9)).await.unwrap();
    assert_eq!(submitted.base.da_height, 9);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_malformed_config_is_rejected() {
    let (rpc, handle) = serve(Arc::new(AvailClient::new())).await;

    let err = rpc
        .init(NamespaceId::default(), "{\"base_url\":".to_string())
        .await
        .unwrap_err();
    assert_eq!(error_code(err), INVALID_PARAMS_CODE);

    let err = rpc.start().await.unwrap_err();
    assert_eq!(error_code(err), LIFECYCLE_ERROR_CODE);

    handle.stop().unwrap();
}
