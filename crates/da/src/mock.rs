//! In-memory backend for local development and tests.
//!
//! Every submitted block gets the next data availability height and is kept
//! in the key-value store handed over at initialization. Stored heights are
//! reported as available.

use crate::{
    BaseResult, Block, BlockRetriever, DaError, DataAvailabilityLayerClient, Lifecycle,
    NamespaceId, Phase, ResultCheckBlock, ResultRetrieveBlocks, ResultSubmitBlock,
    SharedKeyValueStore,
};
use async_trait::async_trait;
use core::fmt;
use serde::Deserialize;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    OnceLock,
};
use tracing::{debug, info, Span};

/// Configuration of the mock backend. An empty blob selects the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    /// Height after which the first submitted block is stored.
    #[serde(default)]
    pub start_height: u64,
}

struct MockState {
    namespace_id: NamespaceId,
    kv_store: SharedKeyValueStore,
    logger: Span,
}

impl MockState {
    fn key(&self, da_height: u64) -> Vec<u8> {
        format!("mock-da/{}/{da_height}", self.namespace_id).into_bytes()
    }
}

/// A [DataAvailabilityLayerClient] keeping blocks in a key-value store.
#[derive(Default)]
pub struct MockDataAvailabilityLayerClient {
    lifecycle: Lifecycle,
    state: OnceLock<MockState>,
    da_height: AtomicU64,
}

impl MockDataAvailabilityLayerClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn running_state(&self) -> Result<&MockState, DaError> {
        self.lifecycle.ensure(Phase::Running)?;
        self.state.get().ok_or(DaError::Lifecycle {
            expected: Phase::Running,
            found: Phase::Uninitialized,
        })
    }
}

impl fmt::Debug for MockDataAvailabilityLayerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDataAvailabilityLayerClient")
            .field("phase", &self.lifecycle.phase())
            .field("namespace_id", &self.state.get().map(|s| s.namespace_id))
            .field("da_height", &self.da_height.load(Ordering::Relaxed))
            .finish()
    }
}

#[async_trait]
impl DataAvailabilityLayerClient for MockDataAvailabilityLayerClient {
    fn init(
        &self,
        namespace_id: NamespaceId,
        config: &[u8],
        kv_store: SharedKeyValueStore,
        logger: Span,
    ) -> Result<(), DaError> {
        self.lifecycle.ensure(Phase::Uninitialized)?;
        let config = if config.is_empty() {
            MockConfig::default()
        } else {
            serde_json::from_slice::<MockConfig>(config)
                .map_err(|e| DaError::Config(e.to_string()))?
        };

        let state = MockState {
            namespace_id,
            kv_store,
            logger: logger.clone(),
        };
        if self.state.set(state).is_err() {
            return Err(DaError::Lifecycle {
                expected: Phase::Uninitialized,
                found: self.lifecycle.phase(),
            });
        }
        self.da_height.store(config.start_height, Ordering::SeqCst);
        self.lifecycle
            .transition(Phase::Uninitialized, Phase::Initialized)?;

        logger.in_scope(|| {
            info!(target: "mock-da", %namespace_id, start_height = config.start_height, "initialized mock data availability layer client")
        });
        Ok(())
    }

    fn start(&self) -> Result<(), DaError> {
        self.lifecycle.transition(Phase::Initialized, Phase::Running)?;
        if let Some(state) = self.state.get() {
            state
                .logger
                .in_scope(|| info!(target: "mock-da", "starting mock data availability layer client"));
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), DaError> {
        self.lifecycle.transition(Phase::Running, Phase::Stopped)?;
        if let Some(state) = self.state.get() {
            state
                .logger
                .in_scope(|| info!(target: "mock-da", "stopping mock data availability layer client"));
        }
        Ok(())
    }

    async fn submit_block(&self, block: &Block) -> ResultSubmitBlock {
        let state = match self.running_state() {
            Ok(state) => state,
            Err(err) => return BaseResult::error(err).into(),
        };
        let bytes = match block.to_bytes() {
            Ok(bytes) => bytes,
            Err(err) => return BaseResult::error(err).into(),
        };

        let da_height = self.da_height.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(err) = state.kv_store.write().await.set(state.key(da_height), bytes) {
            return BaseResult::error(err).into();
        }

        state.logger.in_scope(|| {
            debug!(target: "mock-da", da_height, block_height = block.height(), "stored block")
        });
        BaseResult::success(format!("stored at da height {da_height}"), da_height).into()
    }

    async fn check_block_availability(&self, da_height: u64) -> ResultCheckBlock {
        let state = match self.running_state() {
            Ok(state) => state,
            Err(err) => return BaseResult::error(err).into(),
        };

        let available = state.kv_store.read().await.get(&state.key(da_height)).is_some();
        ResultCheckBlock::checked(
            if available { "confidence 100" } else { "confidence 0" },
            da_height,
            available,
        )
    }

    fn as_block_retriever(&self) -> Option<&dyn BlockRetriever> {
        Some(self)
    }
}

#[async_trait]
impl BlockRetriever for MockDataAvailabilityLayerClient {
    async fn retrieve_blocks(&self, da_height: u64) -> ResultRetrieveBlocks {
        let state = match self.running_state() {
            Ok(state) => state,
            Err(err) => return BaseResult::error(err).into(),
        };

        let stored = state.kv_store.read().await.get(&state.key(da_height));
        match stored {
            Some(bytes) => match Block::from_bytes(&bytes) {
                Ok(block) => ResultRetrieveBlocks::retrieved(da_height, vec![block]),
                Err(err) => BaseResult::error(err).into(),
            },
            None => {
                state.logger.in_scope(|| {
                    debug!(target: "mock-da", da_height, "no block stored, returning an empty one")
                });
                ResultRetrieveBlocks::retrieved(da_height, vec![Block::empty(da_height)])
            }
        }
    }
}
