//! Contains the Avail implementation of the data availability client contract.

use crate::{
    AppDataResponse, AvailConfig, DataSubmitter, HttpDataSubmitter, LightClientProvider,
    ProviderError, SubmitRequest,
};
use async_trait::async_trait;
use core::fmt;
use dalc_da::{
    BaseResult, Block, BlockRetriever, DaError, DataAvailabilityLayerClient, Lifecycle,
    NamespaceId, Phase, ResultCheckBlock, ResultRetrieveBlocks, ResultSubmitBlock,
    SharedKeyValueStore, Tx,
};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn, Instrument, Span};

/// Height reported for a block that was just submitted. It is not a verified
/// layer height; confirmation requires a following availability check.
pub const SUBMITTED_DA_HEIGHT: u64 = 1;

/// Everything set at initialization. Never mutated afterwards.
struct AvailState {
    namespace_id: NamespaceId,
    config: AvailConfig,
    provider: LightClientProvider,
    submitter: Arc<dyn DataSubmitter>,
    /// Checkpoints the hash of every submitted block.
    kv_store: SharedKeyValueStore,
    logger: Span,
}

/// Data availability client backed by an Avail light client.
#[derive(Default)]
pub struct AvailClient {
    lifecycle: Lifecycle,
    state: OnceLock<AvailState>,
    submitter: Option<Arc<dyn DataSubmitter>>,
}

impl AvailState {
    fn submission_key(&self, block_height: u64) -> Vec<u8> {
        format!("avail/{}/submitted/{block_height}", self.namespace_id).into_bytes()
    }
}

impl AvailClient {
    /// Creates a client submitting through the light client's HTTP API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client submitting through the given transport.
    pub fn with_submitter(submitter: Arc<dyn DataSubmitter>) -> Self {
        Self {
            submitter: Some(submitter),
            ..Self::default()
        }
    }

    fn running_state(&self) -> Result<&AvailState, DaError> {
        self.lifecycle.ensure(Phase::Running)?;
        self.state.get().ok_or(DaError::Lifecycle {
            expected: Phase::Running,
            found: Phase::Uninitialized,
        })
    }

    async fn submit(state: &AvailState, block: &Block) -> ResultSubmitBlock {
        let data = match block.to_bytes() {
            Ok(data) => data,
            Err(err) => return BaseResult::error(err).into(),
        };

        let request = SubmitRequest {
            seed: &state.config.seed,
            app_id: state.config.app_id,
            data: &data,
        };
        match state.submitter.submit_data(request).await {
            Ok(tx_hash) => {
                info!(target: "avail-client", block_height = block.height(), %tx_hash, bytes = data.len(), "submitted block");
                let checkpoint = state
                    .kv_store
                    .write()
                    .await
                    .set(state.submission_key(block.height()), tx_hash.0.to_vec());
                if let Err(err) = checkpoint {
                    warn!(target: "avail-client", block_height = block.height(), "failed to checkpoint submission: {err}");
                }
                BaseResult::success(format!("tx hash: {tx_hash}"), SUBMITTED_DA_HEIGHT).into()
            }
            Err(err) => {
                warn!(target: "avail-client", block_height = block.height(), "failed to submit block: {err}");
                BaseResult::error(err).into()
            }
        }
    }

    async fn check(state: &AvailState, da_height: u64) -> ResultCheckBlock {
        let confidence = match state.provider.confidence(da_height).await {
            Ok(confidence) => confidence,
            Err(err) => {
                log_provider_error(&err, da_height);
                return BaseResult::error(err).into();
            }
        };

        let reported_height = u64::from(confidence.block);
        if reported_height != da_height {
            warn!(target: "avail-client", da_height, reported_height, "light client answered for another height");
        }
        let data_available = confidence.confidence > state.config.confidence;
        debug!(target: "avail-client", reported_height, confidence = confidence.confidence, data_available, "checked availability");
        ResultCheckBlock::checked(
            format!("confidence {}", confidence.confidence),
            reported_height,
            data_available,
        )
    }

    async fn retrieve(&self, state: &AvailState, da_height: u64) -> ResultRetrieveBlocks {
        let policy = state.config.retry_policy();
        let mut attempt = 1;
        let app_data = loop {
            match state.provider.app_data(da_height).await {
                Ok(AppDataResponse::Ready(app_data)) => break app_data,
                Ok(AppDataResponse::NotFound) => {
                    debug!(target: "avail-client", da_height, "no application data at height");
                    return ResultRetrieveBlocks::retrieved(da_height, vec![Block::empty(da_height)]);
                }
                Ok(AppDataResponse::Processing) if attempt < policy.max_attempts => {
                    let backoff = policy.backoff(attempt);
                    debug!(target: "avail-client", da_height, attempt, ?backoff, "height still processing, retrying");
                    tokio::time::sleep(backoff).await;
                    // Stop may land while waiting.
                    if let Err(err) = self.lifecycle.ensure(Phase::Running) {
                        debug!(target: "avail-client", da_height, attempt, "abandoning retrieval: {err}");
                        return BaseResult::error(err).into();
                    }
                    attempt += 1;
                }
                Ok(AppDataResponse::Processing) => {
                    warn!(target: "avail-client", da_height, attempt, "height still processing, giving up");
                    return BaseResult::processing(format!(
                        "da height {da_height} still processing after {attempt} attempts"
                    ))
                    .into();
                }
                Err(err) => {
                    log_provider_error(&err, da_height);
                    return BaseResult::error(err).into();
                }
            }
        };

        let txs = app_data.concat_extrinsics();
        debug!(target: "avail-client", da_height, extrinsics = app_data.extrinsics.len(), bytes = txs.len(), "retrieved application data");
        let block = Block::new(da_height, vec![Tx(txs)]);
        ResultRetrieveBlocks::retrieved(u64::from(app_data.block), vec![block])
    }
}

fn log_provider_error(err: &ProviderError, da_height: u64) {
    match err {
        ProviderError::Decode { payload, .. } => {
            warn!(target: "avail-client", da_height, %payload, "{err}")
        }
        _ => warn!(target: "avail-client", da_height, "{err}"),
    }
}

impl fmt::Debug for AvailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.get();
        f.debug_struct("AvailClient")
            .field("phase", &self.lifecycle.phase())
            .field("namespace_id", &state.map(|s| s.namespace_id))
            .field("config", &state.map(|s| &s.config))
            .finish()
    }
}

#[async_trait]
impl DataAvailabilityLayerClient for AvailClient {
    fn init(
        &self,
        namespace_id: NamespaceId,
        config: &[u8],
        kv_store: SharedKeyValueStore,
        logger: Span,
    ) -> Result<(), DaError> {
        self.lifecycle.ensure(Phase::Uninitialized)?;
        let config = AvailConfig::from_slice(config)?;
        let provider = LightClientProvider::new(config.base_url.clone(), config.request_timeout())
            .map_err(|e| DaError::Config(e.to_string()))?;
        let submitter = match &self.submitter {
            Some(submitter) => submitter.clone(),
            None => Arc::new(
                HttpDataSubmitter::new(&config.api_url, config.request_timeout())
                    .map_err(|e| DaError::Config(e.to_string()))?,
            ),
        };

        let state = AvailState {
            namespace_id,
            config,
            provider,
            submitter,
            kv_store,
            logger: logger.clone(),
        };
        if self.state.set(state).is_err() {
            return Err(DaError::Lifecycle {
                expected: Phase::Uninitialized,
                found: self.lifecycle.phase(),
            });
        }
        self.lifecycle
            .transition(Phase::Uninitialized, Phase::Initialized)?;

        logger.in_scope(|| info!(target: "avail-client", %namespace_id, "initialized avail data availability layer client"));
        Ok(())
    }

    fn start(&self) -> Result<(), DaError> {
        self.lifecycle.transition(Phase::Initialized, Phase::Running)?;
        if let Some(state) = self.state.get() {
            state.logger.in_scope(|| {
                let retry_budget = state.config.retry_policy().budget();
                info!(target: "avail-client", base_url = %state.config.base_url, api_url = %state.config.api_url, ?retry_budget, "starting avail data availability layer client")
            });
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), DaError> {
        self.lifecycle.transition(Phase::Running, Phase::Stopped)?;
        if let Some(state) = self.state.get() {
            state
                .logger
                .in_scope(|| info!(target: "avail-client", "stopping avail data availability layer client"));
        }
        Ok(())
    }

    async fn submit_block(&self, block: &Block) -> ResultSubmitBlock {
        match self.running_state() {
            Ok(state) => Self::submit(state, block).instrument(state.logger.clone()).await,
            Err(err) => BaseResult::error(err).into(),
        }
    }

    async fn check_block_availability(&self, da_height: u64) -> ResultCheckBlock {
        match self.running_state() {
            Ok(state) => Self::check(state, da_height).instrument(state.logger.clone()).await,
            Err(err) => BaseResult::error(err).into(),
        }
    }

    fn as_block_retriever(&self) -> Option<&dyn BlockRetriever> {
        Some(self)
    }
}

#[async_trait]
impl BlockRetriever for AvailClient {
    async fn retrieve_blocks(&self, da_height: u64) -> ResultRetrieveBlocks {
        match self.running_state() {
            Ok(state) => self.retrieve(state, da_height).instrument(state.logger.clone()).await,
            Err(err) => BaseResult::error(err).into(),
        }
    }
}
