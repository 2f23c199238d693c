use anyhow::Result;
use clap::Parser;
use dalc_da::MemoryKeyValueStore;
use dalc_rpc::{DaRpcHandler, RpcServer};
use tokio::sync::watch;
use tracing::{info, info_span};

mod cli;
use cli::ServerCli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    cli.init_tracing()?;

    let client = cli.client();
    let kv_store = MemoryKeyValueStore::shared();

    if let (Some(config), Some(namespace_id)) = (cli.read_config()?, cli.namespace_id) {
        let logger = info_span!("da_client", %namespace_id);
        client.init(namespace_id, &config, kv_store.clone(), logger)?;
        client.start()?;
    }

    let (stop_sender, stop_receiver) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
        }
        stop_sender.send(true).ok();
    });

    info!(backend = ?cli.backend, "Starting data availability server");
    RpcServer::new(DaRpcHandler::new(client, kv_store), cli.listen_addr)
        .run(stop_receiver)
        .await
}
