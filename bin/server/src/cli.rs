//! This module contains all CLI-specific code of the server binary.

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dalc_avail::AvailClient;
use dalc_da::{mock::MockDataAvailabilityLayerClient, DataAvailabilityLayerClient, NamespaceId};
use dalc_rpc::DEFAULT_PORT;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tracing_subscriber::EnvFilter;

/// Backends the server can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Avail light client.
    Avail,
    /// In-memory store, for local development.
    Mock,
}

/// The server binary CLI application arguments.
#[derive(Parser, Clone, Debug)]
#[command(version, about = "Serves a data availability layer client over JSON-RPC")]
pub struct ServerCli {
    /// Address the JSON-RPC server listens on
    #[arg(long, default_value_t = default_listen_addr(), env = "DALC_LISTEN_ADDR")]
    pub listen_addr: SocketAddr,
    /// The data availability backend to serve
    #[arg(long, value_enum, default_value_t = Backend::Avail, env = "DALC_BACKEND")]
    pub backend: Backend,
    /// Backend configuration file. When set, the server initializes and starts
    /// the client itself instead of waiting for `da_init` and `da_start`.
    #[arg(long, requires = "namespace_id", env = "DALC_CONFIG")]
    pub config: Option<PathBuf>,
    /// Namespace used when initializing from `--config`, as 16 hex characters
    #[arg(long, value_parser = parse_namespace_id, env = "DALC_NAMESPACE_ID")]
    pub namespace_id: Option<NamespaceId>,
    /// Verbosity level (0-2), overridden by `RUST_LOG`
    #[arg(long, short, action = ArgAction::Count)]
    pub v: u8,
}

const fn default_listen_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
}

fn parse_namespace_id(input: &str) -> Result<NamespaceId, String> {
    input
        .parse()
        .map_err(|e| format!("Failed to parse namespace id: {e}"))
}

impl ServerCli {
    /// Creates the client selected by `--backend`.
    pub fn client(&self) -> Arc<dyn DataAvailabilityLayerClient> {
        match self.backend {
            Backend::Avail => Arc::new(AvailClient::new()),
            Backend::Mock => Arc::new(MockDataAvailabilityLayerClient::new()),
        }
    }

    /// Reads the backend configuration file, if one was given.
    pub fn read_config(&self) -> Result<Option<Vec<u8>>> {
        self.config
            .as_ref()
            .map(|path| {
                std::fs::read(path)
                    .with_context(|| format!("Error reading config file {}", path.display()))
            })
            .transpose()
    }

    /// Installs the global tracing subscriber.
    pub fn init_tracing(&self) -> Result<()> {
        let level = match self.v {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = ServerCli::try_parse_from(["dalc-server"]).unwrap();
        assert_eq!(cli.listen_addr, "0.0.0.0:1234".parse().unwrap());
        assert_eq!(cli.backend, Backend::Avail);
        assert!(cli.config.is_none());
        assert!(cli.client().as_block_retriever().is_some());
    }

    #[test]
    fn test_config_requires_namespace() {
        assert!(ServerCli::try_parse_from(["dalc-server", "--config", "avail.json"]).is_err());

        let cli = ServerCli::try_parse_from([
            "dalc-server",
            "--backend",
            "mock",
            "--config",
            "mock.json",
            "--namespace-id",
            "0x00000000000000ff",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.backend, Backend::Mock);
        assert_eq!(cli.namespace_id, Some(NamespaceId([0, 0, 0, 0, 0, 0, 0, 0xff])));
        assert_eq!(cli.v, 2);
    }

    #[test]
    fn test_rejects_short_namespace() {
        assert!(ServerCli::try_parse_from(["dalc-server", "--namespace-id", "ff"]).is_err());
    }
}
