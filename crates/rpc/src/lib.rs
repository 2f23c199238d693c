//! JSON-RPC exposure of a data availability client.
//!
//! Lets the client run out of process from the rollup node. Every connection
//! is served concurrently against the same client instance; the `da_*`
//! methods map one to one onto the client operations.

mod api;
pub use api::{DaRpcClient, DaRpcServer};

mod server;
pub use server::{DaRpcHandler, RpcServer};

pub mod errors;
pub use errors::LIFECYCLE_ERROR_CODE;

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 1234;
