//! Avail light client backend.
//!
//! Translates the data availability client contract into calls against an
//! Avail light client: data submission, confidence polling and block
//! reconstruction from application data.

mod client;
pub use client::{AvailClient, SUBMITTED_DA_HEIGHT};

mod config;
pub use config::AvailConfig;

mod provider;
pub use provider::{AppDataResponse, LightClientProvider};

mod retry;
pub use retry::RetryPolicy;

mod submit;
pub use submit::{DataSubmitter, HttpDataSubmitter, SubmitRequest, TxHash};

mod types;
pub use types::{AppData, Confidence};

pub mod errors;
pub use errors::ProviderError;
