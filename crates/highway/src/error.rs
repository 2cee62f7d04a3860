//! Error types for the highway client.
//!
//! Transfers themselves never fail (see [`TransferOutcome`](crate::TransferOutcome));
//! these errors only cover setup performed by the caller.

/// Errors produced while preparing an upload.
#[derive(Debug, thiserror::Error)]
pub enum HighwayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("endpoint lists differ in length: {addresses} addresses, {ports} ports")]
    EndpointMismatch { addresses: usize, ports: usize },
}
