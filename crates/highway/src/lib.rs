//! Chunked TCP uploads to highway transfer servers.
//!
//! Payloads are cut into frames by the [`frame`] module, streamed over one
//! TCP connection per payload by [`TransferSession`], and fanned out over an
//! [`EndpointPool`] by [`Uploader`]. Transfers are best effort: every attempt
//! ends in [`TransferOutcome::Done`], whatever happened on the wire.
//!
//! # Wire format
//!
//! See [`frame`] module for the frame layout.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod payload;
pub mod sequence;
pub mod session;
pub mod upload;

pub use config::HighwayConfig;
pub use endpoint::{Endpoint, EndpointPool};
pub use error::HighwayError;
pub use frame::{FrameBuilder, MAX_CHUNK_SIZE};
pub use payload::Payload;
pub use sequence::{FixedSequence, RandomSequence, SequenceSource};
pub use session::{TransferOutcome, TransferSession};
pub use upload::Uploader;

pub use skyhaul_protocol::CommandClass;

use std::time::Duration;

/// TCP write buffer size (256 KB).
pub const TCP_BUFFER_SIZE: usize = 256 * 1024;

/// Default timeout for the TCP connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit for a single stalled write, flush or shutdown.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(60);
