//! One payload over one connection.
//!
//! A session connects to a single endpoint, writes every frame of the payload
//! in order, flushes, shuts the connection down and reports
//! [`TransferOutcome::Done`]. A remote close, a transport error or a stalled
//! connection ends the session with the same outcome; nothing is retried.
//!
//! The I/O timeout bounds each individual step (one frame write, the flush,
//! the shutdown), not the session as a whole: a slow connection that keeps
//! accepting bytes runs to completion.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info, warn};

use skyhaul_protocol::CommandClass;

use crate::TCP_BUFFER_SIZE;
use crate::config::HighwayConfig;
use crate::endpoint::Endpoint;
use crate::frame::FrameBuilder;
use crate::payload::Payload;
use crate::sequence::{RandomSequence, SequenceSource};

/// Result of a transfer attempt.
///
/// The server sends no application-level acknowledgment, so the only thing a
/// caller learns is that the attempt concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Done,
}

/// How a session actually ended. Only used for logging.
#[derive(Debug)]
enum Ending {
    Flushed,
    RemoteClosed,
    TransportError(io::Error),
    TimedOut,
}

/// Streams payloads to highway endpoints, one connection per payload.
#[derive(Clone)]
pub struct TransferSession {
    frames: FrameBuilder,
    sequence: Arc<dyn SequenceSource>,
    config: HighwayConfig,
}

impl Default for TransferSession {
    fn default() -> Self {
        Self::new(
            FrameBuilder::default(),
            Arc::new(RandomSequence),
            HighwayConfig::default(),
        )
    }
}

impl TransferSession {
    pub fn new(
        frames: FrameBuilder,
        sequence: Arc<dyn SequenceSource>,
        config: HighwayConfig,
    ) -> Self {
        Self {
            frames,
            sequence,
            config,
        }
    }

    /// Uploads `payload` to `endpoint`.
    ///
    /// Skipped payloads (already present, absent or empty) make no connection.
    pub async fn transfer(
        &self,
        account: u64,
        endpoint: Endpoint,
        payload: &Payload,
        command: CommandClass,
    ) -> TransferOutcome {
        let data = match &payload.bytes {
            Some(data) if payload.needs_upload() => data,
            _ => {
                debug!(%endpoint, "highway upload skipped");
                return TransferOutcome::Done;
            }
        };

        match self.run(account, endpoint, data, payload, command).await {
            Ending::Flushed => {
                info!(%endpoint, bytes = data.len(), "highway upload sent");
            }
            Ending::RemoteClosed => {
                debug!(%endpoint, "highway connection closed by server");
            }
            Ending::TransportError(e) => {
                warn!(%endpoint, error = %e, "highway upload interrupted");
            }
            Ending::TimedOut => {
                warn!(%endpoint, "highway upload stalled");
            }
        }
        TransferOutcome::Done
    }

    async fn run(
        &self,
        account: u64,
        endpoint: Endpoint,
        data: &Bytes,
        payload: &Payload,
        command: CommandClass,
    ) -> Ending {
        let addr = endpoint.socket_addr();
        let stream =
            match tokio::time::timeout(self.config.connect_timeout(), TcpStream::connect(addr))
                .await
            {
                Ok(Ok(s)) => s,
                Ok(Err(e)) => return Ending::TransportError(e),
                Err(_) => return Ending::TimedOut,
            };

        let start_seq = self.sequence.next_start();
        let frames = self.frames.build(
            account,
            data,
            &payload.content_digest,
            &payload.transfer_key,
            command,
            start_seq,
        );
        debug!(
            %addr,
            chunks = frames.len(),
            start_seq,
            file_md5 = %hex::encode(&payload.content_digest),
            "highway connection established"
        );

        let (reader, writer) = stream.into_split();
        tokio::select! {
            result = write_frames(writer, &frames, self.config.io_timeout()) => match result {
                Ok(()) => Ending::Flushed,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => Ending::TimedOut,
                Err(e) => Ending::TransportError(e),
            },
            ending = wait_remote_close(reader) => ending,
        }
    }
}

/// Writes all frames back to back, flushes and shuts the write side down.
///
/// Each step must complete within `limit`; a step that makes no progress in
/// time fails with [`io::ErrorKind::TimedOut`].
async fn write_frames(
    writer: OwnedWriteHalf,
    frames: &[Bytes],
    limit: Option<Duration>,
) -> io::Result<()> {
    let mut writer = BufWriter::with_capacity(TCP_BUFFER_SIZE, writer);
    for frame in frames {
        within(limit, writer.write_all(frame)).await?;
    }
    within(limit, writer.flush()).await?;
    within(limit, writer.shutdown()).await?;
    Ok(())
}

async fn within<T>(
    limit: Option<Duration>,
    step: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    match limit {
        // Elapsed converts into an io::Error of kind TimedOut.
        Some(limit) => tokio::time::timeout(limit, step).await?,
        None => step.await,
    }
}

/// Resolves once the peer closes the connection. Anything it sends is discarded.
///
/// A half-close from the server (EOF on the read side) ends the session
/// immediately, even if frames are still queued for writing.
async fn wait_remote_close(mut reader: OwnedReadHalf) -> Ending {
    let mut buf = [0u8; 1024];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => return Ending::RemoteClosed,
            Ok(n) => debug!(n, "discarding highway server bytes"),
            Err(e) => return Ending::TransportError(e),
        }
    }
}
