//! Highway frame construction.
//!
//! # Wire format
//!
//! ```text
//! PER CHUNK (client -> server):
//!   [1 byte: 0x28 start marker]
//!   [4 bytes BE: head_len]
//!   [head_len bytes: serialized ChunkHead]
//!   [data_length bytes: chunk data]      (data_length lives in the head)
//!   [1 byte: 0x29 end marker]
//! ```
//!
//! A payload is cut into chunks of at most [`MAX_CHUNK_SIZE`] bytes. Chunk
//! `n` carries offset `n * MAX_CHUNK_SIZE` and sequence `start_seq + n`.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use skyhaul_protocol::{
    BaseHead, ChunkHead, CommandClass, ContentDigest, HeadEncoder, Md5Digest,
    ProtobufHeadEncoder, SegmentHead,
};

/// Largest chunk carried by a single frame (64 KiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

/// First byte of every frame.
pub const FRAME_START: u8 = 40;

/// Last byte of every frame.
pub const FRAME_END: u8 = 41;

/// Marker bytes plus the head length field.
pub const FRAME_OVERHEAD: usize = 1 + 4 + 1;

/// Number of frames a payload of `size` bytes is cut into.
pub fn chunk_count(size: usize) -> usize {
    size.div_ceil(MAX_CHUNK_SIZE)
}

/// Cuts payloads into frames using the configured head encoder and digest.
#[derive(Clone)]
pub struct FrameBuilder {
    encoder: Arc<dyn HeadEncoder>,
    digest: Arc<dyn ContentDigest>,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new(Arc::new(ProtobufHeadEncoder), Arc::new(Md5Digest))
    }
}

impl FrameBuilder {
    pub fn new(encoder: Arc<dyn HeadEncoder>, digest: Arc<dyn ContentDigest>) -> Self {
        Self { encoder, digest }
    }

    /// Builds every frame for `data`, in offset order.
    ///
    /// An empty `data` yields no frames.
    pub fn build(
        &self,
        account: u64,
        data: &[u8],
        content_digest: &[u8],
        transfer_key: &[u8],
        command: CommandClass,
        start_seq: u32,
    ) -> Vec<Bytes> {
        build_frames(
            self.encoder.as_ref(),
            self.digest.as_ref(),
            account,
            data,
            content_digest,
            transfer_key,
            command,
            start_seq,
        )
    }
}

/// Builds every frame for `data` with explicit collaborators.
#[allow(clippy::too_many_arguments)]
pub fn build_frames(
    encoder: &dyn HeadEncoder,
    digest: &dyn ContentDigest,
    account: u64,
    data: &[u8],
    content_digest: &[u8],
    transfer_key: &[u8],
    command: CommandClass,
    start_seq: u32,
) -> Vec<Bytes> {
    let file_size = data.len() as u64;
    let mut frames = Vec::with_capacity(chunk_count(data.len()));

    // `chunks` never yields an empty slice, so an exact multiple of the
    // chunk size ends without a trailing empty frame.
    for (index, chunk) in data.chunks(MAX_CHUNK_SIZE).enumerate() {
        let head = ChunkHead::new(
            BaseHead::upload(account, start_seq.wrapping_add(index as u32), command),
            SegmentHead {
                file_size,
                data_offset: (index * MAX_CHUNK_SIZE) as u64,
                data_length: chunk.len() as u32,
                service_ticket: transfer_key.to_vec(),
                md5: digest.digest(chunk),
                file_md5: content_digest.to_vec(),
            },
        );
        let head = encoder.encode(&head);

        let mut frame = BytesMut::with_capacity(FRAME_OVERHEAD + head.len() + chunk.len());
        encode_frame(&head, chunk, &mut frame);
        frames.push(frame.freeze());
    }

    frames
}

/// Appends one frame to `dst`.
pub fn encode_frame(head: &[u8], chunk: &[u8], dst: &mut BytesMut) {
    dst.reserve(FRAME_OVERHEAD + head.len() + chunk.len());
    dst.put_u8(FRAME_START);
    dst.put_u32(head.len() as u32);
    dst.put_slice(head);
    dst.put_slice(chunk);
    dst.put_u8(FRAME_END);
}
