//! Chunk head serialization.
//!
//! The highway server expects the head as a protobuf `ReqDataHighwayHead`
//! message. Only the fields the upload path sets are emitted; every one of
//! them is written even when it holds a zero value.

use bytes::{BufMut, BytesMut};

use crate::head::{BaseHead, ChunkHead, SegmentHead};

/// Serializes a [`ChunkHead`] into the bytes placed inside a frame.
///
/// Implementations must be deterministic: the same head always yields the
/// same bytes.
pub trait HeadEncoder: Send + Sync {
    fn encode(&self, head: &ChunkHead) -> Vec<u8>;
}

/// Protobuf wire encoding of `ReqDataHighwayHead`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufHeadEncoder;

impl HeadEncoder for ProtobufHeadEncoder {
    fn encode(&self, head: &ChunkHead) -> Vec<u8> {
        let mut w = ProtoWriter::default();
        w.message(1, &encode_base(&head.base));
        w.message(2, &encode_segment(&head.segment));
        w.bytes(3, &head.extend_info);
        w.into_vec()
    }
}

fn encode_base(base: &BaseHead) -> BytesMut {
    let mut w = ProtoWriter::default();
    w.uint(1, base.version.into());
    w.bytes(2, base.uin.as_bytes());
    w.bytes(3, base.command.as_bytes());
    w.uint(4, base.seq.into());
    w.uint(6, base.app_id.into());
    w.uint(7, base.data_flag.into());
    w.uint(8, base.command_id.into());
    w.uint(10, base.locale_id.into());
    w.buf
}

fn encode_segment(segment: &SegmentHead) -> BytesMut {
    let mut w = ProtoWriter::default();
    w.uint(2, segment.file_size);
    w.uint(3, segment.data_offset);
    w.uint(4, segment.data_length.into());
    w.bytes(6, &segment.service_ticket);
    w.bytes(8, &segment.md5);
    w.bytes(9, &segment.file_md5);
    w.buf
}

const WIRE_VARINT: u32 = 0;
const WIRE_LEN: u32 = 2;

#[derive(Default)]
struct ProtoWriter {
    buf: BytesMut,
}

impl ProtoWriter {
    fn varint(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.buf.put_u8((v as u8 & 0x7F) | 0x80);
            v >>= 7;
        }
        self.buf.put_u8(v as u8);
    }

    fn key(&mut self, field: u32, wire_type: u32) {
        self.varint(u64::from(field << 3 | wire_type));
    }

    fn uint(&mut self, field: u32, v: u64) {
        self.key(field, WIRE_VARINT);
        self.varint(v);
    }

    fn bytes(&mut self, field: u32, data: &[u8]) {
        self.key(field, WIRE_LEN);
        self.varint(data.len() as u64);
        self.buf.put_slice(data);
    }

    fn message(&mut self, field: u32, inner: &[u8]) {
        self.bytes(field, inner);
    }

    fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}
