//! Chunk header model for highway uploads.
//!
//! Each chunk on the wire carries a [`ChunkHead`] serialized by a
//! [`HeadEncoder`], fingerprinted by a [`ContentDigest`].

pub mod constants;
pub mod digest;
pub mod encode;
pub mod head;

// Re-export primary types for convenience.
pub use constants::CommandClass;
pub use digest::{ContentDigest, Md5Digest};
pub use encode::{HeadEncoder, ProtobufHeadEncoder};
pub use head::{BaseHead, ChunkHead, SegmentHead};
