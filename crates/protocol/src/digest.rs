use md5::{Digest, Md5};

/// Content fingerprint used for chunks and whole payloads.
pub trait ContentDigest: Send + Sync {
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}

/// 128-bit MD5 fingerprint, as expected by the highway server.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl ContentDigest for Md5Digest {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        Md5::digest(data).to_vec()
    }
}
