use bytes::Bytes;

/// Content handed to the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Raw content. `None` means there is nothing to send.
    pub bytes: Option<Bytes>,
    /// Precomputed digest of the whole of `bytes`.
    pub content_digest: Vec<u8>,
    /// Server-issued upload credential.
    pub transfer_key: Vec<u8>,
    /// Set when the server already holds this content.
    pub already_present: bool,
}

impl Payload {
    pub fn new(bytes: impl Into<Bytes>, content_digest: Vec<u8>, transfer_key: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            content_digest,
            transfer_key,
            already_present: false,
        }
    }

    /// Whether the payload has to go over the wire at all.
    ///
    /// Present, absent and zero-length payloads produce no frames.
    pub fn needs_upload(&self) -> bool {
        !self.already_present && !self.is_empty()
    }

    /// Payload length in bytes (0 when absent).
    pub fn len(&self) -> usize {
        self.bytes.as_ref().map_or(0, Bytes::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
