use serde::{Deserialize, Serialize};

use crate::constants::{
    APP_ID, CommandClass, DATA_FLAG, LOCALE_ID, PROTOCOL_VERSION, UPLOAD_COMMAND,
};

/// Protocol identity and sequencing of one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHead {
    pub version: u32,
    /// Uploading account, rendered in decimal.
    pub uin: String,
    pub command: String,
    pub seq: u32,
    pub app_id: u32,
    pub data_flag: u32,
    pub command_id: u32,
    pub locale_id: u32,
}

impl BaseHead {
    /// Builds the base head for an upload chunk with the fixed protocol identity.
    pub fn upload(account: u64, seq: u32, command: CommandClass) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            uin: account.to_string(),
            command: UPLOAD_COMMAND.to_string(),
            seq,
            app_id: APP_ID,
            data_flag: DATA_FLAG,
            command_id: command.command_id(),
            locale_id: LOCALE_ID,
        }
    }
}

/// Position and fingerprints of one chunk within its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentHead {
    /// Total payload size in bytes.
    pub file_size: u64,
    pub data_offset: u64,
    pub data_length: u32,
    /// Server-issued transfer key, passed through unmodified.
    pub service_ticket: Vec<u8>,
    /// Digest of this chunk.
    pub md5: Vec<u8>,
    /// Digest of the whole payload.
    pub file_md5: Vec<u8>,
}

/// Metadata header preceding every chunk on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkHead {
    pub base: BaseHead,
    pub segment: SegmentHead,
    #[serde(default)]
    pub extend_info: Vec<u8>,
}

impl ChunkHead {
    pub fn new(base: BaseHead, segment: SegmentHead) -> Self {
        Self {
            base,
            segment,
            extend_info: Vec::new(),
        }
    }
}
