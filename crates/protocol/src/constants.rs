use serde::{Deserialize, Serialize};

/// Protocol version carried in every base head.
pub const PROTOCOL_VERSION: u32 = 1;

/// Application id of the uploading client.
pub const APP_ID: u32 = 537_062_409;

/// Data flag sent with every upload segment.
pub const DATA_FLAG: u32 = 4096;

/// Locale id (zh-CN).
pub const LOCALE_ID: u32 = 2052;

/// Command name shared by every chunked-upload request.
pub const UPLOAD_COMMAND: &str = "PicUp.DataUp";

/// Payload class of an upload, sent as the numeric command id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandClass {
    /// Chat image upload.
    Image,
    /// Forwarded / multi-message bundle upload.
    GroupMessage,
}

impl CommandClass {
    /// Numeric command id understood by the highway server.
    pub fn command_id(self) -> u32 {
        match self {
            CommandClass::Image => 2,
            CommandClass::GroupMessage => 27,
        }
    }
}
