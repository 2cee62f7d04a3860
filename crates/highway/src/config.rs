//! Upload client configuration.
//!
//! Stored as TOML:
//!
//! ```toml
//! connect_timeout_secs = 30
//! io_timeout_secs = 60        # 0 disables the I/O timeout
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HighwayError;
use crate::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_IO_TIMEOUT};

/// Highway client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighwayConfig {
    /// Seconds allowed for the TCP connection attempt.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds a single write, flush or shutdown may stall before the session
    /// is abandoned. `0` means no limit.
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_io_timeout_secs() -> u64 {
    DEFAULT_IO_TIMEOUT.as_secs()
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

impl HighwayConfig {
    /// Parses configuration from a TOML document. Missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self, HighwayError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, HighwayError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "highway configuration loaded");
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Per-step I/O limit, or `None` when a stalled connection may hang forever.
    pub fn io_timeout(&self) -> Option<Duration> {
        match self.io_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
