//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files;
//! every field has a default so a partial (or absent) file still yields a
//! working configuration.

use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT_SECS};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Client transaction engine settings.
    pub client: ClientConfig,

    /// REST server settings.
    pub server: ServerConfig,
}

/// Client transaction engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Read deadline for one transaction, in seconds.
    pub timeout_secs: u64,

    /// Receive buffer size in bytes.
    pub buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// REST server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}
