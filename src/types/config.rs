//! Configuration structures.
//!
//! Defaults mirror the classic uevent limits: a 2 KiB environment buffer
//! holding at most 32 entries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Delivery configuration shared by the dispatcher and registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment buffer byte capacity, NUL terminators included.
    pub max_env_bytes: usize,

    /// Maximum number of `key=value` entries per event.
    pub max_env_keys: usize,

    /// Per-endpoint channel depth. A full channel drops the payload for that
    /// endpoint (best-effort delivery).
    pub endpoint_capacity: usize,

    /// Maximum number of registered subscriber endpoints.
    pub max_endpoints: usize,

    /// Usermode helper program. `None` disables the helper channel entirely.
    pub helper_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_env_bytes: 2048,
            max_env_keys: 32,
            endpoint_capacity: 64,
            max_endpoints: 256,
            helper_path: None,
        }
    }
}
