use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long shutdown waits for the feed listener to close, in
    /// milliseconds (valid range: 0-60000).
    pub shutdown_grace_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_ms: 2000,
        }
    }
}

impl SessionConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(u64::from(self.shutdown_grace_ms))
    }
}
