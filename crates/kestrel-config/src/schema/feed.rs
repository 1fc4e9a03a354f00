//! Event feed configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis pub/sub feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub redis_url: String,
    /// Pub/sub channel the backend publishes change notifications on.
    pub channel: String,
    /// Bounded wait per poll in milliseconds (valid range: 10-60000).
    /// Also the worst-case latency for observing a stop request.
    pub poll_timeout_ms: u32,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u32,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u32,
    /// Limit on connecting and subscribing, in seconds (valid range: 1-120).
    /// A server that accepts the socket but never answers fails the
    /// subscription after this long.
    pub connect_timeout_secs: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".into(),
            channel: "php-chat".into(),
            poll_timeout_ms: 1000,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FeedConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_timeout_ms))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.reconnect_delay_secs))
    }

    pub fn max_reconnect_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_reconnect_delay_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }
}
