//! Configuration schema types for Kestrel.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that match a local development
//! backend (`localhost:8080` for the API, `localhost:6379` for the feed).

mod api;
mod feed;
mod session;
mod system;

pub use api::*;
pub use feed::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Kestrel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct KestrelConfig {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
