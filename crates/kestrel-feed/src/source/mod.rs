//! Transports the listener can poll.

mod memory;
mod pubsub;

pub use memory::{ChannelSource, FeedPublisher, SourceStats};
pub use pubsub::RedisSource;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::FeedError;

/// A subscribable stream of raw payloads.
///
/// Implementations are owned by a single listener task, so methods take
/// `&mut self`.
#[async_trait]
pub trait FeedSource: Send + 'static {
    /// Subscribe to `channel`. Called once at start and again after a
    /// transport error.
    async fn subscribe(&mut self, channel: &str) -> Result<(), FeedError>;

    /// Wait up to `wait` for the next payload. `Ok(None)` means the wait
    /// elapsed with nothing to deliver.
    async fn next_payload(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, FeedError>;

    /// Drop the subscription and release the connection.
    async fn unsubscribe(&mut self) -> Result<(), FeedError>;
}
