//! In-process transport backed by a tokio channel.
//!
//! Used to drive the listener in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::FeedSource;
use crate::error::FeedError;

enum Frame {
    Payload(Vec<u8>),
    Drop,
}

/// Subscription counters shared between a [`ChannelSource`] and observers.
#[derive(Debug, Default)]
pub struct SourceStats {
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
}

impl SourceStats {
    pub fn subscribes(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribes(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

/// Sending half of a [`ChannelSource`].
#[derive(Debug, Clone)]
pub struct FeedPublisher {
    tx: mpsc::UnboundedSender<Frame>,
}

impl FeedPublisher {
    /// Queue a raw payload. Returns `false` once the source is gone.
    pub fn publish(&self, payload: impl Into<Vec<u8>>) -> bool {
        self.tx.send(Frame::Payload(payload.into())).is_ok()
    }

    /// Make the source report a transport error on its next poll, as if the
    /// connection had dropped.
    pub fn drop_connection(&self) -> bool {
        self.tx.send(Frame::Drop).is_ok()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frame::Payload(p) => write!(f, "Payload({} bytes)", p.len()),
            Frame::Drop => write!(f, "Drop"),
        }
    }
}

pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Frame>,
    channel: Option<String>,
    refuse_subscribe: Option<String>,
    stats: Arc<SourceStats>,
}

impl ChannelSource {
    pub fn new() -> (Self, FeedPublisher) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            rx,
            channel: None,
            refuse_subscribe: None,
            stats: Arc::new(SourceStats::default()),
        };
        (source, FeedPublisher { tx })
    }

    /// A source that never delivers anything.
    pub fn idle() -> Self {
        Self::new().0
    }

    /// Make every `subscribe` call fail with `reason`.
    pub fn refusing(mut self, reason: impl Into<String>) -> Self {
        self.refuse_subscribe = Some(reason.into());
        self
    }

    pub fn stats(&self) -> Arc<SourceStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl FeedSource for ChannelSource {
    async fn subscribe(&mut self, channel: &str) -> Result<(), FeedError> {
        if let Some(reason) = &self.refuse_subscribe {
            return Err(FeedError::Subscribe {
                channel: channel.to_string(),
                reason: reason.clone(),
            });
        }
        self.stats.subscribes.fetch_add(1, Ordering::SeqCst);
        self.channel = Some(channel.to_string());
        Ok(())
    }

    async fn next_payload(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, FeedError> {
        if self.channel.is_none() {
            return Err(FeedError::Transport("not subscribed".into()));
        }

        match tokio::time::timeout(wait, self.rx.recv()).await {
            Err(_elapsed) => Ok(None),
            Ok(Some(Frame::Payload(payload))) => Ok(Some(payload)),
            Ok(Some(Frame::Drop)) => {
                self.channel = None;
                Err(FeedError::Transport("connection dropped".into()))
            }
            // Every publisher is gone; behave like a quiet channel.
            Ok(None) => {
                tokio::time::sleep(wait).await;
                Ok(None)
            }
        }
    }

    async fn unsubscribe(&mut self) -> Result<(), FeedError> {
        if self.channel.take().is_some() {
            self.stats.unsubscribes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
