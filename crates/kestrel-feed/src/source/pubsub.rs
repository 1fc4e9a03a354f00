//! Redis pub/sub transport.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::{debug, info};

use super::FeedSource;
use crate::error::FeedError;

/// Connect and subscribe together must finish within this by default.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RedisSource {
    url: String,
    connect_timeout: Duration,
    pubsub: Option<redis::aio::PubSub>,
    channel: Option<String>,
}

impl RedisSource {
    /// Create a source for `url`. No connection is made until
    /// [`FeedSource::subscribe`].
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pubsub: None,
            channel: None,
        }
    }

    /// Bound the time spent connecting and subscribing. A server that
    /// accepts the socket but never answers fails the subscription instead
    /// of stalling it.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    async fn connect(&self, channel: &str) -> Result<redis::aio::PubSub, redis::RedisError> {
        let client = redis::Client::open(self.url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;
        Ok(pubsub)
    }
}

impl std::fmt::Debug for RedisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSource")
            .field("url", &self.url)
            .field("connect_timeout", &self.connect_timeout)
            .field("channel", &self.channel)
            .field("connected", &self.pubsub.is_some())
            .finish()
    }
}

#[async_trait]
impl FeedSource for RedisSource {
    async fn subscribe(&mut self, channel: &str) -> Result<(), FeedError> {
        self.pubsub = None;
        info!(url = %self.url, channel = %channel, "Subscribing to Redis channel");
        let subscribe_error = |reason: String| FeedError::Subscribe {
            channel: channel.to_string(),
            reason,
        };
        let pubsub = tokio::time::timeout(self.connect_timeout, self.connect(channel))
            .await
            .map_err(|_elapsed| subscribe_error("timed out".to_string()))?
            .map_err(|e| subscribe_error(e.to_string()))?;
        self.pubsub = Some(pubsub);
        self.channel = Some(channel.to_string());
        Ok(())
    }

    async fn next_payload(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, FeedError> {
        let pubsub = self
            .pubsub
            .as_mut()
            .ok_or_else(|| FeedError::Transport("not subscribed".into()))?;

        let next = {
            let stream = pubsub.on_message();
            futures_util::pin_mut!(stream);
            tokio::time::timeout(wait, stream.next()).await
        };

        match next {
            Err(_elapsed) => Ok(None),
            Ok(Some(msg)) => Ok(Some(msg.get_payload_bytes().to_vec())),
            Ok(None) => {
                self.pubsub = None;
                Err(FeedError::Transport("redis connection closed".into()))
            }
        }
    }

    async fn unsubscribe(&mut self) -> Result<(), FeedError> {
        let (Some(mut pubsub), Some(channel)) = (self.pubsub.take(), self.channel.take()) else {
            return Ok(());
        };
        debug!(channel = %channel, "Unsubscribing from Redis channel");
        pubsub
            .unsubscribe(channel.as_str())
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn next_payload_before_subscribe_is_transport_error() {
        let mut source = RedisSource::new("redis://127.0.0.1:6379");
        let err = source
            .next_payload(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)));
    }

    #[tokio::test]
    async fn unsubscribe_without_subscription_is_noop() {
        let mut source = RedisSource::new("redis://127.0.0.1:6379");
        assert!(source.unsubscribe().await.is_ok());
    }

    #[tokio::test]
    async fn subscribe_with_invalid_url_fails() {
        let mut source = RedisSource::new("not a redis url");
        let err = source.subscribe("php-chat").await.unwrap_err();
        match err {
            FeedError::Subscribe { channel, .. } => assert_eq!(channel, "php-chat"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn subscribe_times_out_when_server_never_answers() {
        let server = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        let _silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = server.accept().await {
                held.push(socket);
            }
        });

        let mut source = RedisSource::new(format!("redis://{addr}"))
            .with_connect_timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = tokio::time::timeout(Duration::from_secs(5), source.subscribe("php-chat"))
            .await
            .expect("subscribe should give up on its own")
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        match err {
            FeedError::Subscribe { channel, reason } => {
                assert_eq!(channel, "php-chat");
                assert_eq!(reason, "timed out");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(source.next_payload(Duration::from_millis(10)).await.is_err());
    }
}
