//! Background feed listener.
//!
//! Lifecycle: `Stopped → Subscribing → Running → Draining → Closed`. The
//! listener owns its state; callers only request `start` and `stop`.

mod handle;
mod run;


pub use handle::ListenerHandle;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

use crate::error::FeedError;
use crate::handlers::HandlerRegistry;
use crate::source::FeedSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Stopped,
    Subscribing,
    Running,
    Draining,
    Closed,
}

/// Timing and channel settings for a [`FeedListener`].
#[derive(Debug, Clone)]
pub struct ListenerSettings {
    pub channel: String,
    /// Bounded wait for each poll. Also the worst-case delay before a stop
    /// request is observed.
    pub poll_timeout: Duration,
    /// Base delay before re-subscribing after a transport error.
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            channel: "php-chat".to_string(),
            poll_timeout: Duration::from_secs(1),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

pub struct FeedListener<S: FeedSource> {
    source: Option<S>,
    handlers: Arc<HandlerRegistry>,
    settings: ListenerSettings,
    state: Arc<watch::Sender<ListenerState>>,
}

impl<S: FeedSource> FeedListener<S> {
    pub fn new(source: S, handlers: HandlerRegistry, settings: ListenerSettings) -> Self {
        let (state, _) = watch::channel(ListenerState::Stopped);
        Self {
            source: Some(source),
            handlers: Arc::new(handlers),
            settings,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> ListenerState {
        *self.state.borrow()
    }

    /// Subscribe and spawn the polling loop on the current tokio runtime.
    ///
    /// A subscription failure leaves the listener `Closed` and is not
    /// retried here. Only a `Stopped` listener can be started.
    pub async fn start(&mut self) -> Result<ListenerHandle, FeedError> {
        let current = self.state();
        let mut source = match (current, self.source.take()) {
            (ListenerState::Stopped, Some(source)) => source,
            (_, source) => {
                self.source = source;
                return Err(FeedError::InvalidState(current));
            }
        };

        self.state.send_replace(ListenerState::Subscribing);
        info!(channel = %self.settings.channel, "Starting feed listener");

        if let Err(e) = source.subscribe(&self.settings.channel).await {
            error!(channel = %self.settings.channel, error = %e, "Feed subscription failed");
            self.state.send_replace(ListenerState::Closed);
            return Err(e);
        }

        self.state.send_replace(ListenerState::Running);

        let token = CancellationToken::new();
        let run = run::run_loop(
            source,
            Arc::clone(&self.handlers),
            self.settings.clone(),
            Arc::clone(&self.state),
            token.clone(),
        );
        let join = tokio::spawn(run.instrument(tracing::Span::current()));

        Ok(ListenerHandle::new(token, self.state.subscribe(), join))
    }
}

impl<S: FeedSource> std::fmt::Debug for FeedListener<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedListener")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .field("handlers", &self.handlers)
            .finish()
    }
}
