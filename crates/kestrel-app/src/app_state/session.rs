//! Session controller: owns the background runtime and the feed listener,
//! and sequences their startup and shutdown.

use std::time::Duration;

use kestrel_common::{KestrelError, SessionId};
use kestrel_config::schema::{FeedConfig, SessionConfig};
use kestrel_feed::{
    FeedListener, FeedSource, HandlerFault, HandlerRegistry, ListenerHandle, ListenerSettings,
    ListenerState,
};
use serde_json::{Map, Value};
use tokio::runtime::{Handle, Runtime};
use tracing::{error, info, info_span, warn};

/// Collects handlers before the listener starts.
pub struct SessionBuilder {
    handlers: HandlerRegistry,
    settings: ListenerSettings,
    grace: Duration,
}

impl SessionBuilder {
    pub fn new(settings: ListenerSettings, grace: Duration) -> Self {
        Self {
            handlers: HandlerRegistry::new(),
            settings,
            grace,
        }
    }

    pub fn from_config(feed: &FeedConfig, session: &SessionConfig) -> Self {
        let settings = ListenerSettings {
            channel: feed.channel.clone(),
            poll_timeout: feed.poll_timeout(),
            reconnect_delay: feed.reconnect_delay(),
            max_reconnect_delay: feed.max_reconnect_delay(),
        };
        Self::new(settings, session.shutdown_grace())
    }

    /// Route feed events of `kind` to `handler`. A later registration for
    /// the same kind replaces the earlier one.
    pub fn register_handler<F>(&mut self, kind: &str, handler: F) -> &mut Self
    where
        F: Fn(&Map<String, Value>) -> Result<(), HandlerFault> + Send + Sync + 'static,
    {
        self.handlers.register(kind, handler);
        self
    }

    /// Build the background runtime and start the listener on it.
    ///
    /// A subscription failure is logged and the session continues without
    /// live updates. Only failing to build the runtime is an error.
    pub fn start<S: FeedSource>(self, source: S) -> Result<Session, KestrelError> {
        let id = SessionId::new();
        let runtime = build_runtime()?;
        let span = info_span!("session", id = %id);

        info!(parent: &span, kinds = ?self.handlers.kinds(), "Starting session");

        let mut listener = FeedListener::new(source, self.handlers, self.settings);
        let listener = match span.in_scope(|| runtime.block_on(listener.start())) {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(parent: &span, error = %e, "Live updates unavailable, continuing without feed");
                None
            }
        };

        Ok(Session {
            id,
            runtime: Some(runtime),
            listener,
            grace: self.grace,
        })
    }

    /// Build the runtime without a listener. Registered handlers are
    /// discarded.
    pub fn start_detached(self) -> Result<Session, KestrelError> {
        let id = SessionId::new();
        info!(session = %id, "Starting session without feed");
        Ok(Session {
            id,
            runtime: Some(build_runtime()?),
            listener: None,
            grace: self.grace,
        })
    }
}

fn build_runtime() -> std::io::Result<Runtime> {
    // The listener can hold one worker inside a slow handler; the second
    // keeps timers and API calls moving.
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("kestrel-feed")
        .enable_all()
        .build()
}

pub struct Session {
    id: SessionId,
    runtime: Option<Runtime>,
    listener: Option<ListenerHandle>,
    grace: Duration,
}

impl Session {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Handle to the background runtime, for running API calls from the
    /// interactive surface. `None` after shutdown.
    pub fn handle(&self) -> Option<Handle> {
        self.runtime.as_ref().map(|rt| rt.handle().clone())
    }

    /// Whether live updates are flowing.
    pub fn is_live(&self) -> bool {
        self.listener_state() == Some(ListenerState::Running)
    }

    pub fn listener_state(&self) -> Option<ListenerState> {
        self.listener.as_ref().map(ListenerHandle::state)
    }

    /// Ask the listener to stop and wait up to the grace period for it to
    /// close. Returns `true` if it closed (or there was none to stop).
    pub fn stop_listener(&mut self) -> bool {
        let Some(mut listener) = self.listener.take() else {
            return true;
        };
        listener.stop();

        let Some(rt) = &self.runtime else {
            return false;
        };
        let closed = rt.block_on(listener.wait_closed(self.grace));
        if !closed {
            warn!(session = %self.id, "Proceeding with shutdown while feed listener is still running");
        }
        closed
    }

    /// Shut the background runtime down, abandoning anything still running
    /// after a short timeout.
    pub fn shutdown_runtime(&mut self) {
        if let Some(rt) = self.runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }
    }

    /// Full teardown. Safe to call more than once.
    pub fn shutdown(&mut self) -> bool {
        let closed = self.stop_listener();
        self.shutdown_runtime();
        closed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.runtime.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_feed::ChannelSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    fn settings() -> ListenerSettings {
        ListenerSettings {
            poll_timeout: Duration::from_millis(50),
            ..ListenerSettings::default()
        }
    }

    #[test]
    fn from_config_maps_feed_settings() {
        let mut feed = FeedConfig::default();
        feed.channel = "alt".into();
        feed.poll_timeout_ms = 250;
        let builder = SessionBuilder::from_config(&feed, &SessionConfig::default());
        assert_eq!(builder.settings.channel, "alt");
        assert_eq!(builder.settings.poll_timeout, Duration::from_millis(250));
        assert_eq!(builder.grace, Duration::from_secs(2));
    }

    #[test]
    fn start_and_shutdown() {
        let mut session = SessionBuilder::new(settings(), Duration::from_secs(1))
            .start(ChannelSource::idle())
            .unwrap();
        assert!(session.is_live());
        assert!(session.handle().is_some());

        assert!(session.shutdown());
        assert!(session.listener_state().is_none());
        assert!(session.handle().is_none());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut session = SessionBuilder::new(settings(), Duration::from_secs(1))
            .start(ChannelSource::idle())
            .unwrap();
        assert!(session.shutdown());
        assert!(session.shutdown());
    }

    #[test]
    fn subscription_failure_degrades_instead_of_failing() {
        let source = ChannelSource::idle().refusing("connection refused");
        let mut session = SessionBuilder::new(settings(), Duration::from_secs(1))
            .start(source)
            .unwrap();
        assert!(!session.is_live());
        assert!(session.listener_state().is_none());
        assert!(session.handle().is_some());
        assert!(session.shutdown());
    }

    #[test]
    fn detached_session_has_runtime_but_no_listener() {
        let mut builder = SessionBuilder::new(settings(), Duration::from_secs(1));
        builder.register_handler("chat_created", |_| Ok(()));
        let mut session = builder.start_detached().unwrap();
        assert!(!session.is_live());
        assert!(session.handle().is_some());
        assert!(session.shutdown());
    }

    #[test]
    fn registered_handlers_receive_events() {
        let (source, publisher) = ChannelSource::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = Arc::clone(&hits);

        let mut builder = SessionBuilder::new(settings(), Duration::from_secs(1));
        builder.register_handler("chat_created", |_| Err(HandlerFault::failed("replaced")));
        builder.register_handler("chat_created", move |_| {
            hits_in.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let mut session = builder.start(source).unwrap();

        publisher.publish(r#"{"type":"chat_created"}"#);
        let deadline = Instant::now() + Duration::from_secs(2);
        while hits.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(session.shutdown());
    }

    #[test]
    fn stuck_handler_does_not_hang_shutdown() {
        let (source, publisher) = ChannelSource::new();
        let mut builder = SessionBuilder::new(settings(), Duration::from_millis(100));
        builder.register_handler("chat_created", |_| {
            std::thread::sleep(Duration::from_millis(1500));
            Ok(())
        });
        let mut session = builder.start(source).unwrap();
        publisher.publish(r#"{"type":"chat_created"}"#);
        std::thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        assert!(!session.shutdown());
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
