//! The polling loop itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ListenerSettings, ListenerState};
use crate::envelope::decode;
use crate::handlers::HandlerRegistry;
use crate::source::FeedSource;

pub(super) async fn run_loop<S: FeedSource>(
    mut source: S,
    handlers: Arc<HandlerRegistry>,
    settings: ListenerSettings,
    state: Arc<watch::Sender<ListenerState>>,
    token: CancellationToken,
) {
    let mut reconnect_delay = settings.reconnect_delay;

    while !token.is_cancelled() {
        match source.next_payload(settings.poll_timeout).await {
            Ok(None) => continue,
            Ok(Some(raw)) => handle_payload(&handlers, &raw),
            Err(e) => {
                warn!(error = %e, "Feed connection lost");
                if !resubscribe(&mut source, &settings, &token, &mut reconnect_delay).await {
                    break;
                }
            }
        }
    }

    state.send_replace(ListenerState::Draining);
    debug!(channel = %settings.channel, "Draining feed listener");
    if let Err(e) = source.unsubscribe().await {
        warn!(error = %e, "Feed unsubscribe failed");
    }
    state.send_replace(ListenerState::Closed);
    info!(channel = %settings.channel, "Feed listener closed");
}

fn handle_payload(handlers: &HandlerRegistry, raw: &[u8]) {
    match decode(raw) {
        Ok(event) => {
            debug!(kind = %event.kind, "Feed event received");
            handlers.dispatch(&event);
        }
        Err(e) => {
            warn!(error = %e, bytes = raw.len(), "Dropping undecodable feed payload");
        }
    }
}

/// Re-subscribe with exponential backoff. Returns `false` if a stop was
/// requested before the subscription came back.
async fn resubscribe<S: FeedSource>(
    source: &mut S,
    settings: &ListenerSettings,
    token: &CancellationToken,
    delay: &mut Duration,
) -> bool {
    loop {
        info!(delay_ms = delay.as_millis() as u64, "Re-subscribing to feed");
        tokio::select! {
            _ = token.cancelled() => return false,
            _ = tokio::time::sleep(*delay) => {}
        }

        let subscribed = tokio::select! {
            _ = token.cancelled() => return false,
            result = source.subscribe(&settings.channel) => result,
        };

        match subscribed {
            Ok(()) => {
                info!(channel = %settings.channel, "Feed subscription restored");
                *delay = settings.reconnect_delay;
                return true;
            }
            Err(e) => {
                warn!(error = %e, "Feed re-subscription failed");
                *delay = (*delay * 2).min(settings.max_reconnect_delay);
            }
        }
    }
}
