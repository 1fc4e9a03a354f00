use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ListenerState;

/// Control handle for a started listener.
#[derive(Debug)]
pub struct ListenerHandle {
    token: CancellationToken,
    state_rx: watch::Receiver<ListenerState>,
    join: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub(super) fn new(
        token: CancellationToken,
        state_rx: watch::Receiver<ListenerState>,
        join: JoinHandle<()>,
    ) -> Self {
        Self {
            token,
            state_rx,
            join: Some(join),
        }
    }

    /// Request a cooperative stop. Calling this more than once is a no-op.
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            debug!("Stop requested for feed listener");
            self.token.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_stopping(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn state(&self) -> ListenerState {
        *self.state_rx.borrow()
    }

    /// Wait up to `grace` for the listener to reach `Closed`.
    ///
    /// Returns `false` on timeout; the loop is left running detached.
    pub async fn wait_closed(&mut self, grace: Duration) -> bool {
        let closed = tokio::time::timeout(
            grace,
            self.state_rx
                .wait_for(|state| *state == ListenerState::Closed),
        )
        .await
        .map(|reached| reached.is_ok());

        match closed {
            Ok(true) => {
                if let Some(join) = self.join.take() {
                    if let Err(e) = join.await {
                        warn!(error = %e, "Feed listener task ended abnormally");
                    }
                }
                true
            }
            // Sender dropped without reaching Closed: the task is gone.
            Ok(false) => self.state() == ListenerState::Closed,
            Err(_elapsed) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Feed listener did not close within grace period"
                );
                false
            }
        }
    }
}
