//! Graceful shutdown: stop the feed, close views, stop the runtime.

use tracing::info;

use super::init::ChatApp;

impl ChatApp {
    /// Tear the session down. Safe to call more than once.
    ///
    /// Order matters:
    /// 1. Stop the listener and wait up to the grace period for it to close
    /// 2. Close every open view
    /// 3. Shut down the background runtime
    ///
    /// Teardown continues even if the listener fails to close in time.
    pub fn shutdown(&mut self) {
        info!(session = %self.session.id(), "Initiating graceful shutdown");

        let closed = self.session.stop_listener();
        let views = self.shell.close_all_views();
        self.session.shutdown_runtime();

        info!(listener_closed = closed, views_closed = views, "Graceful shutdown complete");
    }
}
