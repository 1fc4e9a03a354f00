//! Cross-thread dispatch onto the interactive surface.
//!
//! Any thread may [`post`](UiDispatcher::post) a closure; the surface runs
//! them in FIFO order from its own loop via [`UiQueue::drain`] or
//! [`UiQueue::pump`]. Posting never blocks.

use std::sync::mpsc;
use std::time::Duration;

use tracing::debug;

type Task<C> = Box<dyn FnOnce(&mut C) + Send>;

/// Every [`UiDispatcher`] was dropped; nothing more can arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("all UI dispatchers have been dropped")]
pub struct BridgeClosed;

/// Create a connected dispatcher/queue pair for surface type `C`.
pub fn bridge<C>() -> (UiDispatcher<C>, UiQueue<C>) {
    let (tx, rx) = mpsc::channel();
    (UiDispatcher { tx }, UiQueue { rx })
}

/// Posting half. Cheap to clone and `Send`.
pub struct UiDispatcher<C> {
    tx: mpsc::Sender<Task<C>>,
}

impl<C> Clone for UiDispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> UiDispatcher<C> {
    /// Schedule `task` on the surface. Returns `false` if the surface is gone,
    /// in which case the task is dropped.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        if self.tx.send(Box::new(task)).is_err() {
            debug!("UI surface gone, dropping posted task");
            return false;
        }
        true
    }
}

impl<C> std::fmt::Debug for UiDispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDispatcher").finish_non_exhaustive()
    }
}

/// Receiving half, owned by the surface's run loop.
pub struct UiQueue<C> {
    rx: mpsc::Receiver<Task<C>>,
}

impl<C> UiQueue<C> {
    /// Run every task queued right now, in order. Returns how many ran.
    pub fn drain(&self, surface: &mut C) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(surface);
            ran += 1;
        }
        ran
    }

    /// Block up to `timeout` for the first task, then drain the rest.
    pub fn pump(&self, surface: &mut C, timeout: Duration) -> Result<usize, BridgeClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task(surface);
                Ok(1 + self.drain(surface))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(0),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(BridgeClosed),
        }
    }
}

impl<C> std::fmt::Debug for UiQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiQueue").finish_non_exhaustive()
    }
}
