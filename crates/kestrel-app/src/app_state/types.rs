//! Internal constants for the app state module.

use std::time::Duration;

/// How long the surface waits for posted work before re-checking for exit.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Feed event: a chat was created or joined.
pub(super) const CHAT_CREATED: &str = "chat_created";

/// Feed event: a message was posted. Carries `chatId`.
pub(super) const MESSAGE_SENT: &str = "message_sent";
