//! Startup sequencing.

use std::sync::Arc;

use kestrel_api::ChatApi;
use kestrel_common::KestrelError;
use kestrel_config::KestrelConfig;
use kestrel_feed::FeedSource;
use kestrel_ui::{bridge, UiDispatcher, UiQueue};
use tracing::info;

use super::core::ChatShell;
use super::feed::{on_chat_created, on_message_sent};
use super::session::{Session, SessionBuilder};
use super::types::{CHAT_CREATED, MESSAGE_SENT};

pub struct ChatApp {
    pub(super) shell: ChatShell,
    pub(super) queue: UiQueue<ChatShell>,
    pub(super) dispatcher: UiDispatcher<ChatShell>,
    pub(super) session: Session,
}

impl ChatApp {
    /// Start a session for `username` with live updates from `source`.
    ///
    /// Order: register feed handlers, start the listener on its own runtime,
    /// register the user, then load the chat lists.
    pub fn launch<S: FeedSource>(
        config: &KestrelConfig,
        username: &str,
        api: Arc<dyn ChatApi>,
        source: S,
    ) -> Result<Self, KestrelError> {
        Self::assemble(config, username, api, |builder| builder.start(source))
    }

    /// Start a session with no feed. Views refresh only on user actions.
    pub fn launch_offline(
        config: &KestrelConfig,
        username: &str,
        api: Arc<dyn ChatApi>,
    ) -> Result<Self, KestrelError> {
        Self::assemble(config, username, api, SessionBuilder::start_detached)
    }

    fn assemble<F>(
        config: &KestrelConfig,
        username: &str,
        api: Arc<dyn ChatApi>,
        start: F,
    ) -> Result<Self, KestrelError>
    where
        F: FnOnce(SessionBuilder) -> Result<Session, KestrelError>,
    {
        let (dispatcher, queue) = bridge::<ChatShell>();

        let mut builder = SessionBuilder::from_config(&config.feed, &config.session);
        builder
            .register_handler(CHAT_CREATED, on_chat_created(dispatcher.clone()))
            .register_handler(MESSAGE_SENT, on_message_sent(dispatcher.clone()));
        let session = start(builder)?;

        let rt = session
            .handle()
            .ok_or_else(|| KestrelError::Other("session runtime is not running".into()))?;
        let mut shell = ChatShell::new(username, api, rt, session.is_live());

        shell.init_user();
        shell.reload_chats();

        info!(session = %session.id(), user = %username, live = session.is_live(), "Session ready");

        Ok(Self {
            shell,
            queue,
            dispatcher,
            session,
        })
    }

    /// A dispatcher for posting work (such as input lines) onto the surface.
    pub fn dispatcher(&self) -> UiDispatcher<ChatShell> {
        self.dispatcher.clone()
    }

    pub fn session_id(&self) -> &kestrel_common::SessionId {
        self.session.id()
    }

    pub fn is_live(&self) -> bool {
        self.session.is_live()
    }
}
