//! The interactive surface: chat lists, open views, and command handling.
//!
//! Everything here runs on the main thread. API calls block on the session
//! runtime; feed events arrive as closures posted through the bridge.

use std::sync::Arc;

use kestrel_api::ChatApi;
use kestrel_common::{Chat, ChatId};
use kestrel_ui::{View, ViewRegistry};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::commands::{self, Command, HELP};
use super::views::ChatView;

pub struct ChatShell {
    pub(super) username: String,
    pub(super) api: Arc<dyn ChatApi>,
    pub(super) rt: Handle,
    pub(super) views: ViewRegistry<ChatView>,
    pub(super) joined: Vec<Chat>,
    pub(super) available: Vec<Chat>,
    pub(super) focused: Option<ChatId>,
    /// Whether feed events will refresh state after our own mutations.
    pub(super) live: bool,
    pub(super) chat_list_reloads: usize,
    pub(super) output: Vec<String>,
    pub(super) should_exit: bool,
}

impl ChatShell {
    pub fn new(username: &str, api: Arc<dyn ChatApi>, rt: Handle, live: bool) -> Self {
        Self {
            username: username.to_string(),
            api,
            rt,
            views: ViewRegistry::new(),
            joined: Vec::new(),
            available: Vec::new(),
            focused: None,
            live,
            chat_list_reloads: 0,
            output: Vec::new(),
            should_exit: false,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }

    pub(super) fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Transcript lines produced since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn flush_view(&mut self, chat_id: ChatId) {
        if let Some(view) = self.views.get_mut(chat_id) {
            let lines = view.take_outbox();
            self.output.extend(lines);
        }
    }

    // -------------------------------------------------------------------------
    // Session state
    // -------------------------------------------------------------------------

    /// Register the current user with the backend. Failure is logged; the
    /// user usually exists already.
    pub fn init_user(&mut self) {
        match self.rt.block_on(self.api.create_user(&self.username)) {
            Ok(()) => info!(user = %self.username, "User registered"),
            Err(e) => warn!(user = %self.username, error = %e, "User registration failed"),
        }
    }

    /// Fetch both chat lists and print them.
    pub fn reload_chats(&mut self) {
        self.chat_list_reloads += 1;

        match self.rt.block_on(self.api.list_joined_chats(&self.username)) {
            Ok(chats) => self.joined = chats,
            Err(e) => warn!(error = %e, "Failed to load joined chats"),
        }
        match self.rt.block_on(self.api.list_available_chats(&self.username)) {
            Ok(chats) => self.available = chats,
            Err(e) => warn!(error = %e, "Failed to load available chats"),
        }

        let mut lines = vec!["joined chats:".to_string()];
        lines.extend(chat_lines(&self.joined));
        lines.push("available chats:".to_string());
        lines.extend(chat_lines(&self.available));
        self.output.extend(lines);
    }

    /// Reload the open view for `chat_id`. No-op if the user has not opened
    /// it.
    pub fn refresh_view(&mut self, chat_id: ChatId) {
        if !self.views.contains(chat_id) {
            debug!(chat_id = %chat_id, "Ignoring refresh for unopened chat");
            return;
        }
        let messages = match self.rt.block_on(self.api.list_messages(chat_id)) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to reload messages");
                return;
            }
        };
        self.views.refresh(chat_id, |view| view.reload(messages));
        self.flush_view(chat_id);
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Handle one line of user input.
    pub fn handle_line(&mut self, line: &str) {
        match commands::parse(line) {
            None => {}
            Some(Ok(command)) => self.execute(command),
            Some(Err(e)) => self.emit(e.to_string()),
        }
    }

    pub(super) fn execute(&mut self, command: Command) {
        match command {
            Command::List => self.reload_chats(),
            Command::Create(name) => self.create_chat(&name),
            Command::Join(chat_id) => self.join_chat(chat_id),
            Command::Open(chat_id) => self.open_chat(chat_id),
            Command::Close(chat_id) => self.close_chat(chat_id),
            Command::Send(chat_id, text) => self.send_message(chat_id, &text),
            Command::Say(text) => match self.focused {
                Some(chat_id) => self.send_message(chat_id, &text),
                None => self.emit("no chat focused, use /open <id> first"),
            },
            Command::Focus => self.list_open(),
            Command::Help => self.emit(HELP),
            Command::Quit => self.request_exit(),
        }
    }

    fn create_chat(&mut self, name: &str) {
        match self.rt.block_on(self.api.create_chat(&self.username, name)) {
            Ok(()) => {
                self.emit(format!("created chat '{name}'"));
                if !self.live {
                    self.reload_chats();
                }
            }
            Err(e) => {
                warn!(error = %e, "Chat creation failed");
                self.emit(format!("could not create chat: {e}"));
            }
        }
    }

    fn join_chat(&mut self, chat_id: ChatId) {
        match self.rt.block_on(self.api.join_chat(&self.username, chat_id)) {
            Ok(()) => {
                self.emit(format!("joined chat #{chat_id}"));
                if !self.live {
                    self.reload_chats();
                }
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Join failed");
                self.emit(format!("could not join chat #{chat_id}: {e}"));
            }
        }
    }

    fn open_chat(&mut self, chat_id: ChatId) {
        let Some(name) = self
            .joined
            .iter()
            .find(|c| c.id == chat_id)
            .map(|c| c.name.clone())
        else {
            self.emit(format!("chat #{chat_id} is not one of your chats, /join it first"));
            return;
        };

        let api = &self.api;
        let rt = &self.rt;
        self.views.open_or_focus(chat_id, || {
            let messages = rt.block_on(api.list_messages(chat_id)).unwrap_or_else(|e| {
                warn!(chat_id = %chat_id, error = %e, "Failed to load messages");
                Vec::new()
            });
            ChatView::new(chat_id, name, messages)
        });
        self.focused = Some(chat_id);
        self.flush_view(chat_id);
    }

    /// The user closed a view: tear it down and deregister it.
    fn close_chat(&mut self, chat_id: ChatId) {
        match self.views.close_notify(chat_id) {
            Some(mut view) => {
                view.close();
                self.output.extend(view.take_outbox());
                if self.focused == Some(chat_id) {
                    self.focused = None;
                }
            }
            None => self.emit(format!("chat #{chat_id} is not open")),
        }
    }

    fn send_message(&mut self, chat_id: ChatId, text: &str) {
        match self
            .rt
            .block_on(self.api.send_message(chat_id, &self.username, text))
        {
            Ok(()) => self.refresh_view(chat_id),
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Send failed");
                self.emit(format!("could not send to chat #{chat_id}: {e}"));
            }
        }
    }

    fn list_open(&mut self) {
        let ids = self.views.ids();
        if ids.is_empty() {
            self.emit("no open chats");
            return;
        }
        let lines: Vec<String> = ids
            .into_iter()
            .filter_map(|id| self.views.get(id))
            .map(|view| {
                let marker = if self.focused == Some(view.chat_id()) { "*" } else { " " };
                format!("{marker} {} (#{})", view.name(), view.chat_id())
            })
            .collect();
        self.output.extend(lines);
    }

    /// Close every open view. Used during shutdown.
    pub(super) fn close_all_views(&mut self) -> usize {
        let mut closed = self.views.close_all();
        for view in closed.iter_mut() {
            self.output.extend(view.take_outbox());
        }
        self.focused = None;
        closed.len()
    }
}

fn chat_lines(chats: &[Chat]) -> Vec<String> {
    if chats.is_empty() {
        return vec!["  (none)".to_string()];
    }
    chats.iter().map(|c| format!("  {c}")).collect()
}
