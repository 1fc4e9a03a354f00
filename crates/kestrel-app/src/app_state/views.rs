//! Console rendition of one chat's message history.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use kestrel_common::{ChatId, Message};
use kestrel_ui::View;

/// Format one message as `sender on HH:MM: content`.
pub(super) fn message_line<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = tz
        .timestamp_opt(message.sent_at, 0)
        .single()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".to_string());
    format!("{} on {}: {}", message.sent_by, time, message.content)
}

/// An open chat. Output is buffered in an outbox that the shell flushes to
/// the transcript.
#[derive(Debug)]
pub struct ChatView {
    chat_id: ChatId,
    name: String,
    messages: Vec<Message>,
    /// Number of messages already written to the outbox.
    rendered: usize,
    reloads: usize,
    outbox: Vec<String>,
}

impl ChatView {
    pub fn new(chat_id: ChatId, name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            chat_id,
            name: name.into(),
            messages,
            rendered: 0,
            reloads: 0,
            outbox: Vec::new(),
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn reloads(&self) -> usize {
        self.reloads
    }

    fn prefix(&self) -> String {
        format!("[{} #{}]", self.name, self.chat_id)
    }

    /// Replace the history and queue any messages not yet shown.
    ///
    /// If the new history is shorter than what was already shown, the whole
    /// history is shown again.
    pub fn reload(&mut self, messages: Vec<Message>) {
        self.reloads += 1;
        if messages.len() < self.rendered {
            self.rendered = 0;
        }
        self.messages = messages;
        self.render_pending();
    }

    fn render_pending(&mut self) {
        let prefix = self.prefix();
        for message in &self.messages[self.rendered..] {
            self.outbox
                .push(format!("{prefix} {}", message_line(message, &Local)));
        }
        self.rendered = self.messages.len();
    }

    pub fn take_outbox(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }
}

impl View for ChatView {
    fn show(&mut self) {
        self.outbox
            .push(format!("--- {} (#{}) ---", self.name, self.chat_id));
        self.render_pending();
    }

    fn focus(&mut self) {
        self.outbox.push(format!("{} focused", self.prefix()));
    }

    fn close(&mut self) {
        self.outbox.push(format!("{} closed", self.prefix()));
    }
}
