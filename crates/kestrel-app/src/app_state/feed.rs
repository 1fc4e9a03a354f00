//! Feed handlers. They run on the listener task and only post work to the
//! surface; nothing here touches views directly.

use kestrel_common::ChatId;
use kestrel_feed::HandlerFault;
use kestrel_ui::UiDispatcher;
use serde_json::{Map, Value};
use tracing::warn;

use super::core::ChatShell;

type FeedHandler = Box<dyn Fn(&Map<String, Value>) -> Result<(), HandlerFault> + Send + Sync>;

fn surface_gone() -> HandlerFault {
    HandlerFault::failed("interactive surface is gone")
}

/// `chat_created`: reload the chat lists.
pub(super) fn on_chat_created(ui: UiDispatcher<ChatShell>) -> FeedHandler {
    Box::new(move |_data: &Map<String, Value>| {
        if ui.post(ChatShell::reload_chats) {
            Ok(())
        } else {
            Err(surface_gone())
        }
    })
}

/// `message_sent`: reload the view for `chatId` if one is open.
pub(super) fn on_message_sent(ui: UiDispatcher<ChatShell>) -> FeedHandler {
    Box::new(move |data: &Map<String, Value>| {
        let chat_id = match ChatId::from_field(data, "chatId") {
            Ok(chat_id) => chat_id,
            Err(e) => {
                warn!(error = %e, "Dropping message_sent event");
                return Ok(());
            }
        };
        if ui.post(move |shell| shell.refresh_view(chat_id)) {
            Ok(())
        } else {
            Err(surface_gone())
        }
    })
}
