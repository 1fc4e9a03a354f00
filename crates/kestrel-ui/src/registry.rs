//! At-most-one live view per chat.
//!
//! Registration (`open_or_focus`) and deregistration (`close_notify`) are the
//! only mutation points. The registry is owned by the interactive surface and
//! is neither `Sync` nor shared; background work reaches it only through the
//! dispatch bridge.

use std::collections::HashMap;

use kestrel_common::ChatId;
use tracing::debug;

/// Behaviour the registry needs from a view.
pub trait View {
    /// Make a freshly created view visible.
    fn show(&mut self) {}

    /// Bring an already-open view to the front.
    fn focus(&mut self);

    /// Release UI resources. Called by [`ViewRegistry::close_all`].
    fn close(&mut self) {}
}

pub struct ViewRegistry<V> {
    views: HashMap<ChatId, V>,
}

impl<V> Default for ViewRegistry<V> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
        }
    }
}

impl<V: View> ViewRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus the view for `chat_id`, or build one with `factory` if none is
    /// open. The factory is never called when a view already exists.
    pub fn open_or_focus<F>(&mut self, chat_id: ChatId, factory: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        use std::collections::hash_map::Entry;

        match self.views.entry(chat_id) {
            Entry::Occupied(entry) => {
                debug!(chat_id = %chat_id, "Focusing open view");
                let view = entry.into_mut();
                view.focus();
                view
            }
            Entry::Vacant(entry) => {
                debug!(chat_id = %chat_id, "Opening new view");
                let view = entry.insert(factory());
                view.show();
                view
            }
        }
    }

    /// Teardown notification from a view that has been destroyed. Absent ids
    /// are ignored.
    pub fn close_notify(&mut self, chat_id: ChatId) -> Option<V> {
        let removed = self.views.remove(&chat_id);
        if removed.is_some() {
            debug!(chat_id = %chat_id, "View deregistered");
        }
        removed
    }

    /// Run `updater` against the open view for `chat_id`. Returns `false`
    /// and drops the update when no such view is open.
    pub fn refresh<F>(&mut self, chat_id: ChatId, updater: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        match self.views.get_mut(&chat_id) {
            Some(view) => {
                updater(view);
                true
            }
            None => {
                debug!(chat_id = %chat_id, "No open view to refresh");
                false
            }
        }
    }

    pub fn get(&self, chat_id: ChatId) -> Option<&V> {
        self.views.get(&chat_id)
    }

    pub fn get_mut(&mut self, chat_id: ChatId) -> Option<&mut V> {
        self.views.get_mut(&chat_id)
    }

    pub fn contains(&self, chat_id: ChatId) -> bool {
        self.views.contains_key(&chat_id)
    }

    /// Open chat ids, sorted.
    pub fn ids(&self) -> Vec<ChatId> {
        let mut ids: Vec<ChatId> = self.views.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Close and deregister every view, returning them in id order. Used
    /// during shutdown.
    pub fn close_all(&mut self) -> Vec<V> {
        let mut closed = Vec::with_capacity(self.views.len());
        for chat_id in self.ids() {
            if let Some(mut view) = self.close_notify(chat_id) {
                view.close();
                closed.push(view);
            }
        }
        closed
    }
}

impl<V> std::fmt::Debug for ViewRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("open", &self.views.len())
            .finish()
    }
}
