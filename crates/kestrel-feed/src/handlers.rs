//! Event-kind to callback routing.
//!
//! The registry is filled before the listener starts and is only read
//! afterwards, so it lives behind a plain `Arc` with no lock.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::envelope::Event;
use crate::error::HandlerFault;

/// Callback invoked with the decoded event data.
pub type Handler = Box<dyn Fn(&Map<String, Value>) -> Result<(), HandlerFault> + Send + Sync>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous entry.
    pub fn register<F>(&mut self, kind: impl Into<String>, handler: F)
    where
        F: Fn(&Map<String, Value>) -> Result<(), HandlerFault> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.handlers.insert(kind.clone(), Box::new(handler)).is_some() {
            debug!(kind = %kind, "Replaced existing handler");
        }
    }

    /// Route `event` to its handler.
    ///
    /// Returns `false` when no handler is registered for the kind. A failing
    /// or panicking handler is logged and still counts as handled.
    pub fn dispatch(&self, event: &Event) -> bool {
        let Some(handler) = self.handlers.get(&event.kind) else {
            debug!(kind = %event.kind, "No handler for event kind, dropping");
            return false;
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| handler(&event.data)))
            .unwrap_or_else(|payload| Err(HandlerFault::Panicked(panic_message(&*payload))));

        if let Err(fault) = outcome {
            warn!(kind = %event.kind, error = %fault, "Event handler fault");
        }
        true
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
