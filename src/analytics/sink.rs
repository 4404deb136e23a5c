//! Swappable destination for analytics events.
//!
//! The sink holds exactly one handler. `log_event` copies the current handler
//! reference under the lock and invokes it after the lock is released, so a
//! slow handler never blocks `configure`, and a handler may itself call back
//! into the sink without deadlocking.
//!
//! A `configure` that races with an in-flight `log_event` may let that call
//! finish on the previous handler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Event attributes. Keys are unique; order carries no meaning.
pub type Attributes = HashMap<String, String>;

/// A named analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub attributes: Attributes,
}

impl Event {
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Receives events dispatched through an [`EventSink`].
///
/// Any `Fn(&str, &Attributes) + Send + Sync` closure is a handler. Panics raised
/// by a handler unwind into the caller of [`EventSink::log_event`]; wrap the
/// handler yourself if you need isolation.
pub trait EventHandler: Send + Sync {
    fn handle(&self, name: &str, attributes: &Attributes);
}

impl<F> EventHandler for F
where
    F: Fn(&str, &Attributes) + Send + Sync,
{
    fn handle(&self, name: &str, attributes: &Attributes) {
        self(name, attributes)
    }
}

/// Handler installed by [`EventSink::new`] and [`EventSink::reset`].
///
/// Debug builds emit a `tracing` debug record; release builds discard the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl EventHandler for DefaultHandler {
    fn handle(&self, name: &str, attributes: &Attributes) {
        if cfg!(debug_assertions) {
            tracing::debug!(target: "betakit::events", event = name, ?attributes, "[BetaKit] event");
        }
    }
}

/// Process-wide event destination with a single replaceable handler.
pub struct EventSink {
    handler: Mutex<Arc<dyn EventHandler>>,
}

impl EventSink {
    /// Create a sink using the [`DefaultHandler`].
    pub fn new() -> Self {
        Self::with_handler(DefaultHandler)
    }

    /// Create a sink with an initial handler.
    pub fn with_handler(handler: impl EventHandler + 'static) -> Self {
        Self {
            handler: Mutex::new(Arc::new(handler)),
        }
    }

    /// Replace the current handler.
    pub fn configure(&self, handler: impl EventHandler + 'static) {
        self.configure_shared(Arc::new(handler));
    }

    /// Replace the current handler with an already shared one.
    ///
    /// The previous handler is dropped after the lock is released, so its
    /// destructor may log through or reconfigure this sink.
    pub fn configure_shared(&self, handler: Arc<dyn EventHandler>) {
        let previous = std::mem::replace(&mut *self.slot(), handler);
        drop(previous);
    }

    /// Restore the [`DefaultHandler`].
    pub fn reset(&self) {
        self.configure(DefaultHandler);
    }

    /// Dispatch an event to the current handler.
    pub fn log_event(&self, name: &str, attributes: Attributes) {
        let handler = self.current_handler();
        handler.handle(name, &attributes);
    }

    /// Dispatch an already built event.
    pub fn log(&self, event: &Event) {
        let handler = self.current_handler();
        handler.handle(&event.name, &event.attributes);
    }

    /// Snapshot of the handler currently installed.
    pub fn current_handler(&self) -> Arc<dyn EventHandler> {
        Arc::clone(&self.slot())
    }

    // The lock is only ever held to read or replace the Arc, so a poisoned
    // slot still holds a complete handler.
    fn slot(&self) -> std::sync::MutexGuard<'_, Arc<dyn EventHandler>> {
        self.handler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Thread-safe shared event sink.
pub type SharedEventSink = Arc<EventSink>;

/// Create a new shared event sink with the default handler.
pub fn create_shared_sink() -> SharedEventSink {
    Arc::new(EventSink::new())
}

/// Build an attribute map from string pairs.
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
