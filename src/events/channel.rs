//! Synchronous multi-subscriber event channel.

use super::event::Event;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked for every emitted event.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Delivers events to subscribers synchronously, in registration order.
///
/// Events are neither buffered nor replayed: a subscriber sees only what is
/// emitted while it is registered. Handlers run on the emitting thread and
/// outside the channel's lock, so a handler may subscribe or unsubscribe.
///
/// # Example
///
/// ```rust
/// use active_fsm::events::{Event, EventChannel};
/// use std::sync::{Arc, Mutex};
///
/// let channel = EventChannel::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// channel.subscribe(move |e: &Event| sink.lock().unwrap().push(e.name().to_string()));
///
/// channel.emit(Event::system("hello", "", "doc"));
/// assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
/// ```
#[derive(Default)]
pub struct EventChannel {
    subscribers: RwLock<Vec<(SubscriptionId, EventHandler)>>,
    next_id: AtomicU64,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver `event` to every current subscriber.
    pub fn emit(&self, event: Event) {
        let handlers: Vec<EventHandler> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::trace!(
            event = %event.name(),
            kind = %event.kind(),
            subscribers = handlers.len(),
            "Emitting event"
        );

        for handler in handlers {
            handler(&event);
        }
    }
}
