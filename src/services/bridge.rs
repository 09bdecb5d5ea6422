//! Feeds Notification events back into an engine as triggers.

use crate::engine::ActiveStateMachine;
use crate::events::{Event, EventKind, SubscriptionId};
use std::sync::{Arc, Weak};

/// Turns every Notification event into a trigger named after the event.
///
/// Holds the engine weakly, so subscribing it to the engine's own channel
/// does not keep the engine alive.
pub struct NotificationBridge {
    engine: Weak<ActiveStateMachine>,
}

impl NotificationBridge {
    pub fn new(engine: &Arc<ActiveStateMachine>) -> Self {
        Self {
            engine: Arc::downgrade(engine),
        }
    }

    /// Subscribe a bridge to the engine's own event channel.
    pub fn attach(engine: &Arc<ActiveStateMachine>) -> SubscriptionId {
        let bridge = Self::new(engine);
        engine.subscribe(move |event: &Event| {
            bridge.handle(event);
        })
    }

    /// Returns `true` if the event was queued as a trigger.
    pub fn handle(&self, event: &Event) -> bool {
        if event.kind() != EventKind::Notification {
            return false;
        }
        let Some(engine) = self.engine.upgrade() else {
            tracing::debug!(notification = %event.name(), "Engine gone; notification dropped");
            return false;
        };
        match engine.enter_trigger(event.name()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    engine = %engine.id(),
                    notification = %event.name(),
                    error = %e,
                    "Notification not queued"
                );
                false
            }
        }
    }
}
