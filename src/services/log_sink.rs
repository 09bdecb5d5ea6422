//! Event journal backed by `tracing`.

use crate::events::{Event, EventChannel, EventKind, SubscriptionId};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of events kept in memory.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1024;

/// Logs every event it receives and keeps the most recent ones.
///
/// System events are logged at `debug`, commands and notifications at
/// `info`. The journal drops the oldest entry once `capacity` is reached;
/// a capacity of zero keeps nothing.
pub struct LogSink {
    journal: RwLock<VecDeque<Event>>,
    capacity: usize,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            journal: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_JOURNAL_CAPACITY))),
            capacity,
        }
    }

    pub fn handle(&self, event: &Event) {
        match event.kind() {
            EventKind::System => tracing::debug!(
                event = %event.name(),
                source = %event.source(),
                info = %event.info(),
                "System event"
            ),
            EventKind::Command => tracing::info!(
                event = %event.name(),
                source = %event.source(),
                target = %event.target(),
                info = %event.info(),
                "Command event"
            ),
            EventKind::Notification => tracing::info!(
                event = %event.name(),
                source = %event.source(),
                target = %event.target(),
                info = %event.info(),
                "Notification event"
            ),
        }

        if self.capacity == 0 {
            return;
        }
        let mut journal = self.journal.write();
        if journal.len() == self.capacity {
            journal.pop_front();
        }
        journal.push_back(event.clone());
    }

    /// Journaled events, oldest first.
    pub fn entries(&self) -> Vec<Event> {
        self.journal.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.journal.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.journal.read().is_empty()
    }

    pub fn clear(&self) {
        self.journal.write().clear();
    }

    /// The journal as newline-delimited JSON.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let journal = self.journal.read();
        let mut out = String::new();
        for event in journal.iter() {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn attach(self: Arc<Self>, channel: &EventChannel) -> SubscriptionId {
        channel.subscribe(move |event: &Event| self.handle(event))
    }
}
