//! Shared helpers for integration tests.

#![allow(dead_code)]

use active_fsm::events::{Event, EventChannel};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Records every event on a channel and lets tests wait for milestones.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
    changed: Condvar,
}

impl EventLog {
    pub fn attach(channel: &EventChannel) -> Arc<Self> {
        let recorded = Arc::new(Self::default());
        let sink = Arc::clone(&recorded);
        channel.subscribe(move |e: &Event| {
            sink.events.lock().push(e.clone());
            sink.changed.notify_all();
        });
        recorded
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    /// Info strings of every event called `name`, oldest first.
    pub fn infos(&self, name: &str) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name() == name)
            .map(|e| e.info().to_string())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name().to_string()).collect()
    }

    /// Wait until at least `count` events called `name` were seen.
    pub fn wait_for(&self, name: &str, count: usize) -> bool {
        let deadline = Instant::now() + TIMEOUT;
        let mut events = self.events.lock();
        loop {
            if events.iter().filter(|e| e.name() == name).count() >= count {
                return true;
            }
            if self.changed.wait_until(&mut events, deadline).timed_out() {
                return events.iter().filter(|e| e.name() == name).count() >= count;
            }
        }
    }
}
