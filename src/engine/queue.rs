//! Bounded FIFO of triggers shared by producers and the worker.
//!
//! The pause gate lives under the same lock as the items so that a paused
//! worker can never dequeue, and so that cancellation, pause and new items
//! all wake the worker through one condition variable.
//!
//! A trigger the worker has taken keeps its slot until the worker either
//! commits it with [`TriggerQueue::release`] or puts it back with
//! [`TriggerQueue::requeue_front`]. The queue therefore never holds more
//! than `capacity` triggers, counting the one in flight.

use super::config::BackpressurePolicy;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Returned when a trigger could not be queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueueFull {
    pub trigger: String,
    pub capacity: usize,
}

struct QueueState {
    items: VecDeque<String>,
    paused: bool,
    /// The worker holds a popped trigger that still counts against capacity
    in_flight: bool,
}

impl QueueState {
    fn occupied(&self) -> usize {
        self.items.len() + usize::from(self.in_flight)
    }
}

pub(crate) struct TriggerQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    /// Signalled on new items, gate changes and cancellation
    ready: Condvar,
    /// Signalled when a slot frees up
    space: Condvar,
}

impl TriggerQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                paused: false,
                in_flight: false,
            }),
            capacity,
            ready: Condvar::new(),
            space: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.state.lock().items.iter().cloned().collect()
    }

    /// Append a trigger, applying `policy` if the queue is full.
    /// Returns the queue depth after the push.
    pub fn push(&self, trigger: String, policy: BackpressurePolicy) -> Result<usize, QueueFull> {
        let mut state = self.state.lock();

        if state.occupied() >= self.capacity {
            match policy {
                BackpressurePolicy::Reject => {
                    return Err(self.full(trigger));
                }
                BackpressurePolicy::Block => {
                    while state.occupied() >= self.capacity {
                        self.space.wait(&mut state);
                    }
                }
                BackpressurePolicy::BlockFor { timeout_ms } => {
                    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
                    while state.occupied() >= self.capacity {
                        if self.space.wait_until(&mut state, deadline).timed_out()
                            && state.occupied() >= self.capacity
                        {
                            return Err(self.full(trigger));
                        }
                    }
                }
            }
        }

        state.items.push_back(trigger);
        let depth = state.items.len();
        drop(state);
        self.ready.notify_all();
        Ok(depth)
    }

    fn full(&self, trigger: String) -> QueueFull {
        QueueFull {
            trigger,
            capacity: self.capacity,
        }
    }

    /// Block until a trigger can be taken while the gate is open.
    ///
    /// Returns `None` once `token` is cancelled; nothing is removed then.
    /// The returned trigger keeps its slot until [`release`](Self::release)
    /// or [`requeue_front`](Self::requeue_front).
    pub fn pop(&self, token: &CancellationToken) -> Option<String> {
        let mut state = self.state.lock();
        loop {
            if token.is_cancelled() {
                return None;
            }
            if !state.paused {
                if let Some(trigger) = state.items.pop_front() {
                    state.in_flight = true;
                    return Some(trigger);
                }
            }
            self.ready.wait(&mut state);
        }
    }

    /// Free the slot of the trigger taken by the last `pop`.
    pub fn release(&self) {
        let mut state = self.state.lock();
        if !state.in_flight {
            return;
        }
        state.in_flight = false;
        drop(state);
        self.space.notify_one();
    }

    /// Put the trigger taken by the last `pop` back at the head.
    ///
    /// It reuses its own slot, so no producer can be woken by this.
    pub fn requeue_front(&self, trigger: String) {
        let mut state = self.state.lock();
        state.in_flight = false;
        state.items.push_front(trigger);
    }

    pub fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
        self.ready.notify_all();
    }

    /// Wake the worker so it re-checks cancellation.
    ///
    /// Taking the lock orders this after any in-progress check, so the
    /// wakeup cannot be lost.
    pub fn wake(&self) {
        let _state = self.state.lock();
        self.ready.notify_all();
    }

    /// Sleep for `duration` unless `token` is cancelled first.
    /// Returns `true` if cancelled.
    pub fn wait_cancelled(&self, token: &CancellationToken, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut state = self.state.lock();
        loop {
            if token.is_cancelled() {
                return true;
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                return token.is_cancelled();
            }
        }
    }
}
