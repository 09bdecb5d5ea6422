//! The active state machine: public handle over a worker-driven graph.

use super::config::{BackpressurePolicy, EngineConfig};
use super::error::EngineError;
use super::lifecycle::EngineState;
use super::queue::{QueueFull, TriggerQueue};
use super::shared::{Cursor, Shared};
use super::worker::{self, Worker};
use crate::builder::EngineBuilder;
use crate::core::{ConfigError, StateGraph, TransitionHistory, SENTINEL_STATE_NAME};
use crate::events::{names, Event, EventChannel, SubscriptionId, BROADCAST_TARGET};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

/// A state machine that processes triggers on its own thread.
///
/// Triggers are queued by [`enter_trigger`](Self::enter_trigger) from any
/// thread and consumed one at a time, in order, by a single worker started
/// with [`start`](Self::start). Every observable step is published on the
/// engine's [`EventChannel`].
///
/// # Example
///
/// ```rust
/// use active_fsm::builder::{GraphBuilder, StateBuilder};
/// use active_fsm::engine::ActiveStateMachine;
///
/// let graph = GraphBuilder::new()
///     .with(StateBuilder::new("Idle").default_state().on("go", "Busy"))
///     .with(StateBuilder::new("Busy").on("done", "Idle"))
///     .build()
///     .unwrap();
///
/// let machine = ActiveStateMachine::builder(graph).build().unwrap();
/// assert_eq!(machine.current_state(), "Idle");
///
/// machine.start().unwrap();
/// machine.enter_trigger("go").unwrap();
/// machine.stop().unwrap();
/// ```
pub struct ActiveStateMachine {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
}

impl ActiveStateMachine {
    /// Create an engine in [`EngineState::Initialized`], sitting in the
    /// graph's default state.
    ///
    /// Emits the `OnInit` command to every collaborator, then
    /// `engine.initialized`.
    pub fn new(
        graph: StateGraph,
        config: EngineConfig,
        events: Arc<EventChannel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            cursor: RwLock::new(initial_cursor(&graph)),
            queue: TriggerQueue::new(config.queue_capacity),
            history: Mutex::new(TransitionHistory::with_limit(config.history_limit)),
            lifecycle: RwLock::new(EngineState::Initialized),
            graph: Arc::new(graph),
            config,
            events,
        });
        let machine = Self {
            shared,
            worker: Mutex::new(None),
        };

        tracing::info!(
            engine = %machine.shared.id,
            name = %machine.shared.config.name,
            states = machine.shared.graph.len(),
            capacity = machine.shared.config.queue_capacity,
            "State machine initialized"
        );
        machine.announce_init();
        machine.shared.system(
            names::ENGINE_INITIALIZED,
            format!("Initial state: {}", machine.current_state()),
        );
        Ok(machine)
    }

    pub fn builder(graph: StateGraph) -> EngineBuilder {
        EngineBuilder::new(graph)
    }

    /// Start (or restart) the worker.
    ///
    /// Allowed from `Initialized` and `Stopped`. Triggers left in the queue
    /// by a previous `stop` are processed.
    pub fn start(&self) -> Result<(), EngineError> {
        self.reject_worker_thread("start")?;
        let mut slot = self.worker.lock();
        self.check(EngineState::can_start, "start")?;

        // Left behind by a worker that gave up
        if let Some(stale) = slot.take() {
            if let Err(message) = stale.join() {
                tracing::error!(engine = %self.shared.id, %message, "Previous worker panicked");
            }
        }

        self.shared.queue.set_paused(false);
        let previous = std::mem::replace(&mut *self.shared.lifecycle.write(), EngineState::Running);
        match Worker::spawn(Arc::clone(&self.shared)) {
            Ok(worker) => *slot = Some(worker),
            Err(e) => {
                *self.shared.lifecycle.write() = previous;
                tracing::error!(engine = %self.shared.id, error = %e, "Failed to spawn worker");
                return Err(EngineError::Spawn(e));
            }
        }
        drop(slot);

        tracing::info!(engine = %self.shared.id, "State machine started");
        self.shared
            .system(names::ENGINE_STARTED, format!("Started in {}", self.current_state()));
        Ok(())
    }

    /// Stop dequeuing after the current trigger. Triggers keep queueing.
    pub fn pause(&self) -> Result<(), EngineError> {
        {
            let mut lifecycle = self.shared.lifecycle.write();
            if !lifecycle.can_pause() {
                return Err(EngineError::InvalidLifecycle {
                    operation: "pause",
                    state: *lifecycle,
                });
            }
            *lifecycle = EngineState::Paused;
            self.shared.queue.set_paused(true);
        }

        tracing::info!(engine = %self.shared.id, "State machine paused");
        self.shared.system(names::ENGINE_PAUSED, "Paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), EngineError> {
        {
            let mut lifecycle = self.shared.lifecycle.write();
            if !lifecycle.can_resume() {
                return Err(EngineError::InvalidLifecycle {
                    operation: "resume",
                    state: *lifecycle,
                });
            }
            *lifecycle = EngineState::Running;
            self.shared.queue.set_paused(false);
        }

        tracing::info!(engine = %self.shared.id, "State machine resumed");
        self.shared.system(names::ENGINE_RESUMED, "Resumed");
        Ok(())
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// A trigger already being processed runs to completion. Queued
    /// triggers stay queued and the current state is kept, so `start` can
    /// pick up where this left off. Works from `Running` and `Paused`.
    pub fn stop(&self) -> Result<(), EngineError> {
        self.reject_worker_thread("stop")?;
        let mut slot = self.worker.lock();
        self.check(EngineState::can_stop, "stop")?;

        if let Some(worker) = slot.take() {
            worker.cancel(&self.shared);
            if let Err(message) = worker.join() {
                tracing::error!(engine = %self.shared.id, %message, "Worker panicked");
            }
        }
        *self.shared.lifecycle.write() = EngineState::Stopped;
        drop(slot);

        tracing::info!(
            engine = %self.shared.id,
            pending = self.shared.queue.len(),
            "State machine stopped"
        );
        self.shared.system(
            names::ENGINE_STOPPED,
            format!("{} triggers pending", self.shared.queue.len()),
        );
        Ok(())
    }

    /// Put the machine back in its default state and clear history.
    ///
    /// Only allowed while no worker runs. Queued triggers are kept.
    pub fn reset(&self) -> Result<(), EngineError> {
        self.reject_worker_thread("reset")?;
        let _slot = self.worker.lock();
        self.check(EngineState::can_start, "reset")?;

        *self.shared.cursor.write() = initial_cursor(&self.shared.graph);
        self.shared.history.lock().clear();

        tracing::info!(engine = %self.shared.id, "State machine reset");
        self.announce_init();
        self.shared.system(
            names::ENGINE_RESET,
            format!("Reset to {}", self.current_state()),
        );
        Ok(())
    }

    /// Queue a trigger for the worker.
    ///
    /// Accepted in every lifecycle state. When the queue is full the
    /// configured [`BackpressurePolicy`] applies, except on the worker
    /// thread itself, where blocking could never end and the trigger is
    /// rejected instead.
    ///
    /// `trigger.entered` is published on the calling thread once the
    /// trigger is queued and before this returns. The worker may already
    /// have picked the trigger up by then, so subscribers can observe its
    /// `transition.*` events before `trigger.entered`.
    pub fn enter_trigger(&self, trigger: impl Into<String>) -> Result<(), EngineError> {
        let trigger = trigger.into();
        let policy = if worker::on_worker_thread(self.shared.id) {
            BackpressurePolicy::Reject
        } else {
            self.shared.config.backpressure
        };

        match self.shared.queue.push(trigger.clone(), policy) {
            Ok(depth) => {
                tracing::trace!(engine = %self.shared.id, trigger = %trigger, depth, "Trigger queued");
                self.shared.system(names::TRIGGER_ENTERED, trigger);
                Ok(())
            }
            Err(QueueFull { trigger, capacity }) => {
                tracing::warn!(engine = %self.shared.id, trigger = %trigger, capacity, "Trigger queue full");
                self.shared.system(
                    names::TRIGGER_REJECTED,
                    format!("Queue full (capacity {capacity}); dropped '{trigger}'"),
                );
                Err(EngineError::QueueFull { trigger, capacity })
            }
        }
    }

    pub fn current_state(&self) -> String {
        self.shared.cursor.read().current.clone()
    }

    /// State before the last transition; the sentinel until one completes.
    pub fn previous_state(&self) -> String {
        self.shared.cursor.read().previous.clone()
    }

    pub fn engine_state(&self) -> EngineState {
        *self.shared.lifecycle.read()
    }

    /// Queued triggers, oldest first.
    pub fn pending_triggers(&self) -> Vec<String> {
        self.shared.queue.snapshot()
    }

    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    /// Snapshot of completed transitions.
    pub fn history(&self) -> TransitionHistory {
        self.shared.history.lock().clone()
    }

    pub fn graph(&self) -> &StateGraph {
        &self.shared.graph
    }

    pub fn events(&self) -> &Arc<EventChannel> {
        &self.shared.events
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.shared.events.subscribe(handler)
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    fn announce_init(&self) {
        self.shared.events.emit(Event::command(
            names::ON_INIT,
            format!("Initial state: {}", self.current_state()),
            self.shared.config.name.as_str(),
            BROADCAST_TARGET,
        ));
    }

    fn check(&self, allowed: fn(EngineState) -> bool, operation: &'static str) -> Result<(), EngineError> {
        let state = self.engine_state();
        if allowed(state) {
            Ok(())
        } else {
            Err(EngineError::InvalidLifecycle { operation, state })
        }
    }

    fn reject_worker_thread(&self, operation: &'static str) -> Result<(), EngineError> {
        if worker::on_worker_thread(self.shared.id) {
            return Err(EngineError::WorkerThreadCall { operation });
        }
        Ok(())
    }
}

impl Drop for ActiveStateMachine {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.cancel(&self.shared);
            if worker::on_worker_thread(self.shared.id) {
                return;
            }
            if let Err(message) = worker.join() {
                tracing::error!(engine = %self.shared.id, %message, "Worker panicked");
            }
        }
    }
}

fn initial_cursor(graph: &StateGraph) -> Cursor {
    Cursor {
        current: graph.default_state().name().to_string(),
        previous: SENTINEL_STATE_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{GraphBuilder, StateBuilder};
    use crate::events::EventKind;

    fn ping_pong() -> StateGraph {
        GraphBuilder::new()
            .with(StateBuilder::new("A").default_state().on("go", "B"))
            .with(StateBuilder::new("B").on("back", "A"))
            .build()
            .unwrap()
    }

    #[test]
    fn construction_announces_init() {
        let events = Arc::new(EventChannel::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.subscribe(move |e: &Event| sink.lock().push((e.kind(), e.name().to_string())));

        let machine = ActiveStateMachine::new(ping_pong(), EngineConfig::default(), events).unwrap();

        assert_eq!(machine.current_state(), "A");
        assert_eq!(machine.previous_state(), SENTINEL_STATE_NAME);
        assert_eq!(machine.engine_state(), EngineState::Initialized);
        assert_eq!(
            *seen.lock(),
            vec![
                (EventKind::Command, names::ON_INIT.to_string()),
                (EventKind::System, names::ENGINE_INITIALIZED.to_string()),
            ]
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = ActiveStateMachine::new(
            ping_pong(),
            EngineConfig::new(0),
            Arc::new(EventChannel::new()),
        );
        assert!(matches!(result, Err(ConfigError::ZeroCapacity)));
    }

    #[test]
    fn lifecycle_operations_are_checked() {
        let machine = ActiveStateMachine::builder(ping_pong()).build().unwrap();

        assert!(matches!(
            machine.pause(),
            Err(EngineError::InvalidLifecycle { operation: "pause", state: EngineState::Initialized })
        ));
        assert!(matches!(machine.resume(), Err(EngineError::InvalidLifecycle { .. })));
        assert!(matches!(machine.stop(), Err(EngineError::InvalidLifecycle { .. })));

        machine.start().unwrap();
        assert!(matches!(machine.start(), Err(EngineError::InvalidLifecycle { .. })));
        assert!(matches!(machine.reset(), Err(EngineError::InvalidLifecycle { .. })));

        machine.pause().unwrap();
        assert_eq!(machine.engine_state(), EngineState::Paused);
        assert!(matches!(machine.pause(), Err(EngineError::InvalidLifecycle { .. })));

        machine.resume().unwrap();
        machine.stop().unwrap();
        assert_eq!(machine.engine_state(), EngineState::Stopped);
        assert!(matches!(machine.stop(), Err(EngineError::InvalidLifecycle { .. })));
    }

    #[test]
    fn triggers_queue_before_start() {
        let machine = ActiveStateMachine::builder(ping_pong()).build().unwrap();

        machine.enter_trigger("go").unwrap();
        machine.enter_trigger("back").unwrap();

        assert_eq!(machine.pending_triggers(), ["go", "back"]);
        assert_eq!(machine.current_state(), "A");
    }

    #[test]
    fn reject_policy_reports_full_queue() {
        let machine = ActiveStateMachine::builder(ping_pong())
            .config(EngineConfig::new(1).with_backpressure(BackpressurePolicy::Reject))
            .build()
            .unwrap();

        machine.enter_trigger("go").unwrap();
        let err = machine.enter_trigger("back").unwrap_err();

        assert!(matches!(err, EngineError::QueueFull { ref trigger, capacity: 1 } if trigger == "back"));
        assert_eq!(machine.queue_len(), 1);
    }
}
