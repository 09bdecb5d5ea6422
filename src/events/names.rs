//! Names of the events emitted by the engine.

/// Engine constructed and positioned on its default state.
pub const ENGINE_INITIALIZED: &str = "engine.initialized";
/// Engine re-initialized to its default state.
pub const ENGINE_RESET: &str = "engine.reset";
pub const ENGINE_STARTED: &str = "engine.started";
pub const ENGINE_PAUSED: &str = "engine.paused";
pub const ENGINE_RESUMED: &str = "engine.resumed";
pub const ENGINE_STOPPED: &str = "engine.stopped";

/// Command broadcast on initialization so collaborators can initialize too.
pub const ON_INIT: &str = "OnInit";

/// The worker observed cancellation and is exiting.
pub const WORKER_CANCELLED: &str = "worker.cancelled";
pub const WORKER_CRASHED: &str = "worker.crashed";
pub const WORKER_RESTARTED: &str = "worker.restarted";
/// The supervisor ran out of restarts and the engine is stopped.
pub const WORKER_GAVE_UP: &str = "worker.gave_up";

pub const TRIGGER_ENTERED: &str = "trigger.entered";
/// The queue was full and the trigger was dropped.
pub const TRIGGER_REJECTED: &str = "trigger.rejected";
/// No transition of the current state matched the trigger.
pub const TRIGGER_UNMATCHED: &str = "trigger.unmatched";

pub const TRANSITION_BEGIN: &str = "transition.begin";
pub const TRANSITION_GUARDS_EXECUTED: &str = "transition.guards_executed";
pub const TRANSITION_EFFECTS_EXECUTED: &str = "transition.effects_executed";
/// The transition failed validation and was skipped.
pub const TRANSITION_ABORTED: &str = "transition.aborted";
pub const TRANSITION_COMPLETED: &str = "transition.completed";
