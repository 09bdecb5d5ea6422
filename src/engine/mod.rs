//! The active-object engine.
//!
//! An [`ActiveStateMachine`] pairs a validated [`StateGraph`](crate::core::StateGraph)
//! with a bounded trigger queue and a single worker thread. Producers call
//! `enter_trigger` from any thread; the worker dequeues triggers in FIFO
//! order and runs the exit, guard, effect and entry pipeline for each
//! matching transition. Crashes are reported and the worker restarted
//! according to the [`SupervisorPolicy`].

mod config;
mod error;
mod executor;
mod lifecycle;
mod machine;
mod queue;
mod shared;
mod supervisor;
mod worker;

pub use config::{BackpressurePolicy, EngineConfig, SupervisorPolicy, DEFAULT_QUEUE_CAPACITY};
pub use error::{EngineError, ExecutionError, Stage, TransitionRejected, WorkerCrash};
pub use lifecycle::EngineState;
pub use machine::ActiveStateMachine;
