//! Active FSM: an active-object state machine engine
//!
//! A state graph is built and validated once, then driven by a dedicated
//! worker thread. Callers never run transitions themselves: they queue
//! triggers, and the worker processes them one at a time in arrival order.
//!
//! # Core Concepts
//!
//! - **State graph**: immutable states with entry/exit actions and outbound
//!   transitions selected by trigger
//! - **Trigger queue**: bounded FIFO shared by every producer and the worker
//! - **Transition pipeline**: exit, guard, effect, commit, entry
//! - **Events**: every milestone is published to subscribers as a
//!   System, Command or Notification event
//! - **Supervision**: a failing action or panic crashes the consume loop,
//!   which is restarted; a restart limit with backoff can be configured
//!
//! # Example
//!
//! ```rust
//! use active_fsm::builder::{GraphBuilder, StateBuilder, TransitionBuilder};
//! use active_fsm::core::Action;
//! use active_fsm::engine::ActiveStateMachine;
//! use active_fsm::events::names;
//! use std::sync::mpsc;
//! use std::time::Duration;
//!
//! let graph = GraphBuilder::new()
//!     .with(StateBuilder::new("Closed").default_state().on("open", "Open"))
//!     .with(
//!         StateBuilder::new("Open")
//!             .transition(
//!                 TransitionBuilder::new("close")
//!                     .to("Closed")
//!                     .on("close")
//!                     .effect(Action::infallible("log", || println!("closing"))),
//!             )
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let (tx, rx) = mpsc::channel();
//! let tx = std::sync::Mutex::new(tx);
//! let machine = ActiveStateMachine::builder(graph)
//!     .subscribe(move |e| {
//!         if e.name() == names::TRANSITION_COMPLETED {
//!             let _ = tx.lock().unwrap().send(e.info().to_string());
//!         }
//!     })
//!     .build()
//!     .unwrap();
//!
//! machine.start().unwrap();
//! machine.enter_trigger("open").unwrap();
//! machine.enter_trigger("close").unwrap();
//!
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "Closed -> Open");
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "Open -> Closed");
//! machine.stop().unwrap();
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod events;
pub mod services;

// Re-export commonly used types
pub use builder::{ConfigError, EngineBuilder, GraphBuilder, StateBuilder, TransitionBuilder};
pub use crate::core::{Action, ActionError, State, StateGraph, Transition};
pub use engine::{ActiveStateMachine, EngineConfig, EngineError, EngineState};
pub use events::{Event, EventChannel, EventKind};
