//! Core state graph types.
//!
//! This module contains the immutable configuration an engine runs against:
//! - Actions: named zero-argument side effects
//! - States and transitions, referencing each other by name
//! - The validated state graph
//! - Bounded transition history
//! - Configuration errors shared with the builders and the engine
//!
//! Nothing here spawns threads or takes locks; the engine owns all of that.

mod action;
mod error;
mod graph;
mod history;
mod state;
mod transition;

pub use action::{Action, ActionError, ActionFn};
pub use error::{ConfigError, GraphViolation};
pub use graph::{StateGraph, TriggerPolicy};
pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use state::{State, SENTINEL_STATE_NAME};
pub use transition::Transition;
