//! Builder API for ergonomic state machine construction.
//!
//! Graphs are assembled from [`StateBuilder`]s and validated as a whole by
//! [`GraphBuilder`], which reports every problem it finds rather than the
//! first. [`EngineBuilder`] then wraps a graph in a running engine.

pub mod graph;
pub mod machine;
pub mod state;
pub mod transition;

pub use crate::core::{ConfigError, GraphViolation};
pub use graph::GraphBuilder;
pub use machine::EngineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

use crate::core::Transition;

/// Create an action-free transition from `source` to `target` on `trigger`.
///
/// # Example
///
/// ```
/// use active_fsm::builder::simple_transition;
///
/// let transition = simple_transition("Closed", "push", "Open");
/// assert_eq!(transition.name(), "Closed:push->Open");
/// assert!(transition.guards().is_empty());
/// ```
pub fn simple_transition(
    source: impl Into<String>,
    trigger: impl Into<String>,
    target: impl Into<String>,
) -> Transition {
    let source = source.into();
    let trigger = trigger.into();
    let target = target.into();
    let name = format!("{source}:{trigger}->{target}");
    Transition::new(name, source, target, trigger, Vec::new(), Vec::new())
}
