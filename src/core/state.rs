//! States of a state graph.
//!
//! A state is an immutable value: a name, the actions run when it is
//! entered or left, and its outbound transitions in declaration order.

use super::action::Action;
use super::transition::Transition;

/// Name of the synthetic state used as the previous state before the
/// first transition. No user state may use it.
pub const SENTINEL_STATE_NAME: &str = "InitialState";

/// A named state with ordered entry/exit actions and outbound transitions.
///
/// # Example
///
/// ```rust
/// use active_fsm::core::{Action, State, Transition};
///
/// let idle = State::new(
///     "Idle",
///     vec![Transition::new("start", "Idle", "Running", "start", vec![], vec![])],
///     vec![Action::infallible("lights_off", || {})],
///     vec![],
///     true,
/// );
///
/// assert!(idle.is_default());
/// assert_eq!(idle.transitions_for("start").count(), 1);
/// assert_eq!(idle.transitions_for("stop").count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct State {
    name: String,
    transitions: Vec<Transition>,
    entry_actions: Vec<Action>,
    exit_actions: Vec<Action>,
    is_default: bool,
}

impl State {
    pub fn new(
        name: impl Into<String>,
        transitions: Vec<Transition>,
        entry_actions: Vec<Action>,
        exit_actions: Vec<Action>,
        is_default: bool,
    ) -> Self {
        Self {
            name: name.into(),
            transitions,
            entry_actions,
            exit_actions,
            is_default,
        }
    }

    /// The placeholder previous state of a freshly initialized engine.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_STATE_NAME, Vec::new(), Vec::new(), Vec::new(), false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == SENTINEL_STATE_NAME
    }

    pub fn entry_actions(&self) -> &[Action] {
        &self.entry_actions
    }

    pub fn exit_actions(&self) -> &[Action] {
        &self.exit_actions
    }

    /// All outbound transitions in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Outbound transitions matching `trigger`, in declaration order.
    ///
    /// More than one transition may share a trigger; the engine executes
    /// every match.
    pub fn transitions_for<'a>(
        &'a self,
        trigger: &'a str,
    ) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions
            .iter()
            .filter(move |t| t.is_triggered_by(trigger))
    }

    /// Look up an outbound transition by name.
    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.name() == name)
    }
}
