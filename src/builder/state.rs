//! Builder for constructing states.

use crate::core::ConfigError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Action, State, Transition};

/// Builder for constructing states with a fluent API.
pub struct StateBuilder {
    name: String,
    transitions: Vec<Transition>,
    entry_actions: Vec<Action>,
    exit_actions: Vec<Action>,
    is_default: bool,
}

impl StateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            is_default: false,
        }
    }

    /// Mark this state as the one the engine starts in.
    pub fn default_state(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Append an entry action.
    pub fn entry(mut self, action: Action) -> Self {
        self.entry_actions.push(action);
        self
    }

    /// Append an exit action.
    pub fn exit(mut self, action: Action) -> Self {
        self.exit_actions.push(action);
        self
    }

    /// Add an action-free transition from this state to `target`.
    ///
    /// The transition is named `<state>:<trigger>-><target>`.
    pub fn on(mut self, trigger: impl Into<String>, target: impl Into<String>) -> Self {
        let trigger = trigger.into();
        let target = target.into();
        let name = format!("{}:{}->{}", self.name, trigger, target);
        self.transitions.push(Transition::new(
            name,
            self.name.clone(),
            target,
            trigger,
            Vec::new(),
            Vec::new(),
        ));
        self
    }

    /// Add a transition using a builder.
    /// The source defaults to this state when the builder has none.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, ConfigError> {
        let transition = builder.source_or(&self.name).build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn build(self) -> State {
        State::new(
            self.name,
            self.transitions,
            self.entry_actions,
            self.exit_actions,
            self.is_default,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_creates_named_transition_from_this_state() {
        let state = StateBuilder::new("Idle").on("start", "Running").build();

        let transition = &state.transitions()[0];
        assert_eq!(transition.name(), "Idle:start->Running");
        assert_eq!(transition.source(), "Idle");
        assert_eq!(transition.target(), "Running");
        assert_eq!(transition.trigger(), "start");
    }

    #[test]
    fn transition_builder_defaults_source() {
        let state = StateBuilder::new("Idle")
            .transition(TransitionBuilder::new("boot").to("Running").on("start"))
            .unwrap()
            .build();

        assert_eq!(state.transitions()[0].source(), "Idle");
    }

    #[test]
    fn transition_builder_errors_propagate() {
        let result = StateBuilder::new("Idle").transition(TransitionBuilder::new("boot").on("start"));
        assert!(matches!(result, Err(ConfigError::MissingTarget { .. })));
    }

    #[test]
    fn actions_are_kept_in_order() {
        let state = StateBuilder::new("Busy")
            .default_state()
            .entry(Action::infallible("a", || {}))
            .entry(Action::infallible("b", || {}))
            .exit(Action::infallible("c", || {}))
            .build();

        assert!(state.is_default());
        let entries: Vec<_> = state.entry_actions().iter().map(Action::name).collect();
        assert_eq!(entries, ["a", "b"]);
        assert_eq!(state.exit_actions()[0].name(), "c");
    }
}
