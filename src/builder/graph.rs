//! Builder for constructing state graphs.

use crate::core::ConfigError;
use crate::builder::state::StateBuilder;
use crate::core::{State, StateGraph, TriggerPolicy};

/// Collects states and validates them into a [`StateGraph`].
#[derive(Default)]
pub struct GraphBuilder {
    states: Vec<State>,
    policy: TriggerPolicy,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a built state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add a state from its builder.
    pub fn with(self, builder: StateBuilder) -> Self {
        self.state(builder.build())
    }

    /// Add several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Reject states with more than one transition on the same trigger.
    pub fn unique_triggers(mut self) -> Self {
        self.policy = TriggerPolicy::Unique;
        self
    }

    /// Validate and build the graph, reporting every violation found.
    pub fn build(self) -> Result<StateGraph, ConfigError> {
        StateGraph::with_policy(self.states, self.policy)
    }
}
