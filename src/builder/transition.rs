//! Builder for constructing transitions.

use crate::core::ConfigError;
use crate::core::{Action, Transition};

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder {
    name: String,
    source: Option<String>,
    target: Option<String>,
    trigger: Option<String>,
    guards: Vec<Action>,
    effects: Vec<Action>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            target: None,
            trigger: None,
            guards: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Set the source state (required unless added through a `StateBuilder`).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.source = Some(state.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.target = Some(state.into());
        self
    }

    /// Set the trigger that selects this transition (required).
    pub fn on(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Append a guard action.
    pub fn guard(mut self, action: Action) -> Self {
        self.guards.push(action);
        self
    }

    /// Append an effect action.
    pub fn effect(mut self, action: Action) -> Self {
        self.effects.push(action);
        self
    }

    pub(crate) fn source_or(mut self, state: &str) -> Self {
        if self.source.is_none() {
            self.source = Some(state.to_string());
        }
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition, ConfigError> {
        let source = self.source.ok_or_else(|| ConfigError::MissingSource {
            transition: self.name.clone(),
        })?;
        let target = self.target.ok_or_else(|| ConfigError::MissingTarget {
            transition: self.name.clone(),
        })?;
        let trigger = self.trigger.ok_or_else(|| ConfigError::MissingTrigger {
            transition: self.name.clone(),
        })?;

        Ok(Transition::new(
            self.name,
            source,
            target,
            trigger,
            self.guards,
            self.effects,
        ))
    }
}
