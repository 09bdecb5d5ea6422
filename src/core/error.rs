//! Configuration errors raised while building graphs, transitions and engines.

use thiserror::Error;

/// A single problem found while validating a state graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphViolation {
    #[error("No default state. Mark exactly one state with .default_state()")]
    NoDefaultState,

    #[error("More than one default state: {}", .states.join(", "))]
    MultipleDefaultStates { states: Vec<String> },

    #[error("State '{name}' is defined more than once")]
    DuplicateState { name: String },

    #[error("State name '{name}' is reserved for the engine's sentinel state")]
    ReservedStateName { name: String },

    #[error("State names must not be empty")]
    EmptyStateName,

    #[error("State map key '{key}' does not match state name '{name}'")]
    KeyMismatch { key: String, name: String },

    #[error("State '{state}' declares transition '{transition}' more than once")]
    DuplicateTransition { state: String, transition: String },

    #[error("State '{state}' has more than one transition on trigger '{trigger}'")]
    AmbiguousTrigger { state: String, trigger: String },
}

/// Errors that can occur while configuring a state machine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid state graph: {}", format_violations(.0))]
    InvalidGraph(Vec<GraphViolation>),

    #[error("Transition '{transition}' has no source state. Call .from(state)")]
    MissingSource { transition: String },

    #[error("Transition '{transition}' has no target state. Call .to(state)")]
    MissingTarget { transition: String },

    #[error("Transition '{transition}' has no trigger. Call .on(trigger)")]
    MissingTrigger { transition: String },

    #[error("Queue capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Failed to parse engine configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Graph violations carried by this error, if any.
    pub fn violations(&self) -> &[GraphViolation] {
        match self {
            Self::InvalidGraph(violations) => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[GraphViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
