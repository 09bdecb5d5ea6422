//! The immutable state graph an engine runs against.
//!
//! Construction validates the whole graph at once and reports every
//! violation found, not just the first one.

use super::state::{State, SENTINEL_STATE_NAME};
use super::error::{ConfigError, GraphViolation};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<GraphViolation>>;

/// How transitions sharing a trigger within one state are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// Every matching transition executes, in declaration order.
    #[default]
    FanOut,

    /// A `(state, trigger)` pair may appear at most once.
    Unique,
}

/// Validated, read-only collection of states keyed by name.
///
/// # Example
///
/// ```rust
/// use active_fsm::core::{State, StateGraph, Transition};
///
/// let graph = StateGraph::new(vec![
///     State::new(
///         "A",
///         vec![Transition::new("a_to_b", "A", "B", "go", vec![], vec![])],
///         vec![],
///         vec![],
///         true,
///     ),
///     State::new("B", vec![], vec![], vec![], false),
/// ])
/// .unwrap();
///
/// assert_eq!(graph.default_state().name(), "A");
/// assert!(graph.contains("B"));
/// ```
#[derive(Clone, Debug)]
pub struct StateGraph {
    states: HashMap<String, State>,
    order: Vec<String>,
    default_state: String,
}

impl StateGraph {
    /// Build a graph from states, allowing trigger fan-out.
    pub fn new(states: impl IntoIterator<Item = State>) -> Result<Self, ConfigError> {
        Self::with_policy(states, TriggerPolicy::FanOut)
    }

    /// Build a graph from states with an explicit trigger policy.
    pub fn with_policy(
        states: impl IntoIterator<Item = State>,
        policy: TriggerPolicy,
    ) -> Result<Self, ConfigError> {
        let states: Vec<State> = states.into_iter().collect();
        let checks = graph_checks(&states, policy);
        into_result(checks)?;
        Ok(Self::assemble(states))
    }

    /// Build a graph from a map of state name to state.
    ///
    /// Every key must equal the name of the state it maps to. States are
    /// ordered by name since the map carries no declaration order.
    pub fn from_map(states: HashMap<String, State>) -> Result<Self, ConfigError> {
        let mut entries: Vec<(String, State)> = states.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut checks: Vec<Check> = entries
            .iter()
            .map(|(key, state)| {
                if key == state.name() {
                    Validation::success(())
                } else {
                    Validation::fail(GraphViolation::KeyMismatch {
                        key: key.clone(),
                        name: state.name().to_string(),
                    })
                }
            })
            .collect();

        let states: Vec<State> = entries.into_iter().map(|(_, state)| state).collect();
        checks.extend(graph_checks(&states, TriggerPolicy::FanOut));
        into_result(checks)?;
        Ok(Self::assemble(states))
    }

    fn assemble(states: Vec<State>) -> Self {
        let order: Vec<String> = states.iter().map(|s| s.name().to_string()).collect();
        let default_state = states
            .iter()
            .find(|s| s.is_default())
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        let states = states
            .into_iter()
            .map(|s| (s.name().to_string(), s))
            .collect();

        Self {
            states,
            order,
            default_state,
        }
    }

    pub fn get(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// The single state flagged as default.
    pub fn default_state(&self) -> &State {
        &self.states[&self.default_state]
    }

    /// States in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.order.iter().filter_map(|name| self.states.get(name))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn into_result(checks: Vec<Check>) -> Result<(), ConfigError> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(ConfigError::InvalidGraph(
            errors.iter().cloned().collect(),
        )),
    }
}

fn graph_checks(states: &[State], policy: TriggerPolicy) -> Vec<Check> {
    let mut checks: Vec<Check> = Vec::new();

    let defaults: Vec<String> = states
        .iter()
        .filter(|s| s.is_default())
        .map(|s| s.name().to_string())
        .collect();
    checks.push(match defaults.len() {
        0 => Validation::fail(GraphViolation::NoDefaultState),
        1 => Validation::success(()),
        _ => Validation::fail(GraphViolation::MultipleDefaultStates { states: defaults }),
    });

    let mut seen = HashSet::new();
    for state in states {
        let name = state.name();
        if name.is_empty() {
            checks.push(Validation::fail(GraphViolation::EmptyStateName));
        }
        if name == SENTINEL_STATE_NAME {
            checks.push(Validation::fail(GraphViolation::ReservedStateName {
                name: name.to_string(),
            }));
        }
        if !seen.insert(name) {
            checks.push(Validation::fail(GraphViolation::DuplicateState {
                name: name.to_string(),
            }));
        }
        checks.extend(transition_checks(state, policy));
    }

    checks
}

fn transition_checks(state: &State, policy: TriggerPolicy) -> Vec<Check> {
    let mut checks: Vec<Check> = Vec::new();
    let mut names = HashSet::new();
    let mut triggers = HashSet::new();
    let mut ambiguous = HashSet::new();

    for transition in state.transitions() {
        if !names.insert(transition.name()) {
            checks.push(Validation::fail(GraphViolation::DuplicateTransition {
                state: state.name().to_string(),
                transition: transition.name().to_string(),
            }));
        }
        let repeated = !triggers.insert(transition.trigger());
        if policy == TriggerPolicy::Unique && repeated && ambiguous.insert(transition.trigger()) {
            checks.push(Validation::fail(GraphViolation::AmbiguousTrigger {
                state: state.name().to_string(),
                trigger: transition.trigger().to_string(),
            }));
        }
    }

    checks
}
