//! Transitions between named states.

use super::action::Action;

/// A directed edge between two states, selected by a trigger.
///
/// Source and target are plain state names. Whether they exist in the
/// graph is only checked when the transition executes, so a transition can
/// be declared before (or without) its target state.
#[derive(Clone, Debug)]
pub struct Transition {
    name: String,
    source: String,
    target: String,
    trigger: String,
    guards: Vec<Action>,
    effects: Vec<Action>,
}

impl Transition {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        trigger: impl Into<String>,
        guards: Vec<Action>,
        effects: Vec<Action>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
            trigger: trigger.into(),
            guards,
            effects,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Guard actions, run after the source state's exit actions.
    ///
    /// Guards are unconditional: they run for their side effects and cannot
    /// veto the transition. A failing guard aborts the pipeline like any
    /// other action.
    pub fn guards(&self) -> &[Action] {
        &self.guards
    }

    /// Effect actions, run after the guards and before the state commit.
    pub fn effects(&self) -> &[Action] {
        &self.effects
    }

    /// Exact, case-sensitive trigger match.
    pub fn is_triggered_by(&self, trigger: &str) -> bool {
        self.trigger == trigger
    }
}
