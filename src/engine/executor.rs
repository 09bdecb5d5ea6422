//! Transition execution, run on the worker thread for each dequeued trigger.
//!
//! For every transition of the current state matching the trigger, in
//! declaration order:
//! 1. validate source and target against the *then-current* state
//! 2. run the current state's exit actions
//! 3. run the transition's guard actions (they cannot veto)
//! 4. run the transition's effect actions
//! 5. commit: previous := current, current := target
//! 6. run the target state's entry actions
//! 7. record history and emit `transition.completed`
//!
//! An action failure stops the pipeline where it is; nothing is rolled back.

use super::error::{ExecutionError, Stage, TransitionRejected};
use super::shared::Shared;
use crate::core::{Action, State, StateGraph, Transition, TransitionRecord};
use crate::events::names;

/// Route `trigger` through every matching transition of the current state.
pub(crate) fn dispatch(shared: &Shared, trigger: &str) -> Result<(), ExecutionError> {
    let current = shared.cursor.read().current.clone();
    let Some(state) = shared.graph.get(&current) else {
        tracing::error!(engine = %shared.id, state = %current, "Current state missing from graph");
        return Ok(());
    };

    let matches: Vec<&Transition> = state.transitions_for(trigger).collect();
    if matches.is_empty() {
        tracing::debug!(engine = %shared.id, trigger, state = %current, "No transition for trigger");
        shared.system(
            names::TRIGGER_UNMATCHED,
            format!("No transition on '{trigger}' from '{current}'"),
        );
        return Ok(());
    }

    for transition in matches {
        execute(shared, transition, trigger)?;
    }
    Ok(())
}

fn execute(shared: &Shared, transition: &Transition, trigger: &str) -> Result<(), ExecutionError> {
    let current = shared.cursor.read().current.clone();
    let (from, to) = match validate(&shared.graph, transition, &current) {
        Ok(states) => states,
        Err(rejected) => {
            tracing::warn!(engine = %shared.id, error = %rejected, "Transition rejected");
            shared.system(names::TRANSITION_ABORTED, rejected.to_string());
            return Ok(());
        }
    };

    shared.system(
        names::TRANSITION_BEGIN,
        format!(
            "{}: {} -> {} on '{}'",
            transition.name(),
            from.name(),
            to.name(),
            trigger
        ),
    );

    run_actions(transition, Stage::Exit, from.exit_actions())?;

    run_actions(transition, Stage::Guard, transition.guards())?;
    shared.system(
        names::TRANSITION_GUARDS_EXECUTED,
        format!("{} guard actions executed", transition.guards().len()),
    );

    run_actions(transition, Stage::Effect, transition.effects())?;
    shared.system(
        names::TRANSITION_EFFECTS_EXECUTED,
        format!("{} transition actions executed", transition.effects().len()),
    );

    {
        let mut cursor = shared.cursor.write();
        cursor.previous = std::mem::replace(&mut cursor.current, to.name().to_string());
    }

    run_actions(transition, Stage::Entry, to.entry_actions())?;

    shared.history.lock().record(TransitionRecord::new(
        transition.name(),
        trigger,
        from.name(),
        to.name(),
    ));
    tracing::debug!(
        engine = %shared.id,
        transition = %transition.name(),
        from = %from.name(),
        to = %to.name(),
        "Transition completed"
    );
    shared.system(
        names::TRANSITION_COMPLETED,
        format!("{} -> {}", from.name(), to.name()),
    );
    Ok(())
}

/// Resolve the states a transition moves between, or say why it cannot run.
fn validate<'g>(
    graph: &'g StateGraph,
    transition: &Transition,
    current: &str,
) -> Result<(&'g State, &'g State), TransitionRejected> {
    let source_mismatch = || TransitionRejected::SourceMismatch {
        transition: transition.name().to_string(),
        source_state: transition.source().to_string(),
        current: current.to_string(),
    };

    if transition.source() != current {
        return Err(source_mismatch());
    }
    let from = graph.get(current).ok_or_else(source_mismatch)?;
    let to = graph
        .get(transition.target())
        .ok_or_else(|| TransitionRejected::UnknownTarget {
            transition: transition.name().to_string(),
            target: transition.target().to_string(),
            current: current.to_string(),
        })?;
    Ok((from, to))
}

fn run_actions(
    transition: &Transition,
    stage: Stage,
    actions: &[Action],
) -> Result<(), ExecutionError> {
    for action in actions {
        action.execute().map_err(|source| ExecutionError {
            transition: transition.name().to_string(),
            stage,
            action: action.name().to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{GraphBuilder, StateBuilder, TransitionBuilder};
    use crate::core::{ActionError, TransitionHistory, SENTINEL_STATE_NAME};
    use crate::engine::config::EngineConfig;
    use crate::engine::lifecycle::EngineState;
    use crate::engine::queue::TriggerQueue;
    use crate::engine::shared::Cursor;
    use crate::events::{Event, EventChannel};
    use parking_lot::{Mutex, RwLock};
    use std::sync::Arc;
    use uuid::Uuid;

    fn shared_for(graph: StateGraph) -> (Shared, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(EventChannel::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.subscribe(move |e: &Event| sink.lock().push(e.clone()));

        let current = graph.default_state().name().to_string();
        let shared = Shared {
            id: Uuid::new_v4(),
            config: EngineConfig::default(),
            graph: Arc::new(graph),
            queue: TriggerQueue::new(4),
            cursor: RwLock::new(Cursor {
                current,
                previous: SENTINEL_STATE_NAME.to_string(),
            }),
            lifecycle: RwLock::new(EngineState::Running),
            history: Mutex::new(TransitionHistory::default()),
            events,
        };
        (shared, seen)
    }

    fn step(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Action {
        let log = Arc::clone(log);
        Action::infallible(name, move || log.lock().push(name.to_string()))
    }

    fn names_of(events: &Arc<Mutex<Vec<Event>>>) -> Vec<String> {
        events.lock().iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn pipeline_runs_exit_guard_effect_entry() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .with(
                StateBuilder::new("A")
                    .default_state()
                    .exit(step(&log, "exit_a"))
                    .transition(
                        TransitionBuilder::new("a_to_b")
                            .to("B")
                            .on("go")
                            .guard(step(&log, "guard"))
                            .effect(step(&log, "effect")),
                    )
                    .unwrap(),
            )
            .with(StateBuilder::new("B").entry(step(&log, "enter_b")))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        dispatch(&shared, "go").unwrap();

        assert_eq!(*log.lock(), ["exit_a", "guard", "effect", "enter_b"]);
        let cursor = shared.cursor.read().clone();
        assert_eq!(cursor.current, "B");
        assert_eq!(cursor.previous, "A");
        assert_eq!(
            names_of(&events),
            [
                names::TRANSITION_BEGIN,
                names::TRANSITION_GUARDS_EXECUTED,
                names::TRANSITION_EFFECTS_EXECUTED,
                names::TRANSITION_COMPLETED,
            ]
        );
        assert_eq!(events.lock()[3].info(), "A -> B");
        assert_eq!(shared.history.lock().path(), vec!["A", "B"]);
    }

    #[test]
    fn unmatched_trigger_changes_nothing() {
        let graph = GraphBuilder::new()
            .with(StateBuilder::new("A").default_state().on("go", "A"))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        dispatch(&shared, "GO").unwrap();

        assert_eq!(shared.cursor.read().current, "A");
        assert_eq!(names_of(&events), [names::TRIGGER_UNMATCHED]);
    }

    #[test]
    fn source_mismatch_is_aborted_without_side_effects() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .with(
                StateBuilder::new("A")
                    .default_state()
                    .exit(step(&log, "exit_a"))
                    .transition(TransitionBuilder::new("stray").from("B").to("B").on("go"))
                    .unwrap(),
            )
            .with(StateBuilder::new("B"))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        dispatch(&shared, "go").unwrap();

        assert!(log.lock().is_empty());
        assert_eq!(shared.cursor.read().current, "A");
        assert_eq!(names_of(&events), [names::TRANSITION_ABORTED]);
        assert!(events.lock()[0].info().contains("source state 'B'"));
    }

    #[test]
    fn unknown_target_is_aborted() {
        let graph = GraphBuilder::new()
            .with(StateBuilder::new("A").default_state().on("go", "Nowhere"))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        dispatch(&shared, "go").unwrap();

        assert_eq!(shared.cursor.read().current, "A");
        assert_eq!(shared.cursor.read().previous, SENTINEL_STATE_NAME);
        assert_eq!(names_of(&events), [names::TRANSITION_ABORTED]);
        assert!(events.lock()[0].info().contains("unknown state 'Nowhere'"));
    }

    #[test]
    fn fan_out_validates_each_match_against_new_state() {
        let graph = GraphBuilder::new()
            .with(
                StateBuilder::new("A")
                    .default_state()
                    .on("go", "B")
                    .on("go", "C"),
            )
            .with(StateBuilder::new("B"))
            .with(StateBuilder::new("C"))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        dispatch(&shared, "go").unwrap();

        assert_eq!(shared.cursor.read().current, "B");
        let seen = names_of(&events);
        assert_eq!(seen.last().map(String::as_str), Some(names::TRANSITION_ABORTED));
        assert_eq!(
            seen.iter()
                .filter(|n| n.as_str() == names::TRANSITION_COMPLETED)
                .count(),
            1
        );
    }

    #[test]
    fn fan_out_self_transitions_all_run() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .with(
                StateBuilder::new("A")
                    .default_state()
                    .transition(TransitionBuilder::new("first").to("A").on("tick").effect(step(&log, "first")))
                    .unwrap()
                    .transition(TransitionBuilder::new("second").to("A").on("tick").effect(step(&log, "second")))
                    .unwrap(),
            )
            .build()
            .unwrap();
        let (shared, _events) = shared_for(graph);

        dispatch(&shared, "tick").unwrap();

        assert_eq!(*log.lock(), ["first", "second"]);
        assert_eq!(shared.history.lock().len(), 2);
    }

    #[test]
    fn failing_effect_stops_before_commit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .with(
                StateBuilder::new("A")
                    .default_state()
                    .exit(step(&log, "exit_a"))
                    .transition(
                        TransitionBuilder::new("a_to_b")
                            .to("B")
                            .on("go")
                            .effect(Action::new("jam", || Err(ActionError::new("jammed"))))
                            .effect(step(&log, "never")),
                    )
                    .unwrap(),
            )
            .with(StateBuilder::new("B").entry(step(&log, "enter_b")))
            .build()
            .unwrap();
        let (shared, events) = shared_for(graph);

        let err = dispatch(&shared, "go").unwrap_err();

        assert_eq!(err.stage, Stage::Effect);
        assert_eq!(err.action, "jam");
        assert_eq!(*log.lock(), ["exit_a"]);
        assert_eq!(shared.cursor.read().current, "A");
        assert!(!names_of(&events).contains(&names::TRANSITION_COMPLETED.to_string()));
    }

    #[test]
    fn failing_entry_leaves_state_committed() {
        let graph = GraphBuilder::new()
            .with(StateBuilder::new("A").default_state().on("go", "B"))
            .with(StateBuilder::new("B").entry(Action::new("boot", || Err(ActionError::new("no power")))))
            .build()
            .unwrap();
        let (shared, _events) = shared_for(graph);

        let err = dispatch(&shared, "go").unwrap_err();

        assert_eq!(err.stage, Stage::Entry);
        assert_eq!(shared.cursor.read().current, "B");
        assert!(shared.history.lock().is_empty());
    }
}
