//! Property-based tests for the engine and its building blocks.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

mod common;

use active_fsm::builder::{GraphBuilder, StateBuilder, TransitionBuilder};
use active_fsm::core::{Action, TransitionHistory, TransitionRecord};
use active_fsm::engine::{ActiveStateMachine, EngineConfig};
use active_fsm::events::{names, EventChannel};
use common::EventLog;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

const TRIGGERS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

prop_compose! {
    fn trigger_sequence()(indices in prop::collection::vec(0..TRIGGERS.len(), 1..24)) -> Vec<&'static str> {
        indices.into_iter().map(|i| TRIGGERS[i]).collect()
    }
}

/// A single state looping on every trigger, logging the trigger it ran for.
fn looping_engine(log: &Arc<Mutex<Vec<String>>>) -> (ActiveStateMachine, Arc<EventLog>) {
    let mut state = StateBuilder::new("Loop").default_state();
    for trigger in TRIGGERS {
        let log = Arc::clone(log);
        state = state
            .transition(
                TransitionBuilder::new(trigger)
                    .to("Loop")
                    .on(trigger)
                    .effect(Action::infallible(trigger, move || log.lock().push(trigger.to_string()))),
            )
            .expect("transition has target and trigger");
    }
    let graph = GraphBuilder::new().with(state).build().expect("graph is valid");

    let channel = Arc::new(EventChannel::new());
    let recorded = EventLog::attach(&channel);
    let machine = ActiveStateMachine::builder(graph)
        .config(EngineConfig::default())
        .events(channel)
        .build()
        .expect("config is valid");
    (machine, recorded)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn triggers_are_processed_in_submission_order(sequence in trigger_sequence()) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (machine, recorded) = looping_engine(&log);

        machine.start().unwrap();
        for trigger in &sequence {
            machine.enter_trigger(*trigger).unwrap();
        }

        prop_assert!(recorded.wait_for(names::TRANSITION_COMPLETED, sequence.len()));
        let seen = log.lock().clone();
        prop_assert_eq!(seen, sequence);
        machine.stop().unwrap();
    }

    #[test]
    fn pause_never_reorders_triggers(
        before in trigger_sequence(),
        after in trigger_sequence(),
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (machine, recorded) = looping_engine(&log);

        machine.start().unwrap();
        for trigger in &before {
            machine.enter_trigger(*trigger).unwrap();
        }
        machine.pause().unwrap();
        for trigger in &after {
            machine.enter_trigger(*trigger).unwrap();
        }
        machine.resume().unwrap();

        let expected: Vec<&str> = before.iter().chain(after.iter()).copied().collect();
        prop_assert!(recorded.wait_for(names::TRANSITION_COMPLETED, expected.len()));
        let seen = log.lock().clone();
        prop_assert_eq!(seen, expected);
        machine.stop().unwrap();
    }

    #[test]
    fn history_never_exceeds_limit(limit in 0usize..8, records in 0usize..24) {
        let mut history = TransitionHistory::with_limit(limit);
        for i in 0..records {
            history.record(TransitionRecord::new(format!("t{i}"), "go", "A", "B"));
        }

        prop_assert_eq!(history.len(), records.min(limit));
        if limit > 0 && records > 0 {
            let expected_last = format!("t{}", records - 1);
            prop_assert_eq!(history.last().map(|r| r.transition.as_str()), Some(expected_last.as_str()));
        }
    }
}
