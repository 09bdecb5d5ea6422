//! Traffic Light Active State Machine
//!
//! This example drives a cyclic state machine from its own worker thread.
//!
//! Key concepts:
//! - Triggers queued from the main thread, processed on the worker
//! - Entry actions issuing commands to a collaborator
//! - Pausing and resuming without losing triggers
//! - Structured logs through `tracing`
//!
//! Run with: cargo run --example traffic_light
//! More detail: RUST_LOG=active_fsm=debug cargo run --example traffic_light

use active_fsm::builder::{GraphBuilder, StateBuilder};
use active_fsm::core::Action;
use active_fsm::engine::{ActiveStateMachine, EngineConfig};
use active_fsm::events::{names, Event, EventChannel};
use active_fsm::services::{CommandDispatcher, LogSink};
use std::sync::{Arc, Weak};
use std::sync::mpsc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn lamp_command(channel: &Arc<EventChannel>, colour: &'static str) -> Action {
    let channel: Weak<EventChannel> = Arc::downgrade(channel);
    Action::infallible(format!("show_{colour}"), move || {
        if let Some(channel) = channel.upgrade() {
            channel.emit(Event::command("Show", colour, "traffic-light", "Lamp"));
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    println!("=== Traffic Light Active State Machine ===\n");

    let channel = Arc::new(EventChannel::new());
    let journal = Arc::new(LogSink::new());
    Arc::clone(&journal).attach(&channel);

    let lamp = Arc::new(
        CommandDispatcher::builder()
            .operation("Lamp", names::ON_INIT, Action::infallible("lamp_self_test", || {
                println!("Lamp: self test");
            }))
            .operation("Lamp", "Show", Action::infallible("lamp_show", || {
                println!("Lamp: colour changed");
            }))
            .expect_command("Lamp", "Show")
            .build()?,
    );
    lamp.attach(&channel);

    let graph = GraphBuilder::new()
        .with(
            StateBuilder::new("Red")
                .default_state()
                .entry(lamp_command(&channel, "red"))
                .on("next", "Green"),
        )
        .with(
            StateBuilder::new("Green")
                .entry(lamp_command(&channel, "green"))
                .on("next", "Yellow"),
        )
        .with(
            StateBuilder::new("Yellow")
                .entry(lamp_command(&channel, "yellow"))
                .on("next", "Red"),
        )
        .build()?;

    let (done_tx, done_rx) = mpsc::channel();
    let done_tx = std::sync::Mutex::new(done_tx);
    let machine = ActiveStateMachine::builder(graph)
        .config(EngineConfig::new(8).with_name("traffic-light"))
        .events(Arc::clone(&channel))
        .subscribe(move |e| {
            if e.name() == names::TRANSITION_COMPLETED {
                if let Ok(tx) = done_tx.lock() {
                    let _ = tx.send(e.info().to_string());
                }
            }
        })
        .build()?;

    println!("Initial state: {}\n", machine.current_state());
    machine.start()?;

    println!("Two cycles, paused halfway:");
    for _ in 0..3 {
        machine.enter_trigger("next")?;
    }
    machine.pause()?;
    for _ in 0..3 {
        machine.enter_trigger("next")?;
    }
    println!("  paused with {} triggers waiting", machine.queue_len());
    machine.resume()?;

    for _ in 0..6 {
        let step = done_rx.recv_timeout(Duration::from_secs(5))?;
        println!("  {step}");
    }

    machine.stop()?;
    println!("\nFinal state: {}", machine.current_state());
    println!("Journal holds {} events", journal.len());

    println!("\n=== Example Complete ===");
    Ok(())
}
