//! The engine's dedicated worker thread.
//!
//! The worker owns the consume loop: dequeue a trigger, dispatch it, repeat.
//! A failing action or a panic ends the loop with a [`WorkerCrash`]; the
//! surrounding supervisor loop reports it, waits out any backoff and starts
//! consuming again, unless a bounded policy has run out of restarts.

use super::error::WorkerCrash;
use super::executor;
use super::lifecycle::EngineState;
use super::shared::Shared;
use super::supervisor::{RestartDecision, Supervisor};
use crate::events::names;
use std::any::Any;
use std::cell::Cell;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

thread_local! {
    static WORKER_OF: Cell<Option<Uuid>> = const { Cell::new(None) };
}

fn mark_worker_thread(engine: Uuid) {
    WORKER_OF.with(|cell| cell.set(Some(engine)));
}

/// Whether the calling thread is the worker of engine `engine`.
pub(crate) fn on_worker_thread(engine: Uuid) -> bool {
    WORKER_OF.with(|cell| cell.get() == Some(engine))
}

pub(crate) struct Worker {
    handle: JoinHandle<()>,
    token: CancellationToken,
}

impl Worker {
    pub fn spawn(shared: Arc<Shared>) -> io::Result<Self> {
        let token = CancellationToken::new();
        let handle = thread::Builder::new()
            .name(format!("fsm-{}", shared.config.name))
            .spawn({
                let token = token.clone();
                move || {
                    mark_worker_thread(shared.id);
                    run(&shared, &token);
                }
            })?;
        Ok(Self { handle, token })
    }

    /// Ask the worker to finish after its current trigger.
    pub fn cancel(&self, shared: &Shared) {
        self.token.cancel();
        shared.queue.wake();
    }

    /// Wait for the thread to exit. Returns the panic message if the
    /// supervisor loop itself panicked.
    pub fn join(self) -> Result<(), String> {
        self.handle.join().map_err(|payload| panic_message(&*payload))
    }
}

fn run(shared: &Shared, token: &CancellationToken) {
    let mut supervisor = Supervisor::new(shared.config.supervisor.clone());
    tracing::debug!(engine = %shared.id, "Worker started");

    loop {
        let crash = match consume(shared, token, &mut supervisor) {
            Ok(()) => {
                tracing::debug!(engine = %shared.id, "Worker cancelled");
                shared.system(names::WORKER_CANCELLED, "Worker finished on cancellation");
                return;
            }
            Err(crash) => crash,
        };

        tracing::error!(engine = %shared.id, trigger = %crash.trigger(), error = %crash, "Worker crashed");
        shared.system(names::WORKER_CRASHED, crash.to_string());

        match supervisor.record_crash() {
            RestartDecision::GiveUp { crashes } => {
                *shared.lifecycle.write() = EngineState::Stopped;
                tracing::error!(engine = %shared.id, crashes, "Restart budget exhausted; engine stopped");
                shared.system(
                    names::WORKER_GAVE_UP,
                    format!("Giving up after {crashes} consecutive crashes"),
                );
                return;
            }
            RestartDecision::Restart { attempt, backoff } => {
                if shared.queue.wait_cancelled(token, backoff) {
                    shared.system(names::WORKER_CANCELLED, "Cancelled during restart backoff");
                    return;
                }
                tracing::warn!(engine = %shared.id, attempt, ?backoff, "Restarting worker");
                shared.system(
                    names::WORKER_RESTARTED,
                    format!("Restart attempt {attempt} after {}ms", backoff.as_millis()),
                );
            }
        }
    }
}

/// Consume triggers until cancelled (`Ok`) or until one fails (`Err`).
fn consume(
    shared: &Shared,
    token: &CancellationToken,
    supervisor: &mut Supervisor,
) -> Result<(), WorkerCrash> {
    while let Some(trigger) = shared.queue.pop(token) {
        // stop() may have landed between the pop and here
        if token.is_cancelled() {
            shared.queue.requeue_front(trigger);
            return Ok(());
        }

        tracing::trace!(engine = %shared.id, trigger = %trigger, "Dispatching trigger");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| executor::dispatch(shared, &trigger)));
        shared.queue.release();
        match outcome {
            Ok(Ok(())) => supervisor.record_success(),
            Ok(Err(error)) => return Err(WorkerCrash::Action { trigger, error }),
            Err(payload) => {
                return Err(WorkerCrash::Panic {
                    trigger,
                    message: panic_message(&*payload),
                })
            }
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
