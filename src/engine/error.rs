//! Engine error types.

use super::lifecycle::EngineState;
use crate::core::ActionError;
use std::fmt;
use thiserror::Error;

/// Errors returned to callers of the engine's public operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot {operation} while engine is {state}")]
    InvalidLifecycle {
        operation: &'static str,
        state: EngineState,
    },

    #[error("Trigger queue full (capacity {capacity}); dropped trigger '{trigger}'")]
    QueueFull { trigger: String, capacity: usize },

    #[error("{operation}() cannot be called from the engine's own worker thread")]
    WorkerThreadCall { operation: &'static str },

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Why a selected transition was skipped without changing state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionRejected {
    #[error("Transition '{transition}' has source state '{source_state}', but the machine is in '{current}'")]
    SourceMismatch {
        transition: String,
        source_state: String,
        current: String,
    },

    #[error("Transition '{transition}' targets unknown state '{target}' (machine is in '{current}')")]
    UnknownTarget {
        transition: String,
        target: String,
        current: String,
    },
}

/// Pipeline step an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Exit,
    Guard,
    Effect,
    Entry,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exit => "exit",
            Self::Guard => "guard",
            Self::Effect => "effect",
            Self::Entry => "entry",
        };
        f.write_str(name)
    }
}

/// An action failed while a transition was executing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} action '{action}' of transition '{transition}' failed: {source}")]
pub struct ExecutionError {
    pub transition: String,
    pub stage: Stage,
    pub action: String,
    #[source]
    pub source: ActionError,
}

/// Failure that escaped the worker's consume loop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerCrash {
    #[error("Processing trigger '{trigger}' failed: {error}")]
    Action {
        trigger: String,
        #[source]
        error: ExecutionError,
    },

    #[error("Processing trigger '{trigger}' panicked: {message}")]
    Panic { trigger: String, message: String },
}

impl WorkerCrash {
    pub fn trigger(&self) -> &str {
        match self {
            Self::Action { trigger, .. } | Self::Panic { trigger, .. } => trigger,
        }
    }
}
