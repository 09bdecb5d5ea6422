//! State shared between the engine handle and its worker thread.

use super::config::EngineConfig;
use super::lifecycle::EngineState;
use super::queue::TriggerQueue;
use crate::core::{StateGraph, TransitionHistory};
use crate::events::{Event, EventChannel};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use uuid::Uuid;

/// Current and previous state names. Written only by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub current: String,
    pub previous: String,
}

pub(crate) struct Shared {
    pub id: Uuid,
    pub config: EngineConfig,
    pub graph: Arc<StateGraph>,
    pub queue: TriggerQueue,
    pub cursor: RwLock<Cursor>,
    pub lifecycle: RwLock<EngineState>,
    pub history: Mutex<TransitionHistory>,
    pub events: Arc<EventChannel>,
}

impl Shared {
    /// Emit a System event sourced from this engine.
    pub fn system(&self, name: &str, info: impl Into<String>) {
        self.events
            .emit(Event::system(name, info, self.config.name.as_str()));
    }
}
