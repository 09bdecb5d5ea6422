//! Builder for constructing engines.

use crate::core::{ConfigError, StateGraph};
use crate::engine::{ActiveStateMachine, EngineConfig};
use crate::events::{Event, EventChannel, EventHandler};
use std::sync::Arc;

/// Builder for an [`ActiveStateMachine`].
///
/// Subscribers registered here are attached before the engine is created,
/// so they see the `OnInit` command and `engine.initialized`.
pub struct EngineBuilder {
    graph: StateGraph,
    config: EngineConfig,
    events: Option<Arc<EventChannel>>,
    subscribers: Vec<EventHandler>,
}

impl EngineBuilder {
    pub fn new(graph: StateGraph) -> Self {
        Self {
            graph,
            config: EngineConfig::default(),
            events: None,
            subscribers: Vec::new(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish on an existing channel instead of a fresh one.
    pub fn events(mut self, channel: Arc<EventChannel>) -> Self {
        self.events = Some(channel);
        self
    }

    pub fn subscribe<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribers.push(Arc::new(handler));
        self
    }

    /// Validate the configuration and create the engine.
    pub fn build(self) -> Result<ActiveStateMachine, ConfigError> {
        self.config.validate()?;
        let events = self.events.unwrap_or_default();
        for handler in self.subscribers {
            events.subscribe(move |e: &Event| handler(e));
        }
        ActiveStateMachine::new(self.graph, self.config, events)
    }
}
