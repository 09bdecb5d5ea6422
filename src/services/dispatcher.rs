//! Routes Command events to registered operations.
//!
//! A command event names its handler through `target` and the operation
//! through `name`. Operations are registered up front in an explicit table,
//! and the commands the graph is known to send can be declared with
//! [`CommandDispatcherBuilder::expect_command`] so that a missing handler
//! fails at startup instead of at dispatch time.

use crate::core::Action;
use crate::events::{Event, EventChannel, EventKind, SubscriptionId, BROADCAST_TARGET};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No operation registered for command '{command}' on target '{target}'")]
    Unresolved { target: String, command: String },
}

/// Result of handing one event to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a command event
    Ignored,
    /// Number of operations invoked
    Dispatched(usize),
    /// No operation matched
    Unresolved,
    /// An operation returned an error; later operations were not run
    Failed(String),
}

type Key = (String, String);

pub struct CommandDispatcher {
    operations: HashMap<Key, Action>,
    /// Registration order, used for broadcast commands
    order: Vec<Key>,
}

impl CommandDispatcher {
    pub fn builder() -> CommandDispatcherBuilder {
        CommandDispatcherBuilder::default()
    }

    /// Whether an operation is registered for `command` on `target`.
    pub fn resolves(&self, target: &str, command: &str) -> bool {
        self.operations
            .contains_key(&(target.to_string(), command.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Invoke the operations an event addresses.
    ///
    /// Commands targeted at `All` run every registered operation with that
    /// command name, in registration order.
    pub fn handle(&self, event: &Event) -> DispatchOutcome {
        if event.kind() != EventKind::Command {
            return DispatchOutcome::Ignored;
        }

        let selected: Vec<&Action> = if event.target() == BROADCAST_TARGET {
            self.order
                .iter()
                .filter(|(_, command)| command == event.name())
                .filter_map(|key| self.operations.get(key))
                .collect()
        } else {
            self.operations
                .get(&(event.target().to_string(), event.name().to_string()))
                .into_iter()
                .collect()
        };

        if selected.is_empty() {
            tracing::warn!(
                command = %event.name(),
                target = %event.target(),
                "No operation registered for command"
            );
            return DispatchOutcome::Unresolved;
        }

        for action in &selected {
            if let Err(e) = action.execute() {
                tracing::error!(
                    command = %event.name(),
                    target = %event.target(),
                    operation = %action.name(),
                    error = %e,
                    "Command operation failed"
                );
                return DispatchOutcome::Failed(e.to_string());
            }
        }
        tracing::debug!(command = %event.name(), count = selected.len(), "Command dispatched");
        DispatchOutcome::Dispatched(selected.len())
    }

    /// Subscribe to `channel`, dispatching every command it carries.
    pub fn attach(self: Arc<Self>, channel: &EventChannel) -> SubscriptionId {
        channel.subscribe(move |event: &Event| {
            self.handle(event);
        })
    }
}

/// Builder for a [`CommandDispatcher`].
#[derive(Default)]
pub struct CommandDispatcherBuilder {
    operations: HashMap<Key, Action>,
    order: Vec<Key>,
    expected: Vec<Key>,
}

impl CommandDispatcherBuilder {
    /// Register `action` as the handler for `command` on `target`.
    /// A later registration for the same pair replaces the earlier one.
    pub fn operation(
        mut self,
        target: impl Into<String>,
        command: impl Into<String>,
        action: Action,
    ) -> Self {
        let key = (target.into(), command.into());
        if self.operations.insert(key.clone(), action).is_none() {
            self.order.push(key);
        }
        self
    }

    /// Require an operation for `command` on `target` to be registered.
    pub fn expect_command(mut self, target: impl Into<String>, command: impl Into<String>) -> Self {
        self.expected.push((target.into(), command.into()));
        self
    }

    pub fn build(self) -> Result<CommandDispatcher, DispatchError> {
        if let Some((target, command)) = self
            .expected
            .into_iter()
            .find(|key| !self.operations.contains_key(key))
        {
            return Err(DispatchError::Unresolved { target, command });
        }
        Ok(CommandDispatcher {
            operations: self.operations,
            order: self.order,
        })
    }
}
