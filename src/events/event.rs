//! Event values passed to subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Target used when an event is addressed to every collaborator.
pub const BROADCAST_TARGET: &str = "All";

/// What an event is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Diagnostic milestone
    System,
    /// Instruction for the collaborator named by the event's target
    Command,
    /// External stimulus meant to be fed back as a trigger
    Notification,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "System",
            Self::Command => "Command",
            Self::Notification => "Notification",
        };
        f.write_str(name)
    }
}

/// Immutable record of something that happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: Uuid,
    name: String,
    info: String,
    timestamp: DateTime<Utc>,
    source: String,
    target: String,
    kind: EventKind,
}

impl Event {
    pub fn new(
        kind: EventKind,
        name: impl Into<String>,
        info: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            info: info.into(),
            timestamp: Utc::now(),
            source: source.into(),
            target: target.into(),
            kind,
        }
    }

    /// Diagnostic event addressed to everyone.
    pub fn system(
        name: impl Into<String>,
        info: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::new(EventKind::System, name, info, source, BROADCAST_TARGET)
    }

    /// Command for the collaborator named `target`.
    pub fn command(
        name: impl Into<String>,
        info: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(EventKind::Command, name, info, source, target)
    }

    /// Notification whose name is the trigger to feed back.
    pub fn notification(
        name: impl Into<String>,
        info: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(EventKind::Notification, name, info, source, target)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_broadcast(&self) -> bool {
        self.target == BROADCAST_TARGET
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} - Info: {} - Source: {} - Target: {}",
            self.timestamp.to_rfc3339(),
            self.kind,
            self.name,
            self.info,
            self.source,
            self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_events_are_broadcast() {
        let event = Event::system("engine.started", "running", "door");

        assert_eq!(event.kind(), EventKind::System);
        assert!(event.is_broadcast());
        assert_eq!(event.source(), "door");
    }

    #[test]
    fn command_events_carry_target() {
        let event = Event::command("open", "", "door", "motor");

        assert_eq!(event.kind(), EventKind::Command);
        assert_eq!(event.target(), "motor");
        assert!(!event.is_broadcast());
    }

    #[test]
    fn every_event_gets_its_own_id() {
        let a = Event::system("x", "", "s");
        let b = Event::system("x", "", "s");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn display_includes_kind_and_route() {
        let event = Event::notification("door_closed", "sensor", "sensor", "door");
        let text = event.to_string();

        assert!(text.contains("Notification: door_closed"));
        assert!(text.contains("Source: sensor - Target: door"));
    }

    #[test]
    fn event_serializes_to_json() {
        let event = Event::command("OnInit", "init", "door", BROADCAST_TARGET);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "Command");
        assert_eq!(json["name"], "OnInit");

        let restored: Event = serde_json::from_value(json).unwrap();
        assert_eq!(restored, event);
    }
}
