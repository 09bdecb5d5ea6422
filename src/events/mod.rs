//! Event channel used for diagnostics and command routing.
//!
//! The engine reports every lifecycle milestone as an [`Event`]. Collaborators
//! subscribe to an [`EventChannel`] and act on the events they care about:
//! `System` events are diagnostics, `Command` events instruct the
//! collaborator named by their target, and `Notification` events carry
//! stimuli that should come back into the engine as triggers.

mod channel;
mod event;
pub mod names;

pub use channel::{EventChannel, EventHandler, SubscriptionId};
pub use event::{Event, EventKind, BROADCAST_TARGET};
