//! Collaborators that sit on an engine's event channel.
//!
//! Each service is constructed explicitly and attached to a channel; none
//! of them is required for the engine to run.

pub mod bridge;
pub mod dispatcher;
pub mod log_sink;

pub use bridge::NotificationBridge;
pub use dispatcher::{CommandDispatcher, CommandDispatcherBuilder, DispatchError, DispatchOutcome};
pub use log_sink::{LogSink, DEFAULT_JOURNAL_CAPACITY};
