//! Named, zero-argument side effects.
//!
//! Actions are the only executable pieces of a state graph. The same type
//! is used for entry and exit actions on states and for guard and effect
//! actions on transitions.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an action.
///
/// Returning an `ActionError` aborts the remaining pipeline of the
/// transition that ran the action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Type alias for the operation wrapped by an [`Action`].
pub type ActionFn = Arc<dyn Fn() -> Result<(), ActionError> + Send + Sync>;

/// A named operation with no arguments and no return value.
///
/// # Example
///
/// ```rust
/// use active_fsm::core::{Action, ActionError};
///
/// let log = Action::infallible("log", || println!("entered"));
/// assert!(log.execute().is_ok());
///
/// let fail = Action::new("fail", || Err(ActionError::new("device offline")));
/// assert_eq!(fail.execute().unwrap_err().message(), "device offline");
/// ```
#[derive(Clone)]
pub struct Action {
    name: String,
    op: ActionFn,
}

impl Action {
    /// Create an action from a fallible operation.
    pub fn new<F>(name: impl Into<String>, op: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            op: Arc::new(op),
        }
    }

    /// Create an action from an operation that cannot fail.
    pub fn infallible<F>(name: impl Into<String>, op: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(name, move || {
            op();
            Ok(())
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the operation.
    pub fn execute(&self) -> Result<(), ActionError> {
        (self.op)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn infallible_action_runs_operation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let action = Action::infallible("count", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        action.execute().unwrap();
        action.execute().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(action.name(), "count");
    }

    #[test]
    fn failing_action_returns_error() {
        let action = Action::new("open_valve", || Err(ActionError::new("valve stuck")));

        let err = action.execute().unwrap_err();
        assert_eq!(err.to_string(), "valve stuck");
    }

    #[test]
    fn cloned_action_shares_operation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let action = Action::infallible("count", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let cloned = action.clone();

        action.execute().unwrap();
        cloned.execute().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_shows_name_only() {
        let action = Action::infallible("beep", || {});
        assert_eq!(format!("{action:?}"), "Action { name: \"beep\" }");
    }
}
