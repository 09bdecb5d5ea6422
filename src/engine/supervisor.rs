//! Restart bookkeeping for the worker.

use super::config::SupervisorPolicy;
use std::time::Duration;

/// What the worker should do after a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RestartDecision {
    /// Restart the consume loop after `backoff`
    Restart { attempt: u32, backoff: Duration },
    /// Too many consecutive crashes; stop for good
    GiveUp { crashes: u32 },
}

/// Counts consecutive crashes against a [`SupervisorPolicy`].
pub(crate) struct Supervisor {
    policy: SupervisorPolicy,
    consecutive_crashes: u32,
}

impl Supervisor {
    pub fn new(policy: SupervisorPolicy) -> Self {
        Self {
            policy,
            consecutive_crashes: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_crashes = 0;
    }

    pub fn record_crash(&mut self) -> RestartDecision {
        self.consecutive_crashes = self.consecutive_crashes.saturating_add(1);
        if self.consecutive_crashes > self.policy.max_restarts {
            RestartDecision::GiveUp {
                crashes: self.consecutive_crashes,
            }
        } else {
            RestartDecision::Restart {
                attempt: self.consecutive_crashes,
                backoff: self.policy.backoff(self.consecutive_crashes),
            }
        }
    }
}
