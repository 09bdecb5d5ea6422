//! Lifecycle of the engine itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the engine's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Constructed, worker never started
    Initialized,
    /// Worker consuming triggers
    Running,
    /// Worker parked before its next dequeue
    Paused,
    /// Worker joined; queue and current state kept
    Stopped,
}

impl EngineState {
    pub fn can_start(self) -> bool {
        matches!(self, Self::Initialized | Self::Stopped)
    }

    pub fn can_pause(self) -> bool {
        self == Self::Running
    }

    pub fn can_resume(self) -> bool {
        self == Self::Paused
    }

    pub fn can_stop(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Whether a worker thread is expected to be alive.
    pub fn is_active(self) -> bool {
        self.can_stop()
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialized => "Initialized",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_operations_follow_lifecycle() {
        assert!(EngineState::Initialized.can_start());
        assert!(EngineState::Stopped.can_start());
        assert!(!EngineState::Running.can_start());
        assert!(!EngineState::Paused.can_start());

        assert!(EngineState::Running.can_pause());
        assert!(!EngineState::Paused.can_pause());

        assert!(EngineState::Paused.can_resume());
        assert!(!EngineState::Running.can_resume());

        assert!(EngineState::Running.can_stop());
        assert!(EngineState::Paused.can_stop());
        assert!(!EngineState::Stopped.can_stop());
        assert!(!EngineState::Initialized.can_stop());
    }
}
