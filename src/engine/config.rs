//! Engine configuration.

use crate::core::ConfigError;
use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default trigger queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// What `enter_trigger` does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Wait until the worker frees a slot
    #[default]
    Block,

    /// Wait at most `timeout_ms`, then drop the trigger
    BlockFor { timeout_ms: u64 },

    /// Drop the trigger immediately
    Reject,
}

impl BackpressurePolicy {
    pub fn block_for(timeout: Duration) -> Self {
        Self::BlockFor {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Restart policy applied when the worker crashes.
///
/// Crashes are counted while consecutive; any successfully processed
/// trigger resets the count. Backoff doubles with each consecutive crash.
///
/// The default restarts forever without delay. Use [`SupervisorPolicy::new`]
/// to opt into a restart budget after which the engine stops itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorPolicy {
    /// Consecutive restarts allowed before the engine stops itself
    pub max_restarts: u32,
    /// Delay before the first restart
    pub initial_backoff_ms: u64,
    /// Upper bound for the restart delay
    pub max_backoff_ms: u64,
}

impl Default for SupervisorPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl SupervisorPolicy {
    /// Restart after every crash, immediately.
    pub fn unbounded() -> Self {
        Self {
            max_restarts: u32::MAX,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Restart at most `max_restarts` consecutive times, then give up.
    pub fn new(max_restarts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_restarts,
            initial_backoff_ms: u64::try_from(initial_backoff.as_millis()).unwrap_or(u64::MAX),
            max_backoff_ms: u64::try_from(max_backoff.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Delay before restart number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Configuration for an [`ActiveStateMachine`](crate::engine::ActiveStateMachine).
///
/// # Example
///
/// ```rust
/// use active_fsm::engine::{BackpressurePolicy, EngineConfig};
///
/// let config = EngineConfig::from_json(
///     r#"{ "name": "door", "queue_capacity": 8, "backpressure": { "mode": "reject" } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.queue_capacity, 8);
/// assert_eq!(config.backpressure, BackpressurePolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Used as the source of every event the engine emits
    pub name: String,
    /// Maximum number of queued triggers
    pub queue_capacity: usize,
    pub backpressure: BackpressurePolicy,
    pub supervisor: SupervisorPolicy,
    /// Number of completed transitions kept in history
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "state-machine".to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backpressure: BackpressurePolicy::default(),
            supervisor: SupervisorPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            queue_capacity,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_backpressure(mut self, policy: BackpressurePolicy) -> Self {
        self.backpressure = policy;
        self
    }

    pub fn with_supervisor(mut self, policy: SupervisorPolicy) -> Self {
        self.supervisor = policy;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
