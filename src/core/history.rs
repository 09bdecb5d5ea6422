//! Bounded history of completed transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the transition that ran
    pub transition: String,
    /// Trigger that selected it
    pub trigger: String,
    /// The state being left
    pub from: String,
    /// The state entered
    pub to: String,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(
        transition: impl Into<String>,
        trigger: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            transition: transition.into(),
            trigger: trigger.into(),
            from: from.into(),
            to: to.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of transitions, oldest first.
///
/// When the history is full the oldest record is dropped.
///
/// # Example
///
/// ```rust
/// use active_fsm::core::{TransitionHistory, TransitionRecord};
///
/// let mut history = TransitionHistory::with_limit(2);
/// history.record(TransitionRecord::new("t1", "go", "A", "B"));
/// history.record(TransitionRecord::new("t2", "go", "B", "C"));
/// history.record(TransitionRecord::new("t3", "go", "C", "D"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec!["B", "C", "D"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    limit: usize,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

/// Default number of records kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

impl TransitionHistory {
    /// Create an empty history keeping at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// States traversed: the first record's source, then every target.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.records.front()?;
        let last = self.records.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
