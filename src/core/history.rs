//! Immutable transition history.
//!
//! The machine itself holds only its current state. When a run should leave
//! a trace, the [`recording`](crate::decorators::recording) decorator appends
//! to a shared `StateHistory` from outside the engine.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// `attempt` counts how many times the emitter for `from` ran before this
/// transition succeeded, so a clean hop records `1` and a twice-retried hop
/// records `3`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateRecord<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
    /// Emitter invocations spent on this transition, retries included
    pub attempt: usize,
}

/// Ordered history of committed transitions.
///
/// History is immutable: [`record`](StateHistory::record) returns a new
/// history with the entry appended and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{StateHistory, StateRecord};
/// use statewalk::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         One,
///         Two,
///     }
/// }
///
/// let history = StateHistory::new();
/// let history = history.record(StateRecord {
///     from: Phase::One,
///     to: Phase::Two,
///     timestamp: Utc::now(),
///     attempt: 1,
/// });
///
/// assert_eq!(history.path(), vec![&Phase::One, &Phase::Two]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    records: Vec<StateRecord<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: StateRecord<S>) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Get the path of states traversed.
    ///
    /// Returns references in order: the first record's origin, then the
    /// destination of every record.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Total duration from the first to the last recorded transition.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all records in order.
    pub fn records(&self) -> &[StateRecord<S>] {
        &self.records
    }

    /// Export the history as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
