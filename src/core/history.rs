//! Transition history tracking.
//!
//! The machine appends a [`TransitionRecord`] for every completed transition.
//! The history is bounded: once `limit` records are stored, the oldest one is
//! dropped for each new record.

use super::state::StateId;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use tickstate::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "Idle",
///     to: "Walk",
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Walk");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord<K: StateId> {
    /// The state being transitioned from
    pub from: K,
    /// The state being transitioned to
    pub to: K,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of transitions.
///
/// # Example
///
/// ```rust
/// use tickstate::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(TransitionRecord { from: "Start", to: "Middle", timestamp: Utc::now() });
/// history.record(TransitionRecord { from: "Middle", to: "End", timestamp: Utc::now() });
///
/// let path = history.path();
/// assert_eq!(path, vec![&"Start", &"Middle", &"End"]);
/// ```
#[derive(Clone, Debug)]
pub struct StateHistory<K: StateId> {
    records: VecDeque<TransitionRecord<K>>,
    limit: usize,
}

impl<K: StateId> StateHistory<K> {
    /// Create an empty history keeping at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<K>) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` of the oldest retained record followed by the `to`
    /// of every record, in order.
    pub fn path(&self) -> Vec<&K> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the oldest and newest retained record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.records.back()
    }

    /// Iterate over retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<K>> {
        self.records.iter()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &'static str, to: &'static str) -> TransitionRecord<&'static str> {
        TransitionRecord {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<&'static str> = StateHistory::with_limit(4);
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn path_returns_state_sequence() {
        let mut history = StateHistory::with_limit(4);
        history.record(record("Idle", "Walk"));
        history.record(record("Walk", "Run"));

        assert_eq!(history.path(), vec![&"Idle", &"Walk", &"Run"]);
        assert_eq!(history.last().map(|r| r.to), Some("Run"));
    }

    #[test]
    fn oldest_records_are_evicted() {
        let mut history = StateHistory::with_limit(2);
        history.record(record("A", "B"));
        history.record(record("B", "C"));
        history.record(record("C", "D"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec![&"B", &"C", &"D"]);
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut history = StateHistory::with_limit(0);
        history.record(record("A", "B"));
        assert!(history.is_empty());
        assert_eq!(history.limit(), 0);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::with_limit(4);
        let start = Utc::now();
        history.record(TransitionRecord {
            from: "A",
            to: "B",
            timestamp: start,
        });
        history.record(TransitionRecord {
            from: "B",
            to: "C",
            timestamp: start + chrono::Duration::milliseconds(25),
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn single_record_has_duration_zero() {
        let mut history = StateHistory::with_limit(4);
        history.record(record("A", "B"));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }
}
