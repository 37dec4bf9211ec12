//! Step log for a running simulation.
//!
//! Every applied transition leaves one [`StepRecord`]. The log is bounded:
//! once it reaches its limit the oldest record is dropped, so a timer left
//! running for hours does not grow memory without bound.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of records kept by a [`StepLog`].
pub const DEFAULT_LOG_LIMIT: usize = 256;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use logic_dojo::core::{State, StepRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     On,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::On => "On",
///         }
///     }
/// }
///
/// let record = StepRecord {
///     from: Lamp::Off,
///     to: Lamp::On,
///     tick: 3,
///     timestamp: Utc::now(),
///     note: Some("switch pressed".to_string()),
/// };
/// assert_eq!(record.tick, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StepRecord<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered (may equal `from` for self-loops)
    pub to: S,
    /// Tick count of the simulation when the step was applied
    pub tick: u64,
    /// Wall-clock time of the step
    pub timestamp: DateTime<Utc>,
    /// Human-readable log line supplied by the widget
    pub note: Option<String>,
}

/// Ordered, bounded log of applied transitions.
///
/// # Example
///
/// ```rust
/// use logic_dojo::core::{State, StepLog, StepRecord};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase { A, B, C }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let mut log = StepLog::new();
/// log.record(StepRecord { from: Phase::A, to: Phase::B, tick: 0, timestamp: Utc::now(), note: None });
/// log.record(StepRecord { from: Phase::B, to: Phase::C, tick: 1, timestamp: Utc::now(), note: None });
///
/// assert_eq!(log.path(), vec![&Phase::A, &Phase::B, &Phase::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StepLog<S: State> {
    records: VecDeque<StepRecord<S>>,
    limit: usize,
}

impl<S: State> Default for StepLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StepLog<S> {
    /// Create an empty log holding at most [`DEFAULT_LOG_LIMIT`] records.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LOG_LIMIT)
    }

    /// Create an empty log holding at most `limit` records (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Append a record, evicting the oldest one when the log is full.
    pub fn record(&mut self, record: StepRecord<S>) {
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States traversed, oldest first: the `from` of the first retained
    /// record followed by the `to` of every record.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the first and last retained record.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.records.front()?;
        let last = self.records.back()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Widget-supplied log lines, oldest first.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|r| r.note.as_deref())
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &StepRecord<S>> {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&StepRecord<S>> {
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

    /// Drop every record, keeping the limit.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Got1,
        Got10,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Got1 => "Got1",
                Self::Got10 => "Got10",
            }
        }
    }

    fn record(from: TestState, to: TestState, tick: u64) -> StepRecord<TestState> {
        StepRecord {
            from,
            to,
            tick,
            timestamp: Utc::now(),
            note: None,
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log: StepLog<TestState> = StepLog::new();
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
        assert_eq!(log.limit(), DEFAULT_LOG_LIMIT);
    }

    #[test]
    fn path_returns_state_sequence() {
        let mut log = StepLog::new();
        log.record(record(TestState::Idle, TestState::Got1, 0));
        log.record(record(TestState::Got1, TestState::Got10, 1));

        let path = log.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Idle);
        assert_eq!(path[1], &TestState::Got1);
        assert_eq!(path[2], &TestState::Got10);
    }

    #[test]
    fn full_log_evicts_oldest_record() {
        let mut log = StepLog::with_limit(2);
        log.record(record(TestState::Idle, TestState::Got1, 0));
        log.record(record(TestState::Got1, TestState::Got10, 1));
        log.record(record(TestState::Got10, TestState::Idle, 2));

        assert_eq!(log.len(), 2);
        assert_eq!(log.records().next().map(|r| r.tick), Some(1));
        assert_eq!(log.last().map(|r| r.tick), Some(2));
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let mut log = StepLog::with_limit(0);
        log.record(record(TestState::Idle, TestState::Got1, 0));
        log.record(record(TestState::Got1, TestState::Idle, 1));

        assert_eq!(log.limit(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn notes_skip_records_without_text() {
        let mut log = StepLog::new();
        let mut first = record(TestState::Idle, TestState::Got1, 0);
        first.note = Some("read 1".to_string());
        log.record(first);
        log.record(record(TestState::Got1, TestState::Got10, 1));

        assert_eq!(log.notes().collect::<Vec<_>>(), vec!["read 1"]);
    }

    #[test]
    fn single_record_has_zero_duration() {
        let mut log = StepLog::new();
        log.record(record(TestState::Idle, TestState::Got1, 0));

        assert_eq!(log.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn clear_keeps_limit() {
        let mut log = StepLog::with_limit(4);
        log.record(record(TestState::Idle, TestState::Got1, 0));
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.limit(), 4);
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = StepLog::new();
        log.record(record(TestState::Idle, TestState::Got1, 0));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: StepLog<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(log.len(), deserialized.len());
        assert_eq!(deserialized.path(), log.path());
    }
}
