use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

use serde::{Deserialize, Serialize};

/// Identifier of a round.
///
/// Every start, restart and resize of a session begins a new generation.
/// Delayed work carries the generation it was scheduled in, so work left
/// over from an abandoned round can be recognized and dropped.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// One-based number of the round this generation belongs to.
    #[must_use]
    pub const fn round(self) -> u64 {
        self.0 + 1
    }
}

/// Delayed work that hides a mismatched pair again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevertTask {
    pub generation: Generation,
    pub first: usize,
    pub second: usize,
}

/// Runs delayed work for a session.
///
/// The engine never waits by itself. When a mismatch needs to be hidden
/// after a delay, it hands a [`RevertTask`] to the scheduler, and the
/// scheduler's owner feeds the task back to
/// [`GameSession::on_revert`](crate::GameSession::on_revert) once the delay
/// has elapsed. Tasks are never cancelled; stale ones are rejected by the
/// session.
pub trait Scheduler {
    fn schedule_after(&mut self, delay: Duration, task: RevertTask);
}

/// Deadline queue driven by an external clock.
///
/// The clock is a [`Duration`] since an arbitrary origin and only moves when
/// the owner advances it. The terminal front-end feeds it elapsed wall time,
/// simulations and tests advance it directly.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use pairs_engine::{GameSession, SessionConfig, TimerQueue};
///
/// let mut session = GameSession::start(&SessionConfig::default()).unwrap();
/// let mut timers = TimerQueue::new();
///
/// // ... activate cards with `session.on_card_activated(index, &mut timers)` ...
///
/// timers.advance_by(Duration::from_millis(16));
/// while let Some(task) = timers.pop_due() {
///     session.on_revert(task).ok();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: BinaryHeap<Reverse<Entry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    seq: u64,
    task: RevertTask,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock to `now`. The clock never goes backwards.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Deadline of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pops the earliest task whose deadline has passed.
    ///
    /// Tasks with the same deadline come out in the order they were scheduled.
    pub fn pop_due(&mut self) -> Option<RevertTask> {
        if self.next_due()? > self.now {
            return None;
        }
        self.pending.pop().map(|Reverse(entry)| entry.task)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_after(&mut self, delay: Duration, task: RevertTask) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.pending.push(Reverse(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(first: usize) -> RevertTask {
        RevertTask {
            generation: Generation::default(),
            first,
            second: first + 1,
        }
    }

    #[test]
    fn test_task_is_not_due_before_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(Duration::from_millis(1000), task(0));

        timers.advance_by(Duration::from_millis(999));
        assert_eq!(timers.pop_due(), None);
        assert_eq!(timers.len(), 1);

        timers.advance_by(Duration::from_millis(1));
        assert_eq!(timers.pop_due(), Some(task(0)));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_tasks_come_out_by_deadline_then_insertion() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(Duration::from_millis(20), task(0));
        timers.schedule_after(Duration::from_millis(10), task(2));
        timers.schedule_after(Duration::from_millis(10), task(4));

        timers.advance_to(Duration::from_secs(1));
        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due())
            .map(|task| task.first)
            .collect();
        assert_eq!(order, [2, 4, 0]);
    }

    #[test]
    fn test_clock_does_not_go_backwards() {
        let mut timers = TimerQueue::new();
        timers.advance_to(Duration::from_millis(500));
        timers.advance_to(Duration::from_millis(100));
        assert_eq!(timers.now(), Duration::from_millis(500));

        timers.schedule_after(Duration::from_millis(10), task(0));
        assert_eq!(timers.next_due(), Some(Duration::from_millis(510)));
    }

    #[test]
    fn test_generation_display() {
        assert_eq!(Generation::default().next().next().to_string(), "2");
    }

    #[test]
    fn test_rounds_count_from_one() {
        assert_eq!(Generation::default().round(), 1);
        assert_eq!(Generation::default().next().round(), 2);
    }
}
