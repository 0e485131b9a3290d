#![forbid(unsafe_code)]

//! Scheduled one-shot tasks keyed by purpose and target.
//!
//! Every deferred action in the dock (removal grace, barrier smoothing,
//! barrier re-arm, autohide delay) is an entry in a [`TaskTable`] instead of
//! a free-standing timer. Owners poll [`TaskTable::take_due`] from their tick
//! and act on whatever fired.
//!
//! # Invariants
//!
//! 1. At most one task per `(purpose, target)` key; scheduling again replaces
//!    the due time.
//! 2. `take_due(now)` removes and returns every task with `due <= now`, ordered
//!    by due time, then by key, so firing order is deterministic.
//! 3. A cancelled task never fires.

use std::hash::Hash;
use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

/// One-shot task table.
#[derive(Debug, Clone)]
pub struct TaskTable<P, T> {
    tasks: AHashMap<(P, T), Instant>,
}

impl<P, T> Default for TaskTable<P, T> {
    fn default() -> Self {
        Self {
            tasks: AHashMap::new(),
        }
    }
}

impl<P, T> TaskTable<P, T>
where
    P: Copy + Eq + Hash + Ord,
    T: Copy + Eq + Hash + Ord,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `(purpose, target)` at `due`. Returns `true` if an earlier
    /// entry for the same key was replaced.
    pub fn schedule(&mut self, purpose: P, target: T, due: Instant) -> bool {
        self.tasks.insert((purpose, target), due).is_some()
    }

    /// Schedule `(purpose, target)` to fire `delay` after `now`.
    pub fn schedule_in(&mut self, purpose: P, target: T, now: Instant, delay: Duration) -> bool {
        self.schedule(purpose, target, now + delay)
    }

    /// Cancel a pending task. Returns `true` if one was pending.
    pub fn cancel(&mut self, purpose: P, target: T) -> bool {
        self.tasks.remove(&(purpose, target)).is_some()
    }

    /// Cancel every task for `target`, whatever its purpose.
    pub fn cancel_target(&mut self, target: T) {
        self.tasks.retain(|(_, t), _| *t != target);
    }

    #[inline]
    pub fn is_scheduled(&self, purpose: P, target: T) -> bool {
        self.tasks.contains_key(&(purpose, target))
    }

    pub fn due_at(&self, purpose: P, target: T) -> Option<Instant> {
        self.tasks.get(&(purpose, target)).copied()
    }

    /// Earliest pending due time.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.values().min().copied()
    }

    /// Remove and return every task due at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(P, T)> {
        let mut due: Vec<(Instant, P, T)> = self
            .tasks
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|((p, t), at)| (*at, *p, *t))
            .collect();
        if due.is_empty() {
            return Vec::new();
        }
        due.sort();
        for (_, p, t) in &due {
            self.tasks.remove(&(*p, *t));
        }
        due.into_iter().map(|(_, p, t)| (p, t)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_20: Duration = Duration::from_millis(20);

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum Purpose {
        Grace,
        Rearm,
    }

    #[test]
    fn schedule_replaces_existing_key() {
        let mut table: TaskTable<Purpose, u32> = TaskTable::new();
        let t0 = Instant::now();
        assert!(!table.schedule_in(Purpose::Grace, 1, t0, MS_10));
        assert!(table.schedule_in(Purpose::Grace, 1, t0, MS_20));
        assert_eq!(table.len(), 1);
        assert_eq!(table.due_at(Purpose::Grace, 1), Some(t0 + MS_20));
        assert!(table.take_due(t0 + MS_10).is_empty());
        assert_eq!(table.take_due(t0 + MS_20), vec![(Purpose::Grace, 1)]);
        assert!(table.is_empty());
    }

    #[test]
    fn take_due_orders_by_time_then_key() {
        let mut table: TaskTable<Purpose, u32> = TaskTable::new();
        let t0 = Instant::now();
        table.schedule_in(Purpose::Rearm, 2, t0, MS_10);
        table.schedule_in(Purpose::Grace, 9, t0, MS_10);
        table.schedule_in(Purpose::Grace, 1, t0, MS_20);
        table.schedule_in(Purpose::Grace, 3, t0, Duration::ZERO);
        let fired = table.take_due(t0 + MS_20);
        assert_eq!(
            fired,
            vec![
                (Purpose::Grace, 3),
                (Purpose::Grace, 9),
                (Purpose::Rearm, 2),
                (Purpose::Grace, 1),
            ]
        );
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut table: TaskTable<Purpose, u32> = TaskTable::new();
        let t0 = Instant::now();
        table.schedule_in(Purpose::Grace, 1, t0, MS_10);
        table.schedule_in(Purpose::Rearm, 1, t0, MS_10);
        table.schedule_in(Purpose::Grace, 2, t0, MS_10);
        assert!(table.cancel(Purpose::Grace, 1));
        assert!(!table.cancel(Purpose::Grace, 1));
        table.cancel_target(2);
        assert_eq!(table.take_due(t0 + MS_20), vec![(Purpose::Rearm, 1)]);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut table: TaskTable<Purpose, u32> = TaskTable::new();
        assert_eq!(table.next_deadline(), None);
        let t0 = Instant::now();
        table.schedule_in(Purpose::Grace, 1, t0, MS_20);
        table.schedule_in(Purpose::Grace, 2, t0, MS_10);
        assert_eq!(table.next_deadline(), Some(t0 + MS_10));
        table.clear();
        assert!(table.is_empty());
    }
}
